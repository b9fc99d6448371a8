//! EMSA REST API data model.
//!
//! Deserialization structs matching the JSON the EMSA backend serves for
//! containers, alerts and the server-computed statistics action. Timestamps
//! are kept as strings; the UI only ever displays them.

use serde::{Deserialize, Serialize};

/// Container lifecycle state, distinct from the fill-level band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Estado {
    #[default]
    Activo,
    Mantenimiento,
    Inactivo,
    /// Unknown value from the server; rendered with the neutral color.
    #[serde(other)]
    Desconocido,
}

impl Estado {
    /// Display label, as shown in tables and chips.
    pub const fn etiqueta(self) -> &'static str {
        match self {
            Self::Activo => "Activo",
            Self::Mantenimiento => "Mantenimiento",
            Self::Inactivo => "Inactivo",
            Self::Desconocido => "-",
        }
    }
}

/// A waste container as served by `/contenedores/contenedores/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contenedor {
    pub id: i64,
    pub numero: u32,
    pub nombre: String,
    pub direccion: String,
    #[serde(default = "default_capacidad")]
    pub capacidad_litros: u32,
    /// Current fill percentage (0-100). Absent in the payload means no
    /// sensor reading yet, treated as 0.
    #[serde(default)]
    pub nivel_actual: u8,
    #[serde(default)]
    pub estado: Estado,
    #[serde(default)]
    pub latitud: Option<f64>,
    #[serde(default)]
    pub longitud: Option<f64>,
    #[serde(default)]
    pub fecha_instalacion: Option<String>,
}

const fn default_capacidad() -> u32 {
    3300
}

impl Contenedor {
    /// Whether the container can be plotted on the map.
    pub const fn tiene_coordenadas(&self) -> bool {
        self.latitud.is_some() && self.longitud.is_some()
    }

    /// Litres currently in the container, rounded to the nearest integer.
    pub fn litros_usados(&self) -> u64 {
        let v = f64::from(self.capacidad_litros) * f64::from(self.nivel_actual) / 100.0;
        v.round() as u64
    }
}

/// Alert category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TipoAlerta {
    NivelCritico,
    Mantenimiento,
    SinRecoleccion,
    SensorFalla,
    #[serde(other)]
    Informativa,
}

impl TipoAlerta {
    pub const fn etiqueta(self) -> &'static str {
        match self {
            Self::NivelCritico => "Nivel crítico",
            Self::Mantenimiento => "Mantenimiento",
            Self::SinRecoleccion => "Sin recolección",
            Self::SensorFalla => "Falla de sensor",
            Self::Informativa => "Informativa",
        }
    }
}

/// Alert severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severidad {
    Alta,
    #[default]
    Media,
    #[serde(other)]
    Baja,
}

impl Severidad {
    pub const fn etiqueta(self) -> &'static str {
        match self {
            Self::Alta => "Alta",
            Self::Media => "Media",
            Self::Baja => "Baja",
        }
    }
}

/// An alert as served inside the `{success, alertas: [...]}` envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alerta {
    pub id: i64,
    pub tipo: TipoAlerta,
    #[serde(default)]
    pub severidad: Severidad,
    pub titulo: String,
    #[serde(default)]
    pub descripcion: String,
    /// Referenced container id. Deleting a container does not retract its
    /// alerts; this reference may dangle.
    #[serde(default)]
    pub contenedor: Option<i64>,
    #[serde(default)]
    pub contenedor_nombre: String,
    #[serde(default)]
    pub contenedor_ubicacion: String,
    #[serde(default)]
    pub leida: bool,
    #[serde(default)]
    pub estado: String,
    pub fecha_creacion: String,
}

/// Server-computed statistics from `/contenedores/contenedores/estadisticas/`.
#[derive(Debug, Clone, Deserialize)]
pub struct EstadisticasServidor {
    #[serde(default)]
    pub total_contenedores: u32,
    #[serde(default)]
    pub nivel_promedio: f64,
    #[serde(default)]
    pub alertas_activas: u32,
}

/// Token pair returned by `POST /auth/token/`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthTokens {
    pub access: String,
    pub refresh: String,
}
