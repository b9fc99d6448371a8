//! Container create/edit form state machine.
//!
//! Validation happens entirely client-side before any network call:
//! required text fields first, then the coordinate-picking step. Server-side
//! field errors are fed back into the same error list, verbatim.

use serde::Serialize;
use thiserror::Error;

use crate::model::{Contenedor, Estado};

/// Client-side validation failure for one field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{campo}: {mensaje}")]
pub struct ErrorValidacion {
    pub campo: String,
    pub mensaje: String,
}

impl ErrorValidacion {
    fn nuevo(campo: &str, mensaje: &str) -> Self {
        Self {
            campo: campo.into(),
            mensaje: mensaje.into(),
        }
    }
}

/// Form lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FaseFormulario {
    #[default]
    Vacio,
    Editando,
    /// A required field is missing or malformed.
    Invalido,
    /// Text fields are valid but no map location has been picked yet.
    EsperandoUbicacion,
    ListoParaEnviar,
    Enviado,
}

/// Payload sent to the create/update endpoints.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CargaContenedor {
    pub nombre: String,
    pub direccion: String,
    pub capacidad_litros: u32,
    pub latitud: f64,
    pub longitud: f64,
    pub estado: Estado,
}

/// Container form state. Field values survive a failed submission.
#[derive(Debug, Clone, Default)]
pub struct FormularioContenedor {
    /// `Some` when editing an existing container.
    pub editando_id: Option<i64>,
    pub nombre: String,
    pub direccion: String,
    /// Raw text; parsed as a positive integer on submit.
    pub capacidad_litros: String,
    pub estado: Estado,
    pub latitud: Option<f64>,
    pub longitud: Option<f64>,
    pub fase: FaseFormulario,
    pub errores: Vec<ErrorValidacion>,
}

impl FormularioContenedor {
    /// Fresh form for creating a container (default capacity prefilled).
    pub fn nuevo() -> Self {
        Self {
            capacidad_litros: "3300".into(),
            ..Self::default()
        }
    }

    /// Form prefilled from an existing container.
    pub fn editar(contenedor: &Contenedor) -> Self {
        Self {
            editando_id: Some(contenedor.id),
            nombre: contenedor.nombre.clone(),
            direccion: contenedor.direccion.clone(),
            capacidad_litros: contenedor.capacidad_litros.to_string(),
            estado: contenedor.estado,
            latitud: contenedor.latitud,
            longitud: contenedor.longitud,
            fase: FaseFormulario::Editando,
            errores: Vec::new(),
        }
    }

    /// Record a keystroke-level edit: any mutation moves the form to
    /// `Editando` and clears stale errors.
    pub fn tocar(&mut self) {
        self.fase = FaseFormulario::Editando;
        self.errores.clear();
    }

    /// Set the picked map location.
    pub fn fijar_ubicacion(&mut self, latitud: f64, longitud: f64) {
        self.latitud = Some(latitud);
        self.longitud = Some(longitud);
        if self.fase == FaseFormulario::EsperandoUbicacion {
            self.fase = FaseFormulario::Editando;
        }
    }

    /// Validate and transition. On success returns the payload and moves to
    /// `ListoParaEnviar`; the caller performs the API call and then calls
    /// [`Self::confirmar_enviado`] or [`Self::aplicar_errores_servidor`].
    ///
    /// No network call happens here: `Invalido` and `EsperandoUbicacion`
    /// outcomes stay entirely local.
    pub fn preparar_envio(&mut self) -> Option<CargaContenedor> {
        self.errores = self.validar_campos();
        if !self.errores.is_empty() {
            self.fase = FaseFormulario::Invalido;
            return None;
        }
        let (Some(latitud), Some(longitud)) = (self.latitud, self.longitud) else {
            self.fase = FaseFormulario::EsperandoUbicacion;
            self.errores.push(ErrorValidacion::nuevo(
                "ubicacion",
                "Seleccione una ubicación en el mapa",
            ));
            return None;
        };
        self.fase = FaseFormulario::ListoParaEnviar;
        // validar_campos guarantees the parse succeeds
        let capacidad = self.capacidad_litros.trim().parse().unwrap_or(1);
        Some(CargaContenedor {
            nombre: self.nombre.trim().to_string(),
            direccion: self.direccion.trim().to_string(),
            capacidad_litros: capacidad,
            latitud,
            longitud,
            estado: self.estado,
        })
    }

    fn validar_campos(&self) -> Vec<ErrorValidacion> {
        let mut errores = Vec::new();
        if self.nombre.trim().is_empty() {
            errores.push(ErrorValidacion::nuevo("nombre", "El nombre es obligatorio"));
        }
        if self.direccion.trim().is_empty() {
            errores.push(ErrorValidacion::nuevo(
                "direccion",
                "La dirección es obligatoria",
            ));
        }
        match self.capacidad_litros.trim().parse::<u32>() {
            Ok(n) if n > 0 => {}
            _ => errores.push(ErrorValidacion::nuevo(
                "capacidad_litros",
                "La capacidad debe ser un entero positivo",
            )),
        }
        errores
    }

    /// The API call succeeded; the owning view closes the form.
    pub fn confirmar_enviado(&mut self) {
        self.fase = FaseFormulario::Enviado;
        self.errores.clear();
    }

    /// Surface server-side field errors verbatim. The form stays open with
    /// the entered values intact.
    pub fn aplicar_errores_servidor(&mut self, campos: Vec<(String, String)>) {
        self.errores = campos
            .into_iter()
            .map(|(campo, mensaje)| ErrorValidacion { campo, mensaje })
            .collect();
        self.fase = FaseFormulario::Invalido;
    }

    /// Error message for one field, if any.
    pub fn error_de(&self, campo: &str) -> Option<&str> {
        self.errores
            .iter()
            .find(|e| e.campo == campo)
            .map(|e| e.mensaje.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn formulario_valido() -> FormularioContenedor {
        let mut f = FormularioContenedor::nuevo();
        f.nombre = "Plaza Colón".into();
        f.direccion = "Av. Ballivián 123".into();
        f.capacidad_litros = "3300".into();
        f.fijar_ubicacion(-17.383, -66.155);
        f
    }

    #[test]
    fn new_form_starts_empty() {
        let f = FormularioContenedor::nuevo();
        assert_eq!(f.fase, FaseFormulario::Vacio);
        assert!(f.editando_id.is_none());
        assert_eq!(f.capacidad_litros, "3300");
    }

    #[test]
    fn missing_nombre_is_invalid_and_names_the_field() {
        let mut f = formulario_valido();
        f.nombre.clear();
        assert!(f.preparar_envio().is_none());
        assert_eq!(f.fase, FaseFormulario::Invalido);
        assert!(f.error_de("nombre").is_some());
        assert!(f.error_de("direccion").is_none());
    }

    #[test]
    fn capacidad_must_be_positive_integer() {
        for valor in ["", "0", "-5", "abc", "12.5"] {
            let mut f = formulario_valido();
            f.capacidad_litros = valor.into();
            assert!(f.preparar_envio().is_none(), "accepted {valor:?}");
            assert!(f.error_de("capacidad_litros").is_some());
        }
    }

    #[test]
    fn missing_coordinates_transitions_to_awaiting_location() {
        let mut f = FormularioContenedor::nuevo();
        f.nombre = "C1".into();
        f.direccion = "x".into();
        assert!(f.preparar_envio().is_none());
        assert_eq!(f.fase, FaseFormulario::EsperandoUbicacion);
        assert!(f.error_de("ubicacion").is_some());
    }

    #[test]
    fn valid_form_yields_payload() {
        let mut f = formulario_valido();
        let carga = f.preparar_envio().unwrap();
        assert_eq!(f.fase, FaseFormulario::ListoParaEnviar);
        assert_eq!(carga.capacidad_litros, 3300);
        assert_eq!(carga.nombre, "Plaza Colón");
        assert!((carga.latitud - -17.383).abs() < f64::EPSILON);
    }

    #[test]
    fn picking_location_leaves_awaiting_state() {
        let mut f = FormularioContenedor::nuevo();
        f.nombre = "C1".into();
        f.direccion = "x".into();
        let _ = f.preparar_envio();
        assert_eq!(f.fase, FaseFormulario::EsperandoUbicacion);
        f.fijar_ubicacion(-17.4, -66.2);
        assert_eq!(f.fase, FaseFormulario::Editando);
        assert!(f.preparar_envio().is_some());
    }

    #[test]
    fn server_errors_keep_values_and_show_verbatim() {
        let mut f = formulario_valido();
        let _ = f.preparar_envio().unwrap();
        f.aplicar_errores_servidor(vec![(
            "numero".into(),
            "contenedor con este numero ya existe.".into(),
        )]);
        assert_eq!(f.fase, FaseFormulario::Invalido);
        assert_eq!(
            f.error_de("numero"),
            Some("contenedor con este numero ya existe.")
        );
        assert_eq!(f.nombre, "Plaza Colón");
    }

    #[test]
    fn editing_prefills_from_container() {
        let c = Contenedor {
            id: 9,
            numero: 9,
            nombre: "C9".into(),
            direccion: "y".into(),
            capacidad_litros: 2400,
            nivel_actual: 10,
            estado: Estado::Mantenimiento,
            latitud: Some(-17.0),
            longitud: Some(-66.0),
            fecha_instalacion: None,
        };
        let f = FormularioContenedor::editar(&c);
        assert_eq!(f.editando_id, Some(9));
        assert_eq!(f.capacidad_litros, "2400");
        assert_eq!(f.estado, Estado::Mantenimiento);
        assert_eq!(f.fase, FaseFormulario::Editando);
    }

    #[test]
    fn touch_clears_previous_errors() {
        let mut f = formulario_valido();
        f.nombre.clear();
        let _ = f.preparar_envio();
        assert!(!f.errores.is_empty());
        f.tocar();
        assert!(f.errores.is_empty());
        assert_eq!(f.fase, FaseFormulario::Editando);
    }
}
