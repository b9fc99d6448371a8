//! Fill-level band classification and fleet metrics.
//!
//! Pure functions over a container snapshot. Every view (tables, map
//! markers, charts, exports) classifies through [`Banda::of`] so the
//! thresholds live in exactly one place.

use crate::model::Contenedor;

/// Warning threshold: levels at or above are `Advertencia`.
pub const UMBRAL_ADVERTENCIA: u8 = 60;
/// Critical threshold: levels at or above are `Critico`.
pub const UMBRAL_CRITICO: u8 = 80;

/// Fill-level band. Lower bound inclusive, upper bound exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Banda {
    /// `nivel < 60`
    Normal,
    /// `60 <= nivel < 80`
    Advertencia,
    /// `nivel >= 80`
    Critico,
}

impl Banda {
    /// Classify a fill percentage.
    pub const fn of(nivel: u8) -> Self {
        if nivel >= UMBRAL_CRITICO {
            Self::Critico
        } else if nivel >= UMBRAL_ADVERTENCIA {
            Self::Advertencia
        } else {
            Self::Normal
        }
    }

    /// Label used in exports and the distribution chart. Derived from the
    /// fill level, not the container's lifecycle `estado`.
    pub const fn etiqueta(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Advertencia => "Alerta",
            Self::Critico => "Crítico",
        }
    }
}

/// Container counts per band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConteoBandas {
    pub normal: u32,
    pub advertencia: u32,
    pub critico: u32,
}

/// Count containers per fill-level band.
pub fn conteo_por_banda(contenedores: &[Contenedor]) -> ConteoBandas {
    let mut conteo = ConteoBandas::default();
    for c in contenedores {
        match Banda::of(c.nivel_actual) {
            Banda::Normal => conteo.normal += 1,
            Banda::Advertencia => conteo.advertencia += 1,
            Banda::Critico => conteo.critico += 1,
        }
    }
    conteo
}

/// Arithmetic mean of `nivel_actual`, rounded to the nearest integer.
/// Returns 0 for an empty snapshot.
pub fn nivel_promedio(contenedores: &[Contenedor]) -> u32 {
    if contenedores.is_empty() {
        return 0;
    }
    let suma: u64 = contenedores.iter().map(|c| u64::from(c.nivel_actual)).sum();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        (suma as f64 / contenedores.len() as f64).round() as u32
    }
}

/// Total litres currently held across the fleet. Each container's share is
/// rounded before summing.
pub fn capacidad_usada(contenedores: &[Contenedor]) -> u64 {
    contenedores.iter().map(Contenedor::litros_usados).sum()
}

/// Total installed capacity in litres.
pub fn capacidad_total(contenedores: &[Contenedor]) -> u64 {
    contenedores
        .iter()
        .map(|c| u64::from(c.capacidad_litros))
        .sum()
}

/// Aggregate dashboard figures computed from one snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResumenFlota {
    pub total: u32,
    /// Containers at or above the warning threshold.
    pub alertas: u32,
    /// Containers at or above the critical threshold.
    pub criticos: u32,
    pub nivel_promedio: u32,
    pub capacidad_total: u64,
    pub capacidad_usada: u64,
    /// Used capacity as a percentage of total, 0 when the fleet is empty.
    pub ocupacion_pct: u32,
}

impl ResumenFlota {
    pub fn calcular(contenedores: &[Contenedor]) -> Self {
        let conteo = conteo_por_banda(contenedores);
        let capacidad_total = capacidad_total(contenedores);
        let capacidad_usada = capacidad_usada(contenedores);
        let ocupacion_pct = if capacidad_total == 0 {
            0
        } else {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            {
                (capacidad_usada as f64 / capacidad_total as f64 * 100.0).round() as u32
            }
        };
        #[allow(clippy::cast_possible_truncation)]
        Self {
            total: contenedores.len() as u32,
            alertas: conteo.advertencia + conteo.critico,
            criticos: conteo.critico,
            nivel_promedio: nivel_promedio(contenedores),
            capacidad_total,
            capacidad_usada,
            ocupacion_pct,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::Estado;

    fn cont(nivel: u8, capacidad: u32) -> Contenedor {
        Contenedor {
            id: i64::from(nivel),
            numero: 1,
            nombre: "C".into(),
            direccion: "x".into(),
            capacidad_litros: capacidad,
            nivel_actual: nivel,
            estado: Estado::Activo,
            latitud: None,
            longitud: None,
            fecha_instalacion: None,
        }
    }

    #[test]
    fn band_boundaries_are_exact() {
        assert_eq!(Banda::of(0), Banda::Normal);
        assert_eq!(Banda::of(59), Banda::Normal);
        assert_eq!(Banda::of(60), Banda::Advertencia);
        assert_eq!(Banda::of(79), Banda::Advertencia);
        assert_eq!(Banda::of(80), Banda::Critico);
        assert_eq!(Banda::of(100), Banda::Critico);
    }

    #[test]
    fn conteo_por_banda_counts_each_band() {
        let flota = vec![cont(10, 100), cont(60, 100), cont(79, 100), cont(95, 100)];
        let conteo = conteo_por_banda(&flota);
        assert_eq!(
            conteo,
            ConteoBandas {
                normal: 1,
                advertencia: 2,
                critico: 1
            }
        );
    }

    #[test]
    fn nivel_promedio_empty_is_zero() {
        assert_eq!(nivel_promedio(&[]), 0);
    }

    #[test]
    fn nivel_promedio_rounds() {
        assert_eq!(nivel_promedio(&[cont(50, 100), cont(100, 100)]), 75);
        // 10 + 15 = 25 / 2 = 12.5 -> 13
        assert_eq!(nivel_promedio(&[cont(10, 100), cont(15, 100)]), 13);
    }

    #[test]
    fn capacidad_usada_single_container() {
        assert_eq!(capacidad_usada(&[cont(50, 1000)]), 500);
    }

    #[test]
    fn capacidad_usada_rounds_per_container_before_summing() {
        // 0.5 L each rounds to 1 L each, so 2 L total rather than round(1.0)
        let flota = vec![cont(1, 50), cont(1, 50)];
        assert_eq!(capacidad_usada(&flota), 2);
    }

    #[test]
    fn resumen_flota_aggregates() {
        let flota = vec![cont(50, 1000), cont(60, 1000), cont(90, 1000)];
        let resumen = ResumenFlota::calcular(&flota);
        assert_eq!(resumen.total, 3);
        assert_eq!(resumen.alertas, 2);
        assert_eq!(resumen.criticos, 1);
        assert_eq!(resumen.nivel_promedio, 67);
        assert_eq!(resumen.capacidad_total, 3000);
        assert_eq!(resumen.capacidad_usada, 2000);
        assert_eq!(resumen.ocupacion_pct, 67);
    }

    #[test]
    fn resumen_flota_empty_is_all_zero() {
        assert_eq!(ResumenFlota::calcular(&[]), ResumenFlota::default());
    }

    #[test]
    fn functions_are_stateless() {
        let flota = vec![cont(42, 3300)];
        let a = ResumenFlota::calcular(&flota);
        let b = ResumenFlota::calcular(&flota);
        assert_eq!(a, b);
    }
}
