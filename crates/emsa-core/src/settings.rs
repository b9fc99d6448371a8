//! Monitor settings snapshot.
//!
//! Persisted alongside the CLI config. The threshold fields are a saved
//! operator preference only: band classification stays on the fixed 60/80
//! thresholds in [`crate::metrics`] and never reads them back. The refresh
//! interval is the one field consumed at startup.

use serde::{Deserialize, Serialize};

/// Operator-facing configuration snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorSettings {
    /// Saved warning threshold preference (write-only, see module docs).
    pub nivel_alerta: u8,
    /// Saved critical threshold preference (write-only, see module docs).
    pub nivel_critico: u8,
    /// Poll cadence for the container and alert pollers, in seconds.
    pub intervalo_actualizacion_segs: u64,
    pub notificaciones_email: bool,
    pub notificaciones_push: bool,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            nivel_alerta: 60,
            nivel_critico: 80,
            intervalo_actualizacion_segs: 30,
            notificaciones_email: true,
            notificaciones_push: true,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_dashboard_cadence() {
        let s = MonitorSettings::default();
        assert_eq!(s.intervalo_actualizacion_segs, 30);
        assert_eq!(s.nivel_alerta, 60);
        assert_eq!(s.nivel_critico, 80);
    }

    #[test]
    fn settings_roundtrip_json() {
        let s = MonitorSettings {
            nivel_alerta: 55,
            nivel_critico: 85,
            intervalo_actualizacion_segs: 60,
            notificaciones_email: false,
            notificaciones_push: true,
        };
        let json = serde_json::to_string(&s).unwrap();
        let cargado: MonitorSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(cargado, s);
    }
}
