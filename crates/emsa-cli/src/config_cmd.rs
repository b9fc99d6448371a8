//! Config subcommand: show and edit the monitor settings snapshot.
//!
//! The threshold fields are a saved operator preference only; band
//! classification stays on the fixed 60/80 thresholds (see
//! `emsa_core::metrics`). Only the refresh interval is read back, at startup.

use std::io::{self, Write};

use emsa_core::settings::MonitorSettings;

use crate::config::CliConfig;

/// Settings fields editable from the command line. Without any flag the
/// current snapshot is printed.
#[derive(clap::Args, Debug, Default)]
pub struct ConfigArgs {
    /// Poll cadence for containers and alerts, in seconds (minimum 1).
    #[arg(long)]
    pub intervalo: Option<u64>,

    /// Saved warning threshold preference, percent (0-100).
    #[arg(long)]
    pub nivel_alerta: Option<u8>,

    /// Saved critical threshold preference, percent (0-100).
    #[arg(long)]
    pub nivel_critico: Option<u8>,

    /// Enable or disable email notifications.
    #[arg(long)]
    pub notificaciones_email: Option<bool>,

    /// Enable or disable push notifications.
    #[arg(long)]
    pub notificaciones_push: Option<bool>,
}

impl ConfigArgs {
    fn vacio(&self) -> bool {
        self.intervalo.is_none()
            && self.nivel_alerta.is_none()
            && self.nivel_critico.is_none()
            && self.notificaciones_email.is_none()
            && self.notificaciones_push.is_none()
    }
}

/// Execute the config subcommand: apply the given fields and persist, or
/// print the current snapshot when no field was given.
pub fn run(args: &ConfigArgs, config: &mut CliConfig) -> anyhow::Result<()> {
    let mut out = io::stdout();
    if !args.vacio() {
        aplicar(args, &mut config.monitor)?;
        config.save()?;
        writeln!(out, "Configuración guardada")?;
    }
    mostrar(&mut out, &config.monitor)?;
    Ok(())
}

/// Apply the non-empty fields onto the settings snapshot, validating ranges.
pub fn aplicar(args: &ConfigArgs, monitor: &mut MonitorSettings) -> anyhow::Result<()> {
    if let Some(segs) = args.intervalo {
        anyhow::ensure!(segs >= 1, "el intervalo debe ser al menos 1 segundo");
        monitor.intervalo_actualizacion_segs = segs;
    }
    if let Some(nivel) = args.nivel_alerta {
        anyhow::ensure!(nivel <= 100, "nivel-alerta debe estar entre 0 y 100");
        monitor.nivel_alerta = nivel;
    }
    if let Some(nivel) = args.nivel_critico {
        anyhow::ensure!(nivel <= 100, "nivel-critico debe estar entre 0 y 100");
        monitor.nivel_critico = nivel;
    }
    if let Some(activo) = args.notificaciones_email {
        monitor.notificaciones_email = activo;
    }
    if let Some(activo) = args.notificaciones_push {
        monitor.notificaciones_push = activo;
    }
    Ok(())
}

fn mostrar(out: &mut impl Write, monitor: &MonitorSettings) -> io::Result<()> {
    writeln!(
        out,
        "Intervalo de actualización: {} s",
        monitor.intervalo_actualizacion_segs
    )?;
    writeln!(out, "Nivel de alerta: {}%", monitor.nivel_alerta)?;
    writeln!(out, "Nivel crítico: {}%", monitor.nivel_critico)?;
    writeln!(
        out,
        "Notificaciones email: {}",
        if monitor.notificaciones_email { "sí" } else { "no" }
    )?;
    writeln!(
        out,
        "Notificaciones push: {}",
        if monitor.notificaciones_push { "sí" } else { "no" }
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_args_leave_settings_untouched() {
        let args = ConfigArgs::default();
        assert!(args.vacio());
        let mut monitor = MonitorSettings::default();
        aplicar(&args, &mut monitor).unwrap();
        assert_eq!(monitor, MonitorSettings::default());
    }

    #[test]
    fn fields_apply_independently() {
        let args = ConfigArgs {
            intervalo: Some(15),
            notificaciones_push: Some(false),
            ..ConfigArgs::default()
        };
        let mut monitor = MonitorSettings::default();
        aplicar(&args, &mut monitor).unwrap();
        assert_eq!(monitor.intervalo_actualizacion_segs, 15);
        assert!(!monitor.notificaciones_push);
        // unspecified fields keep their values
        assert_eq!(monitor.nivel_alerta, 60);
        assert!(monitor.notificaciones_email);
    }

    #[test]
    fn zero_interval_is_rejected() {
        let args = ConfigArgs {
            intervalo: Some(0),
            ..ConfigArgs::default()
        };
        let mut monitor = MonitorSettings::default();
        assert!(aplicar(&args, &mut monitor).is_err());
        assert_eq!(monitor.intervalo_actualizacion_segs, 30);
    }

    #[test]
    fn thresholds_above_100_are_rejected() {
        for args in [
            ConfigArgs {
                nivel_alerta: Some(101),
                ..ConfigArgs::default()
            },
            ConfigArgs {
                nivel_critico: Some(255),
                ..ConfigArgs::default()
            },
        ] {
            let mut monitor = MonitorSettings::default();
            assert!(aplicar(&args, &mut monitor).is_err());
        }
    }

    #[test]
    fn saved_thresholds_do_not_move_the_bands() {
        let args = ConfigArgs {
            nivel_alerta: Some(10),
            nivel_critico: Some(20),
            ..ConfigArgs::default()
        };
        let mut monitor = MonitorSettings::default();
        aplicar(&args, &mut monitor).unwrap();
        assert_eq!(monitor.nivel_alerta, 10);
        // classification stays on the fixed thresholds
        use emsa_core::metrics::Banda;
        assert_eq!(Banda::of(15), Banda::Normal);
        assert_eq!(Banda::of(60), Banda::Advertencia);
    }
}
