//! One-shot report export without entering the TUI.
//!
//! Fetches the current snapshot and writes either the CSV or the plain-text
//! report to a file, named the way the web dashboard named its downloads.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::ValueEnum;
use tracing::warn;

use emsa_api::{ApiClient, ApiConfig, SessionStore};
use emsa_core::model::{Alerta, Contenedor};
use emsa_core::report::{InformeContenedores, TextoPlano, csv_contenedores};

use crate::config::CliConfig;

/// Export output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatoExporte {
    Csv,
    Texto,
}

/// Fetch containers and alerts, then write the report file.
pub async fn run(
    config: &CliConfig,
    formato: FormatoExporte,
    salida: Option<PathBuf>,
) -> anyhow::Result<()> {
    let auth = config
        .auth
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("Sin sesión activa. Use `emsa login` primero"))?;

    let session = Arc::new(SessionStore::with_session(emsa_api::Session {
        username: auth.username.clone(),
        access_token: auth.access_token.clone(),
        refresh_token: auth.refresh_token.clone(),
    }));
    let client = ApiClient::new(
        &ApiConfig {
            base_url: config.api_url(),
        },
        session,
    )?;

    let contenedores = client.listar_contenedores().await?;
    // A missing alerts section degrades the report but does not block it.
    let alertas: Vec<Alerta> = match client.listar_alertas().await {
        Ok(alertas) => alertas,
        Err(e) => {
            warn!(error = %e, "no se pudieron cargar las alertas para el informe");
            Vec::new()
        }
    };

    let destino = escribir_informe(&contenedores, &alertas, formato, salida)?;

    let mut out = io::stdout();
    writeln!(out, "Informe escrito en {}", destino.display())?;
    Ok(())
}

/// Write the report file and return its path. Also used by the TUI's
/// reports view, which already holds a snapshot.
pub fn escribir_informe(
    contenedores: &[Contenedor],
    alertas: &[Alerta],
    formato: FormatoExporte,
    salida: Option<PathBuf>,
) -> anyhow::Result<PathBuf> {
    let fecha = chrono::Local::now().format("%Y-%m-%d").to_string();
    let (contenido, extension) = match formato {
        FormatoExporte::Csv => (csv_contenedores(contenedores), "csv"),
        FormatoExporte::Texto => {
            let informe = InformeContenedores::generar(contenedores, alertas, &fecha);
            let mut backend = TextoPlano::default();
            informe.renderizar(&mut backend);
            (backend.terminar(), "txt")
        }
    };

    let destino = salida
        .unwrap_or_else(|| PathBuf::from(format!("informe_contenedores_{fecha}.{extension}")));
    std::fs::write(&destino, contenido)?;
    Ok(destino)
}
