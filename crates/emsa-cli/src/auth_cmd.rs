//! Auth subcommands: login, logout, status.
//!
//! User-facing output uses writeln! to stdout (this is a CLI binary, not debug output).

use std::io::{self, Write};
use std::sync::Arc;

use emsa_api::{ApiClient, ApiConfig, ApiError, Session, SessionStore};

use crate::config::{AuthConfig, CliConfig};

/// Auth subcommand actions.
#[derive(clap::Subcommand, Debug)]
pub enum AuthAction {
    /// Log in to the EMSA backend.
    Login {
        /// Username.
        #[arg(short, long)]
        username: String,
        /// Password.
        #[arg(short, long)]
        password: String,
    },
    /// Log out and discard stored tokens.
    Logout,
    /// Show current auth status.
    Status,
}

/// Execute an auth subcommand.
pub async fn run(action: AuthAction, config: &mut CliConfig) -> anyhow::Result<()> {
    match action {
        AuthAction::Login { username, password } => login(config, &username, &password).await,
        AuthAction::Logout => logout(config),
        AuthAction::Status => status(config).await,
    }
}

async fn login(config: &mut CliConfig, username: &str, password: &str) -> anyhow::Result<()> {
    let session = Arc::new(SessionStore::new());
    let client = ApiClient::new(
        &ApiConfig {
            base_url: config.api_url(),
        },
        Arc::clone(&session),
    )?;

    let tokens = client.login(username, password).await.map_err(|e| match e {
        ApiError::Unauthorized => anyhow::anyhow!("Usuario o contraseña incorrectos"),
        otro => anyhow::anyhow!("Login failed: {otro}"),
    })?;

    config.auth = Some(AuthConfig {
        username: username.into(),
        access_token: tokens.access,
        refresh_token: tokens.refresh,
    });
    config.save()?;

    let mut out = io::stdout();
    writeln!(out, "Sesión iniciada como {username}")?;
    Ok(())
}

fn logout(config: &mut CliConfig) -> anyhow::Result<()> {
    // The backend has no revocation endpoint; logout is local.
    config.clear_auth();
    config.save()?;
    let mut out = io::stdout();
    writeln!(out, "Sesión cerrada")?;
    Ok(())
}

async fn status(config: &CliConfig) -> anyhow::Result<()> {
    let mut out = io::stdout();
    let Some(auth) = &config.auth else {
        writeln!(out, "Sin sesión activa")?;
        return Ok(());
    };
    writeln!(out, "Sesión activa: {}", auth.username)?;
    writeln!(out, "API: {}", config.api_url())?;

    let session = Arc::new(SessionStore::with_session(Session {
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
    match client.estadisticas().await {
        Ok(stats) => {
            writeln!(out, "Contenedores: {}", stats.total_contenedores)?;
            writeln!(out, "Nivel promedio: {:.1}%", stats.nivel_promedio)?;
            writeln!(out, "Alertas activas: {}", stats.alertas_activas)?;
        }
        Err(e) => writeln!(out, "No se pudo consultar el servidor: {e}")?,
    }
    Ok(())
}
