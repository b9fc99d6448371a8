//! EMSA Monitor CLI
//!
//! Terminal dashboard for the EMSA waste-container monitoring backend.
//! Without a subcommand it opens the interactive TUI; subcommands handle
//! auth and one-shot report export.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;

use emsa_cli::auth_cmd::{self, AuthAction};
use emsa_cli::config::CliConfig;
use emsa_cli::config_cmd::{self, ConfigArgs};
use emsa_cli::export_cmd::{self, FormatoExporte};
use emsa_cli::tui;
use emsa_core::tracing_init::init_tracing;

#[derive(Parser, Debug)]
#[command(name = "emsa")]
#[command(version, about = "EMSA container monitoring dashboard", long_about = None)]
struct Cli {
    /// Backend API base URL (overrides the stored config)
    #[arg(long)]
    api_url: Option<String>,

    /// Emit structured JSON log lines instead of the human-readable format
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(flatten)]
    Auth(AuthAction),

    /// Show or edit the monitor settings (refresh interval, thresholds,
    /// notification toggles).
    Config(ConfigArgs),

    /// Export the container report without opening the dashboard.
    Export {
        /// Output format.
        #[arg(long, value_enum, default_value = "csv")]
        formato: FormatoExporte,

        /// Output file (defaults to informe_contenedores_<fecha>.<ext>)
        #[arg(long)]
        salida: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Quieter default in TUI mode so stray log lines don't tear the screen
    let is_tui = cli.command.is_none();
    let default_filter = if is_tui { "emsa=warn" } else { "emsa=info" };
    init_tracing(default_filter, cli.log_json);

    info!(version = env!("CARGO_PKG_VERSION"), "Starting emsa CLI");

    let mut config = CliConfig::load();
    if let Some(api_url) = cli.api_url {
        config.api_url = Some(api_url);
    }

    match cli.command {
        Some(Command::Auth(action)) => auth_cmd::run(action, &mut config).await,
        Some(Command::Config(args)) => config_cmd::run(&args, &mut config),
        Some(Command::Export { formato, salida }) => {
            export_cmd::run(&config, formato, salida).await
        }
        None => tui::run(config).await,
    }
}
