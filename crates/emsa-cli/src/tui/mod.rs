//! Two-thread TUI orchestration.
//!
//! Terminal I/O runs on a dedicated OS thread; polling and API calls stay
//! on the tokio runtime. Communication via `tokio::sync::mpsc` channels.

mod input;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio_util::sync::CancellationToken;

use emsa_api::{ApiClient, ApiConfig, ResourcePoller, Session, SessionStore};
use emsa_core::model::{Alerta, Contenedor};

use crate::app::{App, AppMode};
use crate::config::CliConfig;
use crate::ui;

/// Terminal events forwarded from the UI reader thread.
pub enum TermEvent {
    Key(crossterm::event::KeyEvent),
    Resize(u16, u16),
}

/// Everything the input handler needs besides the app state.
pub struct Servicios {
    pub client: Arc<ApiClient>,
    pub contenedores: ResourcePoller<Contenedor>,
    pub alertas: ResourcePoller<Alerta>,
    pub config: CliConfig,
}

impl Servicios {
    /// Nudge both pollers to fetch out of band.
    pub fn refrescar(&self) {
        self.contenedores.refresh_now();
        self.alertas.refresh_now();
    }
}

/// Run the interactive TUI mode.
///
/// Seeds the session from the stored config, spawns the pollers, enters raw
/// mode, spawns a dedicated terminal reader thread, and runs the main
/// `select!` loop until the user quits.
pub async fn run(config: CliConfig) -> anyhow::Result<()> {
    let session = match &config.auth {
        Some(auth) => Arc::new(SessionStore::with_session(Session {
            username: auth.username.clone(),
            access_token: auth.access_token.clone(),
            refresh_token: auth.refresh_token.clone(),
        })),
        None => Arc::new(SessionStore::new()),
    };
    let client = Arc::new(ApiClient::new(
        &ApiConfig {
            base_url: config.api_url(),
        },
        Arc::clone(&session),
    )?);

    let periodo = Duration::from_secs(config.monitor.intervalo_actualizacion_segs.max(1));
    let client_contenedores = Arc::clone(&client);
    let poller_contenedores = ResourcePoller::spawn(
        move || {
            let client = Arc::clone(&client_contenedores);
            async move { client.listar_contenedores().await }
        },
        periodo,
    );
    let client_alertas = Arc::clone(&client);
    let poller_alertas = ResourcePoller::spawn(
        move || {
            let client = Arc::clone(&client_alertas);
            async move { client.listar_alertas().await }
        },
        periodo,
    );

    let mut servicios = Servicios {
        client,
        contenedores: poller_contenedores,
        alertas: poller_alertas,
        config,
    };

    let mut app = App::new();
    if session.activa() {
        app.mode = AppMode::Normal;
        if let Some(usuario) = session.username() {
            app.status = format!("Conectado como {usuario}");
        }
    }

    // Enter raw mode, create terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Dedicated OS thread for crossterm::event::read()
    let cancel = CancellationToken::new();
    let (term_tx, mut term_rx) = tokio::sync::mpsc::channel::<TermEvent>(64);
    let cancel_clone = cancel.clone();
    let ui_thread = std::thread::spawn(move || {
        loop {
            if cancel_clone.is_cancelled() {
                break;
            }
            // Poll with 50ms timeout so we can check cancellation
            if event::poll(Duration::from_millis(50)).unwrap_or(false) {
                match event::read() {
                    Ok(Event::Key(key)) => {
                        // Filter out Release events (Windows emits Press + Release per keystroke)
                        if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
                            continue;
                        }
                        if term_tx.blocking_send(TermEvent::Key(key)).is_err() {
                            break;
                        }
                    }
                    Ok(Event::Resize(w, h)) => {
                        if term_tx.blocking_send(TermEvent::Resize(w, h)).is_err() {
                            break;
                        }
                    }
                    _ => {}
                }
            }
        }
    });

    let mut tick = tokio::time::interval(Duration::from_millis(50));
    let result: anyhow::Result<()> = loop {
        tokio::select! {
            _ = tick.tick() => {
                if app.mode != AppMode::Login {
                    app.aplicar_contenedores(&servicios.contenedores.instantanea());
                    app.aplicar_alertas(&servicios.alertas.instantanea());
                }
                terminal.draw(|f| ui::draw(f, &app))?;
            }
            Some(term_event) = term_rx.recv() => {
                input::handle_term_event(&mut app, &mut servicios, term_event).await;
            }
        }
        if app.should_quit {
            break Ok(());
        }
    };

    // Shutdown: signal UI thread to stop, then the pollers
    cancel.cancel();
    let _ = ui_thread.join(); // fast, bounded by the poll timeout
    servicios.contenedores.stop();
    servicios.alertas.stop();

    // Restore terminal
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    result
}
