//! TUI rendering functions.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap};
use unicode_width::UnicodeWidthChar;

use crate::app::{App, AppMode, Vista};
use crate::ui::{alertas, contenedores, dashboard, form_overlay, login, mapa, reportes};

/// Draw the full UI.
pub fn draw(frame: &mut Frame, app: &App) {
    if app.mode == AppMode::Login {
        login::draw(frame, app);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // tabs
            Constraint::Min(5),    // body
            Constraint::Length(1), // status bar
        ])
        .split(frame.area());

    draw_tabs(frame, app, chunks[0]);
    match app.vista {
        Vista::Dashboard => dashboard::draw(frame, app, chunks[1]),
        Vista::Contenedores => contenedores::draw(frame, app, chunks[1]),
        Vista::Mapa => mapa::draw(frame, app, chunks[1]),
        Vista::Alertas => alertas::draw(frame, app, chunks[1]),
        Vista::Reportes => reportes::draw(frame, app, chunks[1]),
    }
    draw_status_bar(frame, app, chunks[2]);

    if app.mode == AppMode::Formulario {
        form_overlay::draw(frame, app);
    }
    if app.mode == AppMode::Confirmar {
        draw_confirmacion(frame, app);
    }
}

fn draw_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titulos: Vec<Line> = Vista::TODAS
        .iter()
        .map(|v| {
            let mut titulo = v.titulo().to_string();
            if *v == Vista::Alertas {
                let sin_leer = app.alertas_no_leidas();
                if sin_leer > 0 {
                    titulo = format!("{titulo} ({sin_leer})");
                }
            }
            Line::from(titulo)
        })
        .collect();

    let tabs = Tabs::new(titulos)
        .select(app.vista.indice())
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .divider(Span::raw("|"));
    frame.render_widget(tabs, area);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    // A failed fetch keeps stale data on screen; say so here.
    let (texto, color) = if let Some(error) = app
        .error_contenedores
        .as_deref()
        .or(app.error_alertas.as_deref())
    {
        (format!("Sin conexión: {error} (datos anteriores)"), Color::Red)
    } else if !app.status.is_empty() {
        (app.status.clone(), Color::DarkGray)
    } else {
        (String::new(), Color::DarkGray)
    };

    let teclas = " | Tab: vista | F5: actualizar | q: salir";
    let texto = truncar(&texto, usize::from(area.width).saturating_sub(teclas.len()));

    let barra = Paragraph::new(Line::from(vec![
        Span::styled(texto, Style::default().fg(color)),
        Span::styled(teclas, Style::default().fg(Color::DarkGray)),
    ]));
    frame.render_widget(barra, area);
}

fn draw_confirmacion(frame: &mut Frame, app: &App) {
    let Some(confirmacion) = &app.confirmacion else {
        return;
    };

    let area = frame.area();
    let ancho = 50u16.min(area.width.saturating_sub(4));
    let zona = form_overlay::centered_rect(ancho, 7, area);
    frame.render_widget(Clear, zona);

    let texto = vec![
        Line::from(confirmacion.mensaje.as_str()),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                "[Y]",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" Eliminar  "),
            Span::styled(
                "[N]",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" Cancelar"),
        ]),
    ];

    let dialogo = Paragraph::new(texto)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Confirmar eliminación")
                .border_style(Style::default().fg(Color::Red)),
        );
    frame.render_widget(dialogo, zona);
}

/// Truncate to a display width, appending `…` when something was cut.
fn truncar(texto: &str, ancho: usize) -> String {
    let mut usado = 0;
    let mut resultado = String::new();
    for c in texto.chars() {
        let w = c.width().unwrap_or(0);
        if usado + w > ancho.saturating_sub(1) {
            resultado.push('…');
            return resultado;
        }
        usado += w;
        resultado.push(c);
    }
    resultado
}
