//! Login screen shown before any data is fetched.

use ratatui::Frame;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::app::{App, CampoLogin};
use crate::ui::form_overlay::centered_rect;

pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let encabezado = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "EMSA | Monitoreo de Contenedores",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
    ])
    .centered();
    frame.render_widget(encabezado, area);

    let zona = centered_rect(44u16.min(area.width.saturating_sub(4)), 10, area);
    frame.render_widget(Clear, zona);

    let contrasena_oculta = "•".repeat(app.login.contrasena.chars().count());
    let mut lineas = vec![
        Line::from(""),
        campo(
            "Usuario",
            &app.login.usuario,
            app.login.campo == Some(CampoLogin::Usuario),
        ),
        campo(
            "Contraseña",
            &contrasena_oculta,
            app.login.campo == Some(CampoLogin::Contrasena),
        ),
        Line::from(""),
    ];

    if let Some(error) = &app.login.error {
        lineas.push(Line::from(Span::styled(
            format!("  {error}"),
            Style::default().fg(Color::Red),
        )));
    } else if app.login.enviando {
        lineas.push(Line::from(Span::styled(
            "  Iniciando sesión...",
            Style::default().fg(Color::Yellow),
        )));
    } else {
        lineas.push(Line::from(""));
    }

    lineas.push(Line::from(""));
    lineas.push(Line::from(Span::styled(
        "  Tab: campo | Enter: entrar | Ctrl+C: salir",
        Style::default().fg(Color::DarkGray),
    )));

    let panel = Paragraph::new(lineas).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Iniciar sesión")
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(panel, zona);
}

fn campo<'a>(etiqueta: &'a str, valor: &'a str, activo: bool) -> Line<'a> {
    let marcador = if activo { "▶ " } else { "  " };
    let cursor = if activo { "█" } else { "" };
    Line::from(vec![
        Span::styled(marcador, Style::default().fg(Color::Cyan)),
        Span::styled(format!("{etiqueta}: "), Style::default().fg(Color::Cyan)),
        Span::raw(valor),
        Span::styled(cursor, Style::default().fg(Color::White)),
    ])
}
