//! Reports view: band distribution chart and export shortcuts.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph};

use emsa_core::metrics::{Banda, conteo_por_banda};

use crate::app::App;
use crate::ui::theme::color_banda;

pub fn draw(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(6)])
        .split(area);

    draw_distribucion(frame, app, chunks[0]);
    draw_exportes(frame, app, chunks[1]);
}

fn draw_distribucion(frame: &mut Frame, app: &App, area: Rect) {
    let conteo = conteo_por_banda(&app.contenedores);
    let barras = [
        (Banda::Normal, u64::from(conteo.normal)),
        (Banda::Advertencia, u64::from(conteo.advertencia)),
        (Banda::Critico, u64::from(conteo.critico)),
    ]
    .map(|(banda, valor)| {
        Bar::default()
            .label(Line::from(banda.etiqueta()))
            .value(valor)
            .style(Style::default().fg(color_banda(banda)))
    });

    let grafico = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Distribución por nivel de llenado"),
        )
        .data(BarGroup::default().bars(&barras))
        .bar_width(9)
        .bar_gap(3);

    frame.render_widget(grafico, area);
}

fn draw_exportes(frame: &mut Frame, app: &App, area: Rect) {
    let resumen = app.resumen();
    let lineas = vec![
        Line::from(format!(
            "El informe cubre {} contenedores y {} alertas.",
            resumen.total,
            app.alertas.len()
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                "[c]",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" Exportar CSV    "),
            Span::styled(
                "[t]",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" Exportar informe de texto"),
        ]),
    ];

    let panel = Paragraph::new(lineas).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Exportar"),
    );
    frame.render_widget(panel, area);
}
