//! Dashboard view: fleet stat cards, occupancy gauge and the containers
//! that most urgently need collection.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Table};

use emsa_core::metrics::Banda;
use emsa_core::model::Contenedor;

use crate::app::App;
use crate::ui::theme::{color_banda, color_nivel};

pub fn draw(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // stat cards
            Constraint::Length(3), // occupancy gauge
            Constraint::Min(4),    // urgent containers
        ])
        .split(area);

    draw_tarjetas(frame, app, chunks[0]);
    draw_ocupacion(frame, app, chunks[1]);
    draw_urgentes(frame, app, chunks[2]);
}

fn draw_tarjetas(frame: &mut Frame, app: &App, area: Rect) {
    let resumen = app.resumen();
    let tarjetas: [(&str, String, Color); 4] = [
        ("Contenedores", resumen.total.to_string(), Color::Cyan),
        ("En alerta", resumen.alertas.to_string(), Color::Yellow),
        ("Críticos", resumen.criticos.to_string(), Color::Red),
        (
            "Nivel promedio",
            format!("{}%", resumen.nivel_promedio),
            color_nivel(nivel_u8(resumen.nivel_promedio)),
        ),
    ];

    let columnas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    for ((titulo, valor, color), celda) in tarjetas.into_iter().zip(columnas.iter()) {
        let tarjeta = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                valor,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
        ])
        .centered()
        .block(Block::default().borders(Borders::ALL).title(titulo));
        frame.render_widget(tarjeta, *celda);
    }
}

fn draw_ocupacion(frame: &mut Frame, app: &App, area: Rect) {
    let resumen = app.resumen();
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(format!(
            "Capacidad usada ({} / {} L)",
            resumen.capacidad_usada, resumen.capacidad_total
        )))
        .gauge_style(Style::default().fg(color_nivel(nivel_u8(resumen.ocupacion_pct))))
        .percent(resumen.ocupacion_pct.min(100) as u16);
    frame.render_widget(gauge, area);
}

/// Containers at or above the warning threshold, fullest first.
fn draw_urgentes(frame: &mut Frame, app: &App, area: Rect) {
    let mut urgentes: Vec<&Contenedor> = app
        .contenedores
        .iter()
        .filter(|c| Banda::of(c.nivel_actual) != Banda::Normal)
        .collect();
    urgentes.sort_by(|a, b| b.nivel_actual.cmp(&a.nivel_actual));

    if urgentes.is_empty() {
        let vacio = Paragraph::new("Sin contenedores en alerta")
            .style(Style::default().fg(Color::DarkGray))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Requieren atención"),
            );
        frame.render_widget(vacio, area);
        return;
    }

    let filas: Vec<Row> = urgentes
        .iter()
        .map(|c| {
            let banda = Banda::of(c.nivel_actual);
            Row::new(vec![
                Cell::from(c.nombre.clone()),
                Cell::from(c.direccion.clone()),
                Cell::from(barra_nivel(c.nivel_actual))
                    .style(Style::default().fg(color_banda(banda))),
                Cell::from(banda.etiqueta()).style(Style::default().fg(color_banda(banda))),
            ])
        })
        .collect();

    let tabla = Table::new(
        filas,
        [
            Constraint::Percentage(25),
            Constraint::Percentage(35),
            Constraint::Percentage(25),
            Constraint::Percentage(15),
        ],
    )
    .header(
        Row::new(vec!["Nombre", "Dirección", "Nivel", "Estado"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title("Requieren atención"),
    );

    frame.render_widget(tabla, area);
}

/// Text bar like `▓▓▓▓▓░░░░░ 52%`.
pub(crate) fn barra_nivel(nivel: u8) -> String {
    let llenos = usize::from(nivel.min(100)) / 10;
    let mut barra = String::new();
    for i in 0..10 {
        barra.push(if i < llenos { '▓' } else { '░' });
    }
    format!("{barra} {nivel:>3}%")
}

fn nivel_u8(pct: u32) -> u8 {
    pct.min(100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn barra_nivel_scales() {
        assert_eq!(barra_nivel(0), "░░░░░░░░░░   0%");
        assert_eq!(barra_nivel(100), "▓▓▓▓▓▓▓▓▓▓ 100%");
        assert!(barra_nivel(52).starts_with("▓▓▓▓▓░"));
    }
}
