//! Containers view: search bar plus the full container table.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use crate::app::{App, AppMode};
use crate::ui::dashboard::barra_nivel;
use crate::ui::theme::{color_estado, color_nivel};

pub fn draw(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(4)])
        .split(area);

    draw_busqueda(frame, app, chunks[0]);
    draw_tabla(frame, app, chunks[1]);
}

fn draw_busqueda(frame: &mut Frame, app: &App, area: Rect) {
    let activo = app.mode == AppMode::Buscando;
    let cursor = if activo { "█" } else { "" };
    let busqueda = Paragraph::new(Line::from(vec![
        Span::raw(app.busqueda.as_str()),
        Span::styled(cursor, Style::default().fg(Color::White)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(if activo {
                "Buscar (Enter: aplicar, Esc: limpiar)"
            } else {
                "Buscar (/)"
            })
            .border_style(if activo {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default()
            }),
    );
    frame.render_widget(busqueda, area);
}

fn draw_tabla(frame: &mut Frame, app: &App, area: Rect) {
    let filtrados = app.contenedores_filtrados();
    let titulo = format!("Contenedores ({})", filtrados.len());

    if filtrados.is_empty() {
        let mensaje = if app.busqueda.trim().is_empty() {
            "Sin contenedores registrados"
        } else {
            "Sin resultados para la búsqueda"
        };
        let vacio = Paragraph::new(mensaje)
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title(titulo));
        frame.render_widget(vacio, area);
        return;
    }

    let filas: Vec<Row> = filtrados
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let fila = Row::new(vec![
                Cell::from(format!("#{}", c.numero)),
                Cell::from(c.nombre.clone()),
                Cell::from(c.direccion.clone()),
                Cell::from(barra_nivel(c.nivel_actual))
                    .style(Style::default().fg(color_nivel(c.nivel_actual))),
                Cell::from(format!("{} L", c.capacidad_litros)),
                Cell::from(c.estado.etiqueta()).style(Style::default().fg(color_estado(c.estado))),
            ]);
            if i == app.sel_contenedor {
                fila.style(
                    Style::default()
                        .bg(Color::DarkGray)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                fila
            }
        })
        .collect();

    let tabla = Table::new(
        filas,
        [
            Constraint::Length(6),
            Constraint::Percentage(22),
            Constraint::Percentage(32),
            Constraint::Length(16),
            Constraint::Length(9),
            Constraint::Min(10),
        ],
    )
    .header(
        Row::new(vec![
            "Nº",
            "Nombre",
            "Dirección",
            "Nivel",
            "Capacidad",
            "Estado",
        ])
        .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(Block::default().borders(Borders::ALL).title(titulo));

    frame.render_widget(tabla, area);
}
