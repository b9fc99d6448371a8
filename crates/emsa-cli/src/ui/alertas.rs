//! Alerts view: chronological list with unread emphasis and per-severity
//! colors.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};

use emsa_core::model::Alerta;

use crate::app::App;
use crate::ui::theme::color_severidad;

pub fn draw(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(3)])
        .split(area);

    draw_resumen(frame, app, chunks[0]);
    draw_lista(frame, app, chunks[1]);
}

fn draw_resumen(frame: &mut Frame, app: &App, area: Rect) {
    let filtro = if app.solo_no_leidas {
        "solo no leídas"
    } else {
        "todas"
    };
    let resumen = Paragraph::new(Line::from(vec![
        Span::styled(
            format!("{} sin leer", app.alertas_no_leidas()),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" de {} alertas | mostrando: {filtro}", app.alertas.len())),
    ]));
    frame.render_widget(resumen, area);
}

fn draw_lista(frame: &mut Frame, app: &App, area: Rect) {
    let visibles = app.alertas_visibles();

    if visibles.is_empty() {
        let mensaje = if app.solo_no_leidas {
            "Sin alertas no leídas"
        } else {
            "Sin alertas"
        };
        let vacio = Paragraph::new(mensaje)
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title("Alertas"));
        frame.render_widget(vacio, area);
        return;
    }

    let items: Vec<ListItem> = visibles
        .iter()
        .enumerate()
        .map(|(i, a)| item_alerta(a, i == app.sel_alerta))
        .collect();

    let lista = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Alertas (r: marcar leída, u: no leídas, d: eliminar)"),
    );
    frame.render_widget(lista, area);
}

fn item_alerta<'a>(alerta: &'a Alerta, seleccionada: bool) -> ListItem<'a> {
    let marca = if alerta.leida { "  " } else { "● " };
    let titulo_style = if alerta.leida {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };

    let mut encabezado = vec![
        Span::styled(marca, Style::default().fg(Color::Yellow)),
        Span::styled(
            format!("[{}] ", alerta.severidad.etiqueta()),
            Style::default().fg(color_severidad(alerta.severidad)),
        ),
        Span::styled(alerta.titulo.as_str(), titulo_style),
        Span::styled(
            format!("  {}", alerta.tipo.etiqueta()),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if !alerta.contenedor_nombre.is_empty() {
        encabezado.push(Span::styled(
            format!("  ({})", alerta.contenedor_nombre),
            Style::default().fg(Color::Cyan),
        ));
    }

    let detalle = Line::from(Span::styled(
        format!("  {}  {}", alerta.fecha_creacion, alerta.descripcion),
        Style::default().fg(Color::DarkGray),
    ));

    let mut item = ListItem::new(vec![Line::from(encabezado), detalle]);
    if seleccionada {
        item = item.style(Style::default().bg(Color::DarkGray));
    }
    item
}
