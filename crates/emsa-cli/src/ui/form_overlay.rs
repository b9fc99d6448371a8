//! Container create/edit overlay.
//!
//! Two faces: the field editor, and a location-picking canvas that reuses
//! the map's band colors so the new marker lands in context.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Points};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::{App, CampoFormulario, FormularioActivo};
use crate::ui::theme::color_nivel;

pub fn draw(frame: &mut Frame, app: &App) {
    let Some(formulario) = &app.formulario else {
        return;
    };

    let area = frame.area();
    let ancho = 56u16.min(area.width.saturating_sub(4));
    let alto = 16u16.min(area.height.saturating_sub(2));
    let zona = centered_rect(ancho, alto, area);

    frame.render_widget(Clear, zona);

    if formulario.eligiendo_ubicacion {
        draw_mapa_ubicacion(frame, app, formulario, zona);
    } else {
        draw_campos(frame, formulario, zona);
    }
}

fn draw_campos(frame: &mut Frame, formulario: &FormularioActivo, zona: Rect) {
    let titulo = if formulario.datos.editando_id.is_some() {
        "Editar contenedor"
    } else {
        "Nuevo contenedor"
    };

    let ubicacion = match (formulario.datos.latitud, formulario.datos.longitud) {
        (Some(lat), Some(lon)) => format!("{lat:.4}, {lon:.4}"),
        _ => "sin elegir".to_string(),
    };

    let mut lineas = vec![
        linea_campo(
            "Nombre",
            &formulario.datos.nombre,
            formulario.campo == CampoFormulario::Nombre,
        ),
        linea_campo(
            "Dirección",
            &formulario.datos.direccion,
            formulario.campo == CampoFormulario::Direccion,
        ),
        linea_campo(
            "Capacidad (L)",
            &formulario.datos.capacidad_litros,
            formulario.campo == CampoFormulario::CapacidadLitros,
        ),
        linea_campo(
            "Estado (Space)",
            formulario.datos.estado.etiqueta(),
            formulario.campo == CampoFormulario::Estado,
        ),
        Line::from(vec![
            Span::styled("  Ubicación: ", Style::default().fg(Color::Cyan)),
            Span::raw(ubicacion),
        ]),
    ];

    if !formulario.datos.errores.is_empty() {
        lineas.push(Line::from(""));
        for error in &formulario.datos.errores {
            lineas.push(Line::from(Span::styled(
                format!("  ✗ {}", error.mensaje),
                Style::default().fg(Color::Red),
            )));
        }
    }

    lineas.push(Line::from(""));
    lineas.push(Line::from(Span::styled(
        "Tab: campo | F2: mapa | Enter: guardar | Esc: cancelar",
        Style::default().fg(Color::DarkGray),
    )));

    let panel = Paragraph::new(lineas)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(titulo)
                .border_style(Style::default().fg(Color::Cyan)),
        );
    frame.render_widget(panel, zona);
}

fn linea_campo<'a>(etiqueta: &'a str, valor: &'a str, activo: bool) -> Line<'a> {
    let marcador = if activo { "▶ " } else { "  " };
    let estilo_valor = if activo {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let cursor = if activo { "█" } else { "" };
    Line::from(vec![
        Span::styled(marcador, Style::default().fg(Color::Cyan)),
        Span::styled(format!("{etiqueta}: "), Style::default().fg(Color::Cyan)),
        Span::styled(valor, estilo_valor),
        Span::styled(cursor, Style::default().fg(Color::White)),
    ])
}

fn draw_mapa_ubicacion(frame: &mut Frame, app: &App, formulario: &FormularioActivo, zona: Rect) {
    let (lat, lon) = formulario.cursor;
    let margen = 0.01;
    let existentes: Vec<(f64, f64, u8)> = app
        .con_coordenadas()
        .iter()
        .filter_map(|c| Some((c.longitud?, c.latitud?, c.nivel_actual)))
        .collect();

    let lienzo = Canvas::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(
                    "Elegir ubicación {lat:.4}, {lon:.4} (flechas, Enter: fijar, Esc: volver)"
                ))
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .x_bounds([lon - margen, lon + margen])
        .y_bounds([lat - margen, lat + margen])
        .paint(move |ctx| {
            for (x, y, nivel) in &existentes {
                ctx.draw(&Points {
                    coords: &[(*x, *y)],
                    color: color_nivel(*nivel),
                });
            }
            ctx.print(
                lon,
                lat,
                Line::from(Span::styled(
                    "✚",
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )),
            );
        });

    frame.render_widget(lienzo, zona);
}

/// Center a `width` x `height` rect inside `area`.
pub(crate) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
