//! Map view: container markers on a canvas plus a detail panel for the
//! selected one. Containers without coordinates never reach this view.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Points};
use ratatui::widgets::{Block, Borders, Paragraph};

use emsa_core::metrics::Banda;
use emsa_core::model::Contenedor;

use crate::app::{App, CENTRO_COCHABAMBA};
use crate::ui::theme::{color_banda, color_estado, color_nivel};

/// Degrees of padding around the outermost markers.
const MARGEN: f64 = 0.005;

pub fn draw(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(30), Constraint::Length(34)])
        .split(area);

    let mapeables = app.con_coordenadas();
    draw_lienzo(frame, &mapeables, app.sel_mapa, chunks[0]);
    draw_detalle(frame, mapeables.get(app.sel_mapa).copied(), chunks[1]);
}

fn draw_lienzo(frame: &mut Frame, mapeables: &[&Contenedor], seleccion: usize, area: Rect) {
    let titulo = format!("Mapa ({} ubicados)", mapeables.len());

    if mapeables.is_empty() {
        let vacio = Paragraph::new("Sin contenedores con ubicación")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title(titulo));
        frame.render_widget(vacio, area);
        return;
    }

    let (x_bounds, y_bounds) = limites(mapeables);
    let puntos_por_banda = |banda: Banda| -> Vec<(f64, f64)> {
        mapeables
            .iter()
            .filter(|c| Banda::of(c.nivel_actual) == banda)
            .filter_map(|c| Some((c.longitud?, c.latitud?)))
            .collect()
    };
    let normales = puntos_por_banda(Banda::Normal);
    let advertencias = puntos_por_banda(Banda::Advertencia);
    let criticos = puntos_por_banda(Banda::Critico);
    let seleccionado = mapeables.get(seleccion).copied();

    let lienzo = Canvas::default()
        .block(Block::default().borders(Borders::ALL).title(titulo))
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(|ctx| {
            ctx.draw(&Points {
                coords: &normales,
                color: color_banda(Banda::Normal),
            });
            ctx.draw(&Points {
                coords: &advertencias,
                color: color_banda(Banda::Advertencia),
            });
            ctx.draw(&Points {
                coords: &criticos,
                color: color_banda(Banda::Critico),
            });
            if let Some(c) = seleccionado
                && let (Some(lat), Some(lon)) = (c.latitud, c.longitud)
            {
                ctx.print(
                    lon,
                    lat,
                    Line::from(Span::styled(
                        "◉",
                        Style::default()
                            .fg(Color::White)
                            .add_modifier(Modifier::BOLD),
                    )),
                );
            }
        });

    frame.render_widget(lienzo, area);
}

/// Bounding box around the markers, padded so edge markers stay visible.
/// Falls back to a window around the city center for a single point.
fn limites(mapeables: &[&Contenedor]) -> ([f64; 2], [f64; 2]) {
    let mut lat_min = f64::MAX;
    let mut lat_max = f64::MIN;
    let mut lon_min = f64::MAX;
    let mut lon_max = f64::MIN;
    for c in mapeables {
        if let (Some(lat), Some(lon)) = (c.latitud, c.longitud) {
            lat_min = lat_min.min(lat);
            lat_max = lat_max.max(lat);
            lon_min = lon_min.min(lon);
            lon_max = lon_max.max(lon);
        }
    }
    if lat_min > lat_max {
        let (lat, lon) = CENTRO_COCHABAMBA;
        return ([lon - MARGEN, lon + MARGEN], [lat - MARGEN, lat + MARGEN]);
    }
    (
        [lon_min - MARGEN, lon_max + MARGEN],
        [lat_min - MARGEN, lat_max + MARGEN],
    )
}

fn draw_detalle(frame: &mut Frame, contenedor: Option<&Contenedor>, area: Rect) {
    let bloque = Block::default().borders(Borders::ALL).title("Detalle");

    let Some(c) = contenedor else {
        let vacio = Paragraph::new("Seleccione un contenedor (↑/↓)")
            .style(Style::default().fg(Color::DarkGray))
            .block(bloque);
        frame.render_widget(vacio, area);
        return;
    };

    let etiqueta = Style::default().fg(Color::Cyan);
    let mut lineas = vec![
        Line::from(Span::styled(
            c.nombre.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Dirección: ", etiqueta),
            Span::raw(c.direccion.clone()),
        ]),
        Line::from(vec![
            Span::styled("Nivel: ", etiqueta),
            Span::styled(
                format!("{}%", c.nivel_actual),
                Style::default().fg(color_nivel(c.nivel_actual)),
            ),
        ]),
        Line::from(vec![
            Span::styled("Capacidad: ", etiqueta),
            Span::raw(format!("{} L ({} L usados)", c.capacidad_litros, c.litros_usados())),
        ]),
        Line::from(vec![
            Span::styled("Estado: ", etiqueta),
            Span::styled(c.estado.etiqueta(), Style::default().fg(color_estado(c.estado))),
        ]),
    ];
    if let (Some(lat), Some(lon)) = (c.latitud, c.longitud) {
        lineas.push(Line::from(vec![
            Span::styled("Ubicación: ", etiqueta),
            Span::raw(format!("{lat:.4}, {lon:.4}")),
        ]));
    }
    if let Some(fecha) = &c.fecha_instalacion {
        lineas.push(Line::from(vec![
            Span::styled("Instalado: ", etiqueta),
            Span::raw(fecha.clone()),
        ]));
    }

    frame.render_widget(Paragraph::new(lineas).block(bloque), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use emsa_core::model::Estado;

    fn cont(lat: f64, lon: f64) -> Contenedor {
        Contenedor {
            id: 1,
            numero: 1,
            nombre: "C".into(),
            direccion: "x".into(),
            capacidad_litros: 3300,
            nivel_actual: 0,
            estado: Estado::Activo,
            latitud: Some(lat),
            longitud: Some(lon),
            fecha_instalacion: None,
        }
    }

    #[test]
    fn bounds_pad_around_markers() {
        let a = cont(-17.38, -66.16);
        let b = cont(-17.40, -66.14);
        let ([lon_min, lon_max], [lat_min, lat_max]) = limites(&[&a, &b]);
        assert!(lon_min < -66.16 && lon_max > -66.14);
        assert!(lat_min < -17.40 && lat_max > -17.38);
    }

    #[test]
    fn single_marker_still_has_a_window() {
        let a = cont(-17.38, -66.16);
        let ([lon_min, lon_max], [lat_min, lat_max]) = limites(&[&a]);
        assert!(lon_max - lon_min > 0.0);
        assert!(lat_max - lat_min > 0.0);
    }
}
