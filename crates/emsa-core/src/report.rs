//! Deterministic report rendering (CSV and sectioned documents).
//!
//! Given the same snapshot and date, exports produce byte-identical output:
//! rows keep the snapshot order, and the `Estado` column comes from the fill
//! band, never from the container's lifecycle `estado`.

use crate::metrics::{Banda, conteo_por_banda};
use crate::model::{Alerta, Contenedor};

/// Maximum alerts included in the alerts section of a report.
const MAX_ALERTAS_INFORME: usize = 20;

/// Escape one CSV field: quote when it contains a comma, quote or newline.
fn campo_csv(valor: &str) -> String {
    if valor.contains(',') || valor.contains('"') || valor.contains('\n') {
        format!("\"{}\"", valor.replace('"', "\"\""))
    } else {
        valor.to_string()
    }
}

/// Render the container snapshot as CSV, one row per container in snapshot
/// order.
pub fn csv_contenedores(contenedores: &[Contenedor]) -> String {
    let mut salida = String::from("ID,Nombre,Dirección,Nivel de Llenado,Estado,Capacidad (L)\n");
    for c in contenedores {
        let fila = [
            c.id.to_string(),
            campo_csv(&c.nombre),
            campo_csv(&c.direccion),
            format!("{}%", c.nivel_actual),
            Banda::of(c.nivel_actual).etiqueta().to_string(),
            c.capacidad_litros.to_string(),
        ];
        salida.push_str(&fila.join(","));
        salida.push('\n');
    }
    salida
}

/// One table inside a report section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TablaInforme {
    pub encabezados: Vec<String>,
    pub filas: Vec<Vec<String>>,
}

/// A report section: a heading, optional summary lines and an optional table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeccionInforme {
    pub titulo: String,
    pub lineas: Vec<String>,
    pub tabla: Option<TablaInforme>,
}

/// A full container report, backend-agnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InformeContenedores {
    pub titulo: String,
    pub fecha: String,
    pub secciones: Vec<SeccionInforme>,
}

impl InformeContenedores {
    /// Build the report from one snapshot. `fecha` is injected by the caller
    /// so the output is a pure function of its inputs.
    pub fn generar(contenedores: &[Contenedor], alertas: &[Alerta], fecha: &str) -> Self {
        let conteo = conteo_por_banda(contenedores);
        let resumen = SeccionInforme {
            titulo: "Estadísticas Generales".into(),
            lineas: vec![
                format!("Total de contenedores: {}", contenedores.len()),
                format!("Estado Normal: {}", conteo.normal),
                format!("Estado Alerta: {}", conteo.advertencia),
                format!("Estado Crítico: {}", conteo.critico),
            ],
            tabla: None,
        };

        let detalle = SeccionInforme {
            titulo: "Detalle de Contenedores".into(),
            lineas: Vec::new(),
            tabla: Some(TablaInforme {
                encabezados: vec![
                    "ID".into(),
                    "Nombre".into(),
                    "Dirección".into(),
                    "Nivel".into(),
                    "Estado".into(),
                ],
                filas: contenedores
                    .iter()
                    .map(|c| {
                        vec![
                            c.id.to_string(),
                            c.nombre.clone(),
                            c.direccion.clone(),
                            format!("{}%", c.nivel_actual),
                            Banda::of(c.nivel_actual).etiqueta().to_string(),
                        ]
                    })
                    .collect(),
            }),
        };

        let mut secciones = vec![resumen, detalle];

        if !alertas.is_empty() {
            secciones.push(SeccionInforme {
                titulo: "Alertas Recientes".into(),
                lineas: Vec::new(),
                tabla: Some(TablaInforme {
                    encabezados: vec![
                        "Tipo".into(),
                        "Contenedor".into(),
                        "Mensaje".into(),
                        "Fecha".into(),
                    ],
                    filas: alertas
                        .iter()
                        .take(MAX_ALERTAS_INFORME)
                        .map(|a| {
                            vec![
                                a.tipo.etiqueta().to_string(),
                                a.contenedor_nombre.clone(),
                                a.titulo.clone(),
                                a.fecha_creacion.clone(),
                            ]
                        })
                        .collect(),
                }),
            });
        }

        Self {
            titulo: "Informe de Contenedores EMSA".into(),
            fecha: fecha.to_string(),
            secciones,
        }
    }
}

/// Rendering contract for report backends. A PDF writer would implement
/// this; the built-in [`TextoPlano`] backend serves the CLI export.
pub trait RenderInforme {
    fn encabezado(&mut self, texto: &str);
    fn parrafo(&mut self, texto: &str);
    fn tabla(&mut self, tabla: &TablaInforme);
}

impl InformeContenedores {
    /// Drive a backend over the report structure.
    pub fn renderizar<R: RenderInforme>(&self, destino: &mut R) {
        destino.encabezado(&self.titulo);
        destino.parrafo(&format!("Fecha de generación: {}", self.fecha));
        for seccion in &self.secciones {
            destino.encabezado(&seccion.titulo);
            for linea in &seccion.lineas {
                destino.parrafo(linea);
            }
            if let Some(tabla) = &seccion.tabla {
                destino.tabla(tabla);
            }
        }
    }
}

/// Plain-text report backend.
#[derive(Debug, Default)]
pub struct TextoPlano {
    salida: String,
}

impl TextoPlano {
    pub fn terminar(self) -> String {
        self.salida
    }
}

impl RenderInforme for TextoPlano {
    fn encabezado(&mut self, texto: &str) {
        self.salida.push_str("== ");
        self.salida.push_str(texto);
        self.salida.push_str(" ==\n");
    }

    fn parrafo(&mut self, texto: &str) {
        self.salida.push_str(texto);
        self.salida.push('\n');
    }

    fn tabla(&mut self, tabla: &TablaInforme) {
        self.salida.push_str(&tabla.encabezados.join(" | "));
        self.salida.push('\n');
        for fila in &tabla.filas {
            self.salida.push_str(&fila.join(" | "));
            self.salida.push('\n');
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{Estado, Severidad, TipoAlerta};

    fn cont(id: i64, nivel: u8, nombre: &str) -> Contenedor {
        Contenedor {
            id,
            numero: 1,
            nombre: nombre.into(),
            direccion: "Av. Heroínas, esq. Ayacucho".into(),
            capacidad_litros: 3300,
            nivel_actual: nivel,
            estado: Estado::Mantenimiento,
            latitud: None,
            longitud: None,
            fecha_instalacion: None,
        }
    }

    fn alerta(id: i64) -> Alerta {
        Alerta {
            id,
            tipo: TipoAlerta::NivelCritico,
            severidad: Severidad::Alta,
            titulo: format!("Alerta {id}"),
            descripcion: String::new(),
            contenedor: Some(1),
            contenedor_nombre: "C1".into(),
            contenedor_ubicacion: String::new(),
            leida: false,
            estado: "activa".into(),
            fecha_creacion: "2026-08-29T10:00:00Z".into(),
        }
    }

    #[test]
    fn csv_estado_column_uses_band_not_lifecycle() {
        // lifecycle estado is Mantenimiento; the CSV column must reflect the
        // fill band instead
        let csv = csv_contenedores(&[cont(1, 85, "C1")]);
        assert!(csv.contains("85%,Crítico"));
        assert!(!csv.contains("Mantenimiento"));
    }

    #[test]
    fn csv_quotes_fields_with_commas() {
        let csv = csv_contenedores(&[cont(1, 10, "C1")]);
        assert!(csv.contains("\"Av. Heroínas, esq. Ayacucho\""));
    }

    #[test]
    fn csv_preserves_snapshot_order() {
        let csv = csv_contenedores(&[cont(3, 10, "tres"), cont(1, 10, "uno")]);
        let pos_tres = csv.find("tres").unwrap();
        let pos_uno = csv.find("uno").unwrap();
        assert!(pos_tres < pos_uno);
    }

    #[test]
    fn csv_escapes_embedded_quotes() {
        assert_eq!(campo_csv("el \"grande\""), "\"el \"\"grande\"\"\"");
        assert_eq!(campo_csv("simple"), "simple");
    }

    #[test]
    fn informe_is_deterministic() {
        let flota = vec![cont(1, 30, "C1"), cont(2, 65, "C2"), cont(3, 90, "C3")];
        let alertas = vec![alerta(1)];
        let a = InformeContenedores::generar(&flota, &alertas, "2026-08-30");
        let b = InformeContenedores::generar(&flota, &alertas, "2026-08-30");
        assert_eq!(a, b);
    }

    #[test]
    fn informe_counts_bands_in_summary() {
        let flota = vec![cont(1, 30, "C1"), cont(2, 65, "C2"), cont(3, 90, "C3")];
        let informe = InformeContenedores::generar(&flota, &[], "2026-08-30");
        let resumen = &informe.secciones[0];
        assert!(resumen.lineas.contains(&"Estado Normal: 1".to_string()));
        assert!(resumen.lineas.contains(&"Estado Alerta: 1".to_string()));
        assert!(resumen.lineas.contains(&"Estado Crítico: 1".to_string()));
    }

    #[test]
    fn informe_omits_alert_section_when_empty() {
        let informe = InformeContenedores::generar(&[cont(1, 10, "C1")], &[], "2026-08-30");
        assert_eq!(informe.secciones.len(), 2);
    }

    #[test]
    fn informe_caps_alerts_at_twenty() {
        let alertas: Vec<Alerta> = (0..30).map(alerta).collect();
        let informe =
            InformeContenedores::generar(&[cont(1, 10, "C1")], &alertas, "2026-08-30");
        let tabla = informe.secciones[2].tabla.as_ref().unwrap();
        assert_eq!(tabla.filas.len(), 20);
    }

    #[test]
    fn texto_plano_renders_all_sections() {
        let informe = InformeContenedores::generar(
            &[cont(1, 85, "C1")],
            &[alerta(1)],
            "2026-08-30",
        );
        let mut backend = TextoPlano::default();
        informe.renderizar(&mut backend);
        let texto = backend.terminar();
        assert!(texto.contains("== Informe de Contenedores EMSA =="));
        assert!(texto.contains("Fecha de generación: 2026-08-30"));
        assert!(texto.contains("Crítico"));
        assert!(texto.contains("Alertas Recientes"));
    }
}
