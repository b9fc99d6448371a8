//! Application state and types.

use std::sync::Arc;

use emsa_api::Instantanea;
use emsa_core::form::FormularioContenedor;
use emsa_core::metrics::ResumenFlota;
use emsa_core::model::{Alerta, Contenedor, Estado};

/// Default map cursor when no container is selected (Cochabamba center).
pub const CENTRO_COCHABAMBA: (f64, f64) = (-17.3895, -66.1568);

/// Degrees the map cursor moves per keypress.
const PASO_CURSOR: f64 = 0.002;

/// Tabs of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vista {
    Dashboard,
    Contenedores,
    Mapa,
    Alertas,
    Reportes,
}

impl Vista {
    pub const TODAS: [Self; 5] = [
        Self::Dashboard,
        Self::Contenedores,
        Self::Mapa,
        Self::Alertas,
        Self::Reportes,
    ];

    pub const fn titulo(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Contenedores => "Contenedores",
            Self::Mapa => "Mapa",
            Self::Alertas => "Alertas",
            Self::Reportes => "Reportes",
        }
    }

    pub fn indice(self) -> usize {
        Self::TODAS.iter().position(|v| *v == self).unwrap_or(0)
    }

    pub fn siguiente(self) -> Self {
        Self::TODAS[(self.indice() + 1) % Self::TODAS.len()]
    }

    pub fn anterior(self) -> Self {
        let n = Self::TODAS.len();
        Self::TODAS[(self.indice() + n - 1) % n]
    }
}

/// Application mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Username/password screen; no data is shown until login succeeds.
    Login,
    Normal,
    /// Search input on the containers view captures keystrokes.
    Buscando,
    /// Container create/edit overlay.
    Formulario,
    /// Delete confirmation dialog (Y/N).
    Confirmar,
}

/// Focused field on the login screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampoLogin {
    Usuario,
    Contrasena,
}

/// Login screen state.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub usuario: String,
    pub contrasena: String,
    pub error: Option<String>,
    pub enviando: bool,
    pub campo: Option<CampoLogin>,
}

impl LoginForm {
    pub fn new() -> Self {
        Self {
            campo: Some(CampoLogin::Usuario),
            ..Self::default()
        }
    }

    pub fn alternar_campo(&mut self) {
        self.campo = Some(match self.campo {
            Some(CampoLogin::Usuario) => CampoLogin::Contrasena,
            _ => CampoLogin::Usuario,
        });
    }

    pub fn insertar(&mut self, c: char) {
        self.error = None;
        match self.campo {
            Some(CampoLogin::Contrasena) => self.contrasena.push(c),
            _ => self.usuario.push(c),
        }
    }

    pub fn borrar(&mut self) {
        match self.campo {
            Some(CampoLogin::Contrasena) => {
                self.contrasena.pop();
            }
            _ => {
                self.usuario.pop();
            }
        }
    }
}

/// Focused field of the container form overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampoFormulario {
    Nombre,
    Direccion,
    CapacidadLitros,
    Estado,
}

impl CampoFormulario {
    const ORDEN: [Self; 4] = [
        Self::Nombre,
        Self::Direccion,
        Self::CapacidadLitros,
        Self::Estado,
    ];

    pub fn siguiente(self) -> Self {
        let i = Self::ORDEN.iter().position(|c| *c == self).unwrap_or(0);
        Self::ORDEN[(i + 1) % Self::ORDEN.len()]
    }

    pub fn anterior(self) -> Self {
        let i = Self::ORDEN.iter().position(|c| *c == self).unwrap_or(0);
        Self::ORDEN[(i + Self::ORDEN.len() - 1) % Self::ORDEN.len()]
    }
}

/// The container form overlay plus its UI-side focus and map cursor.
#[derive(Debug, Clone)]
pub struct FormularioActivo {
    pub datos: FormularioContenedor,
    pub campo: CampoFormulario,
    /// When true the overlay shows the location-picking map instead of the
    /// text fields.
    pub eligiendo_ubicacion: bool,
    pub cursor: (f64, f64),
}

impl FormularioActivo {
    fn con_datos(datos: FormularioContenedor) -> Self {
        let cursor = match (datos.latitud, datos.longitud) {
            (Some(lat), Some(lon)) => (lat, lon),
            _ => CENTRO_COCHABAMBA,
        };
        Self {
            datos,
            campo: CampoFormulario::Nombre,
            eligiendo_ubicacion: false,
            cursor,
        }
    }

    pub fn insertar(&mut self, c: char) {
        match self.campo {
            CampoFormulario::Nombre => self.datos.nombre.push(c),
            CampoFormulario::Direccion => self.datos.direccion.push(c),
            CampoFormulario::CapacidadLitros => {
                if c.is_ascii_digit() {
                    self.datos.capacidad_litros.push(c);
                } else {
                    return;
                }
            }
            CampoFormulario::Estado => return,
        }
        self.datos.tocar();
    }

    pub fn borrar(&mut self) {
        let cambiado = match self.campo {
            CampoFormulario::Nombre => self.datos.nombre.pop().is_some(),
            CampoFormulario::Direccion => self.datos.direccion.pop().is_some(),
            CampoFormulario::CapacidadLitros => self.datos.capacidad_litros.pop().is_some(),
            CampoFormulario::Estado => false,
        };
        if cambiado {
            self.datos.tocar();
        }
    }

    /// Cycle the estado field (only meaningful while it is focused).
    pub fn ciclar_estado(&mut self) {
        self.datos.estado = match self.datos.estado {
            Estado::Activo => Estado::Mantenimiento,
            Estado::Mantenimiento => Estado::Inactivo,
            _ => Estado::Activo,
        };
        self.datos.tocar();
    }

    pub fn mover_cursor(&mut self, dlat: f64, dlon: f64) {
        self.cursor.0 += dlat * PASO_CURSOR;
        self.cursor.1 += dlon * PASO_CURSOR;
    }

    /// Confirm the map cursor as the container location.
    pub fn fijar_cursor(&mut self) {
        self.datos.fijar_ubicacion(self.cursor.0, self.cursor.1);
        self.eligiendo_ubicacion = false;
    }
}

/// What a pending confirmation dialog would delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjetivoEliminar {
    Contenedor(i64),
    Alerta(i64),
}

/// Pending delete confirmation shown as dialog.
#[derive(Debug, Clone)]
pub struct Confirmacion {
    pub mensaje: String,
    pub objetivo: ObjetivoEliminar,
}

/// TUI application state.
pub struct App {
    pub mode: AppMode,
    pub vista: Vista,
    pub should_quit: bool,
    pub status: String,
    pub login: LoginForm,
    /// Latest container snapshot from the poller.
    pub contenedores: Arc<Vec<Contenedor>>,
    pub secuencia_contenedores: u64,
    pub error_contenedores: Option<String>,
    /// Latest alert snapshot from the poller.
    pub alertas: Arc<Vec<Alerta>>,
    pub secuencia_alertas: u64,
    pub error_alertas: Option<String>,
    /// Selection index into the filtered container list.
    pub sel_contenedor: usize,
    /// Selection index into the mappable container list.
    pub sel_mapa: usize,
    pub sel_alerta: usize,
    pub busqueda: String,
    pub solo_no_leidas: bool,
    pub formulario: Option<FormularioActivo>,
    pub confirmacion: Option<Confirmacion>,
}

impl App {
    pub fn new() -> Self {
        Self {
            mode: AppMode::Login,
            vista: Vista::Dashboard,
            should_quit: false,
            status: String::new(),
            login: LoginForm::new(),
            contenedores: Arc::new(Vec::new()),
            secuencia_contenedores: 0,
            error_contenedores: None,
            alertas: Arc::new(Vec::new()),
            secuencia_alertas: 0,
            error_alertas: None,
            sel_contenedor: 0,
            sel_mapa: 0,
            sel_alerta: 0,
            busqueda: String::new(),
            solo_no_leidas: false,
            formulario: None,
            confirmacion: None,
        }
    }

    /// Apply a container snapshot if it is newer than what we hold.
    pub fn aplicar_contenedores(&mut self, snap: &Instantanea<Contenedor>) {
        if snap.secuencia != self.secuencia_contenedores {
            self.contenedores = Arc::clone(&snap.registros);
            self.secuencia_contenedores = snap.secuencia;
        }
        self.error_contenedores.clone_from(&snap.ultimo_error);
        self.acotar_selecciones();
    }

    /// Apply an alert snapshot if it is newer than what we hold.
    pub fn aplicar_alertas(&mut self, snap: &Instantanea<Alerta>) {
        if snap.secuencia != self.secuencia_alertas {
            self.alertas = Arc::clone(&snap.registros);
            self.secuencia_alertas = snap.secuencia;
        }
        self.error_alertas.clone_from(&snap.ultimo_error);
        self.acotar_selecciones();
    }

    fn acotar_selecciones(&mut self) {
        self.sel_contenedor = acotar(self.sel_contenedor, self.contenedores_filtrados().len());
        self.sel_mapa = acotar(self.sel_mapa, self.con_coordenadas().len());
        self.sel_alerta = acotar(self.sel_alerta, self.alertas_visibles().len());
    }

    /// Containers matching the current search text, by name or address,
    /// case-insensitively. Empty search matches everything.
    pub fn contenedores_filtrados(&self) -> Vec<&Contenedor> {
        let aguja = self.busqueda.trim().to_lowercase();
        self.contenedores
            .iter()
            .filter(|c| {
                aguja.is_empty()
                    || c.nombre.to_lowercase().contains(&aguja)
                    || c.direccion.to_lowercase().contains(&aguja)
            })
            .collect()
    }

    /// Containers that can be plotted on the map.
    pub fn con_coordenadas(&self) -> Vec<&Contenedor> {
        self.contenedores
            .iter()
            .filter(|c| c.tiene_coordenadas())
            .collect()
    }

    /// Alerts shown in the alerts view, honoring the unread-only toggle.
    pub fn alertas_visibles(&self) -> Vec<&Alerta> {
        self.alertas
            .iter()
            .filter(|a| !self.solo_no_leidas || !a.leida)
            .collect()
    }

    pub fn alertas_no_leidas(&self) -> usize {
        self.alertas.iter().filter(|a| !a.leida).count()
    }

    /// Fleet metrics over the full (unfiltered) container list.
    pub fn resumen(&self) -> ResumenFlota {
        ResumenFlota::calcular(&self.contenedores)
    }

    /// Move the selection of the current view by `delta`, clamped.
    pub fn mover_seleccion(&mut self, delta: isize) {
        match self.vista {
            Vista::Contenedores => {
                let n = self.contenedores_filtrados().len();
                self.sel_contenedor = desplazar(self.sel_contenedor, delta, n);
            }
            Vista::Mapa => {
                let n = self.con_coordenadas().len();
                self.sel_mapa = desplazar(self.sel_mapa, delta, n);
            }
            Vista::Alertas => {
                let n = self.alertas_visibles().len();
                self.sel_alerta = desplazar(self.sel_alerta, delta, n);
            }
            Vista::Dashboard | Vista::Reportes => {}
        }
    }

    pub fn contenedor_seleccionado(&self) -> Option<Contenedor> {
        match self.vista {
            Vista::Mapa => self.con_coordenadas().get(self.sel_mapa).map(|c| (*c).clone()),
            _ => self
                .contenedores_filtrados()
                .get(self.sel_contenedor)
                .map(|c| (*c).clone()),
        }
    }

    pub fn alerta_seleccionada(&self) -> Option<Alerta> {
        self.alertas_visibles()
            .get(self.sel_alerta)
            .map(|a| (*a).clone())
    }

    pub fn abrir_formulario_nuevo(&mut self) {
        self.formulario = Some(FormularioActivo::con_datos(FormularioContenedor::nuevo()));
        self.mode = AppMode::Formulario;
    }

    pub fn abrir_formulario_editar(&mut self, contenedor: &Contenedor) {
        self.formulario = Some(FormularioActivo::con_datos(FormularioContenedor::editar(
            contenedor,
        )));
        self.mode = AppMode::Formulario;
    }

    /// Discard the form, keeping whatever was typed out of later sessions.
    pub fn cerrar_formulario(&mut self) {
        self.formulario = None;
        self.mode = AppMode::Normal;
    }

    pub fn pedir_confirmacion(&mut self, mensaje: String, objetivo: ObjetivoEliminar) {
        self.confirmacion = Some(Confirmacion { mensaje, objetivo });
        self.mode = AppMode::Confirmar;
    }

    pub fn cancelar_confirmacion(&mut self) {
        self.confirmacion = None;
        self.mode = AppMode::Normal;
    }

    pub fn empezar_busqueda(&mut self) {
        self.mode = AppMode::Buscando;
    }

    pub fn terminar_busqueda(&mut self) {
        self.mode = AppMode::Normal;
        self.acotar_selecciones();
    }

    pub fn limpiar_busqueda(&mut self) {
        self.busqueda.clear();
        self.acotar_selecciones();
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Clamp an index to a list of length `n` (0 when empty).
fn acotar(idx: usize, n: usize) -> usize {
    idx.min(n.saturating_sub(1))
}

fn desplazar(idx: usize, delta: isize, n: usize) -> usize {
    if n == 0 {
        return 0;
    }
    let max = (n - 1) as isize;
    (idx as isize + delta).clamp(0, max) as usize
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use emsa_core::form::FaseFormulario;

    fn contenedor(id: i64, nombre: &str, nivel: u8, coords: Option<(f64, f64)>) -> Contenedor {
        Contenedor {
            id,
            numero: id as u32,
            nombre: nombre.into(),
            direccion: format!("Calle {nombre}"),
            capacidad_litros: 3300,
            nivel_actual: nivel,
            estado: Estado::Activo,
            latitud: coords.map(|c| c.0),
            longitud: coords.map(|c| c.1),
            fecha_instalacion: None,
        }
    }

    fn alerta(id: i64, leida: bool) -> Alerta {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "tipo": "nivel_critico",
            "titulo": format!("Alerta {id}"),
            "leida": leida,
            "fecha_creacion": "2026-08-29T10:00:00Z",
        }))
        .unwrap()
    }

    fn snap_contenedores(registros: Vec<Contenedor>, secuencia: u64) -> Instantanea<Contenedor> {
        Instantanea {
            registros: Arc::new(registros),
            secuencia,
            ultimo_error: None,
        }
    }

    #[test]
    fn new_app_starts_at_login() {
        let app = App::new();
        assert_eq!(app.mode, AppMode::Login);
        assert_eq!(app.vista, Vista::Dashboard);
        assert!(!app.should_quit);
        assert!(app.contenedores.is_empty());
    }

    #[test]
    fn vista_cycles_through_all_tabs() {
        let mut vista = Vista::Dashboard;
        for _ in 0..Vista::TODAS.len() {
            vista = vista.siguiente();
        }
        assert_eq!(vista, Vista::Dashboard);
        assert_eq!(Vista::Dashboard.anterior(), Vista::Reportes);
    }

    #[test]
    fn snapshot_application_replaces_records() {
        let mut app = App::new();
        app.aplicar_contenedores(&snap_contenedores(vec![contenedor(1, "A", 10, None)], 1));
        assert_eq!(app.contenedores.len(), 1);
        assert_eq!(app.secuencia_contenedores, 1);
    }

    #[test]
    fn snapshot_error_is_carried_without_dropping_records() {
        let mut app = App::new();
        app.aplicar_contenedores(&snap_contenedores(vec![contenedor(1, "A", 10, None)], 1));
        let fallida = Instantanea {
            registros: Arc::clone(&app.contenedores),
            secuencia: 1,
            ultimo_error: Some("network error".into()),
        };
        app.aplicar_contenedores(&fallida);
        assert_eq!(app.contenedores.len(), 1);
        assert_eq!(app.error_contenedores.as_deref(), Some("network error"));
    }

    #[test]
    fn shrinking_snapshot_clamps_selection() {
        let mut app = App::new();
        app.vista = Vista::Contenedores;
        app.aplicar_contenedores(&snap_contenedores(
            vec![
                contenedor(1, "A", 10, None),
                contenedor(2, "B", 20, None),
                contenedor(3, "C", 30, None),
            ],
            1,
        ));
        app.sel_contenedor = 2;
        app.aplicar_contenedores(&snap_contenedores(vec![contenedor(1, "A", 10, None)], 2));
        assert_eq!(app.sel_contenedor, 0);
    }

    #[test]
    fn search_filters_by_name_and_address_case_insensitive() {
        let mut app = App::new();
        app.aplicar_contenedores(&snap_contenedores(
            vec![
                contenedor(1, "Plaza Colón", 10, None),
                contenedor(2, "Mercado", 20, None),
            ],
            1,
        ));
        app.busqueda = "plaza".into();
        assert_eq!(app.contenedores_filtrados().len(), 1);
        app.busqueda = "calle mercado".into();
        assert_eq!(app.contenedores_filtrados().len(), 1);
        app.busqueda = "zzz".into();
        assert!(app.contenedores_filtrados().is_empty());
        app.limpiar_busqueda();
        assert_eq!(app.contenedores_filtrados().len(), 2);
    }

    #[test]
    fn map_list_only_holds_mappable_containers() {
        let mut app = App::new();
        app.aplicar_contenedores(&snap_contenedores(
            vec![
                contenedor(1, "A", 10, Some((-17.38, -66.15))),
                contenedor(2, "B", 20, None),
            ],
            1,
        ));
        let mapa = app.con_coordenadas();
        assert_eq!(mapa.len(), 1);
        assert_eq!(mapa[0].id, 1);
    }

    #[test]
    fn selection_movement_clamps_at_both_ends() {
        let mut app = App::new();
        app.vista = Vista::Contenedores;
        app.aplicar_contenedores(&snap_contenedores(
            vec![contenedor(1, "A", 10, None), contenedor(2, "B", 20, None)],
            1,
        ));
        app.mover_seleccion(-1);
        assert_eq!(app.sel_contenedor, 0);
        app.mover_seleccion(5);
        assert_eq!(app.sel_contenedor, 1);
    }

    #[test]
    fn unread_filter_and_count() {
        let mut app = App::new();
        app.alertas = Arc::new(vec![alerta(1, true), alerta(2, false), alerta(3, false)]);
        assert_eq!(app.alertas_no_leidas(), 2);
        assert_eq!(app.alertas_visibles().len(), 3);
        app.solo_no_leidas = true;
        assert_eq!(app.alertas_visibles().len(), 2);
    }

    #[test]
    fn new_form_opens_in_forms_mode() {
        let mut app = App::new();
        app.mode = AppMode::Normal;
        app.abrir_formulario_nuevo();
        assert_eq!(app.mode, AppMode::Formulario);
        let f = app.formulario.as_ref().unwrap();
        assert_eq!(f.datos.fase, FaseFormulario::Vacio);
        assert_eq!(f.cursor, CENTRO_COCHABAMBA);
    }

    #[test]
    fn edit_form_seeds_cursor_from_container() {
        let mut app = App::new();
        let c = contenedor(9, "C9", 50, Some((-17.40, -66.20)));
        app.abrir_formulario_editar(&c);
        let f = app.formulario.as_ref().unwrap();
        assert_eq!(f.datos.editando_id, Some(9));
        assert!((f.cursor.0 - -17.40).abs() < f64::EPSILON);
    }

    #[test]
    fn form_capacity_field_rejects_non_digits() {
        let mut f = FormularioActivo::con_datos(FormularioContenedor::nuevo());
        f.campo = CampoFormulario::CapacidadLitros;
        f.datos.capacidad_litros.clear();
        f.insertar('1');
        f.insertar('x');
        f.insertar('2');
        assert_eq!(f.datos.capacidad_litros, "12");
    }

    #[test]
    fn form_estado_cycles() {
        let mut f = FormularioActivo::con_datos(FormularioContenedor::nuevo());
        assert_eq!(f.datos.estado, Estado::Activo);
        f.ciclar_estado();
        assert_eq!(f.datos.estado, Estado::Mantenimiento);
        f.ciclar_estado();
        assert_eq!(f.datos.estado, Estado::Inactivo);
        f.ciclar_estado();
        assert_eq!(f.datos.estado, Estado::Activo);
    }

    #[test]
    fn picking_location_fixes_cursor_into_form() {
        let mut f = FormularioActivo::con_datos(FormularioContenedor::nuevo());
        f.eligiendo_ubicacion = true;
        f.mover_cursor(1.0, -2.0);
        f.fijar_cursor();
        assert!(!f.eligiendo_ubicacion);
        assert!(f.datos.latitud.is_some());
        assert!(f.datos.longitud.is_some());
    }

    #[test]
    fn confirmation_dialog_round_trip() {
        let mut app = App::new();
        app.mode = AppMode::Normal;
        app.pedir_confirmacion("¿Eliminar?".into(), ObjetivoEliminar::Contenedor(4));
        assert_eq!(app.mode, AppMode::Confirmar);
        assert_eq!(
            app.confirmacion.as_ref().unwrap().objetivo,
            ObjetivoEliminar::Contenedor(4)
        );
        app.cancelar_confirmacion();
        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.confirmacion.is_none());
    }

    #[test]
    fn login_form_field_toggle_and_typing() {
        let mut login = LoginForm::new();
        login.insertar('a');
        login.alternar_campo();
        login.insertar('b');
        assert_eq!(login.usuario, "a");
        assert_eq!(login.contrasena, "b");
        login.borrar();
        assert!(login.contrasena.is_empty());
    }
}
