//! Input handling for TUI key events.
//!
//! API calls triggered by a key are awaited inline; the snapshot pollers
//! keep running independently, so the screen never shows torn data.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::warn;

use emsa_api::ApiError;
use emsa_core::form::FaseFormulario;

use crate::app::{App, AppMode, CampoFormulario, LoginForm, ObjetivoEliminar, Vista};
use crate::config::AuthConfig;
use crate::export_cmd::{self, FormatoExporte};

use super::{Servicios, TermEvent};

/// Process a terminal event, updating app state and calling the API where
/// a key demands it.
pub async fn handle_term_event(app: &mut App, servicios: &mut Servicios, event: TermEvent) {
    let TermEvent::Key(key) = event else {
        // Resizes are absorbed by the next tick's draw.
        return;
    };

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.mode {
        AppMode::Login => handle_login_key(app, servicios, key).await,
        AppMode::Buscando => handle_busqueda_key(app, key),
        AppMode::Formulario => handle_formulario_key(app, servicios, key).await,
        AppMode::Confirmar => handle_confirmacion_key(app, servicios, key).await,
        AppMode::Normal => handle_normal_key(app, servicios, key).await,
    }
}

async fn handle_login_key(app: &mut App, servicios: &mut Servicios, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            app.login.alternar_campo();
        }
        KeyCode::Backspace => app.login.borrar(),
        KeyCode::Enter => enviar_login(app, servicios).await,
        KeyCode::Char(c) => app.login.insertar(c),
        _ => {}
    }
}

async fn enviar_login(app: &mut App, servicios: &mut Servicios) {
    let usuario = app.login.usuario.trim().to_string();
    let contrasena = app.login.contrasena.clone();
    if usuario.is_empty() || contrasena.is_empty() {
        app.login.error = Some("Ingrese usuario y contraseña".into());
        return;
    }

    app.login.enviando = true;
    match servicios.client.login(&usuario, &contrasena).await {
        Ok(tokens) => {
            servicios.config.auth = Some(AuthConfig {
                username: usuario.clone(),
                access_token: tokens.access,
                refresh_token: tokens.refresh,
            });
            if let Err(e) = servicios.config.save() {
                warn!(error = %e, "no se pudo guardar la sesión");
            }
            app.login = LoginForm::new();
            app.mode = AppMode::Normal;
            app.status = format!("Conectado como {usuario}");
            servicios.refrescar();
        }
        Err(ApiError::Unauthorized) => {
            app.login.enviando = false;
            app.login.contrasena.clear();
            app.login.error = Some("Usuario o contraseña incorrectos".into());
        }
        Err(e) => {
            app.login.enviando = false;
            app.login.error = Some(format!("No se pudo conectar: {e}"));
        }
    }
}

async fn handle_normal_key(app: &mut App, servicios: &mut Servicios, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Tab | KeyCode::Right => app.vista = app.vista.siguiente(),
        KeyCode::BackTab | KeyCode::Left => app.vista = app.vista.anterior(),
        KeyCode::Char(c @ '1'..='5') => {
            let idx = usize::from(c as u8 - b'1');
            app.vista = Vista::TODAS[idx];
        }
        KeyCode::Up | KeyCode::Char('k') => app.mover_seleccion(-1),
        KeyCode::Down | KeyCode::Char('j') => app.mover_seleccion(1),
        KeyCode::F(5) => {
            servicios.refrescar();
            app.status = "Actualizando...".into();
        }
        KeyCode::Char('/') if app.vista == Vista::Contenedores => app.empezar_busqueda(),
        KeyCode::Char('n') if app.vista == Vista::Contenedores || app.vista == Vista::Mapa => {
            app.abrir_formulario_nuevo();
        }
        KeyCode::Char('e') if app.vista == Vista::Contenedores || app.vista == Vista::Mapa => {
            if let Some(c) = app.contenedor_seleccionado() {
                // Edit the server's current record; fall back to the
                // snapshot when the refetch fails.
                let actual = servicios.client.contenedor(c.id).await.unwrap_or(c);
                app.abrir_formulario_editar(&actual);
            }
        }
        KeyCode::Char('d') => pedir_eliminacion(app),
        KeyCode::Char('r') if app.vista == Vista::Alertas => {
            marcar_leida_seleccionada(app, servicios).await;
        }
        KeyCode::Char('u') if app.vista == Vista::Alertas => {
            app.solo_no_leidas = !app.solo_no_leidas;
            app.mover_seleccion(0);
        }
        KeyCode::Char('c') if app.vista == Vista::Reportes => {
            exportar(app, FormatoExporte::Csv);
        }
        KeyCode::Char('t') if app.vista == Vista::Reportes => {
            exportar(app, FormatoExporte::Texto);
        }
        _ => {}
    }
}

fn pedir_eliminacion(app: &mut App) {
    match app.vista {
        Vista::Contenedores | Vista::Mapa => {
            if let Some(c) = app.contenedor_seleccionado() {
                app.pedir_confirmacion(
                    format!(
                        "¿Eliminar el contenedor \"{}\"? Sus alertas no se retiran.",
                        c.nombre
                    ),
                    ObjetivoEliminar::Contenedor(c.id),
                );
            }
        }
        Vista::Alertas => {
            if let Some(a) = app.alerta_seleccionada() {
                app.pedir_confirmacion(
                    format!("¿Eliminar la alerta \"{}\"?", a.titulo),
                    ObjetivoEliminar::Alerta(a.id),
                );
            }
        }
        Vista::Dashboard | Vista::Reportes => {}
    }
}

async fn marcar_leida_seleccionada(app: &mut App, servicios: &mut Servicios) {
    let Some(alerta) = app.alerta_seleccionada() else {
        return;
    };
    if alerta.leida {
        return;
    }
    match servicios.client.marcar_leida(alerta.id).await {
        Ok(()) => {
            app.status = "Alerta marcada como leída".into();
            servicios.alertas.refresh_now();
        }
        Err(e) => manejar_error_api(app, servicios, &e),
    }
}

fn exportar(app: &mut App, formato: FormatoExporte) {
    match export_cmd::escribir_informe(&app.contenedores, &app.alertas, formato, None) {
        Ok(destino) => app.status = format!("Informe escrito en {}", destino.display()),
        Err(e) => app.status = format!("Error al exportar: {e}"),
    }
}

fn handle_busqueda_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.terminar_busqueda(),
        KeyCode::Esc => {
            app.limpiar_busqueda();
            app.terminar_busqueda();
        }
        KeyCode::Backspace => {
            app.busqueda.pop();
        }
        KeyCode::Char(c) => app.busqueda.push(c),
        _ => {}
    }
}

async fn handle_formulario_key(app: &mut App, servicios: &mut Servicios, key: KeyEvent) {
    let Some(formulario) = app.formulario.as_mut() else {
        app.mode = AppMode::Normal;
        return;
    };

    if formulario.eligiendo_ubicacion {
        match key.code {
            KeyCode::Esc => formulario.eligiendo_ubicacion = false,
            KeyCode::Up => formulario.mover_cursor(1.0, 0.0),
            KeyCode::Down => formulario.mover_cursor(-1.0, 0.0),
            KeyCode::Left => formulario.mover_cursor(0.0, -1.0),
            KeyCode::Right => formulario.mover_cursor(0.0, 1.0),
            KeyCode::Enter => formulario.fijar_cursor(),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc => app.cerrar_formulario(),
        KeyCode::Tab | KeyCode::Down => formulario.campo = formulario.campo.siguiente(),
        KeyCode::BackTab | KeyCode::Up => formulario.campo = formulario.campo.anterior(),
        KeyCode::F(2) => formulario.eligiendo_ubicacion = true,
        KeyCode::Backspace => formulario.borrar(),
        KeyCode::Enter => enviar_formulario(app, servicios).await,
        KeyCode::Char(' ') if formulario.campo == CampoFormulario::Estado => {
            formulario.ciclar_estado();
        }
        KeyCode::Char(c) => formulario.insertar(c),
        _ => {}
    }
}

async fn enviar_formulario(app: &mut App, servicios: &mut Servicios) {
    let (id, carga) = {
        let Some(formulario) = app.formulario.as_mut() else {
            return;
        };
        match formulario.datos.preparar_envio() {
            Some(carga) => (formulario.datos.editando_id, carga),
            None => {
                // Valid fields but no location yet: jump straight to the map.
                if formulario.datos.fase == FaseFormulario::EsperandoUbicacion {
                    formulario.eligiendo_ubicacion = true;
                }
                return;
            }
        }
    };

    let resultado = match id {
        Some(id) => servicios.client.actualizar_contenedor(id, &carga).await,
        None => servicios.client.crear_contenedor(&carga).await,
    };

    match resultado {
        Ok(()) => {
            if let Some(formulario) = app.formulario.as_mut() {
                formulario.datos.confirmar_enviado();
            }
            app.cerrar_formulario();
            app.status = if id.is_some() {
                "Contenedor actualizado".into()
            } else {
                "Contenedor creado".into()
            };
            servicios.contenedores.refresh_now();
        }
        Err(ApiError::Server { fields, .. }) if !fields.is_empty() => {
            if let Some(formulario) = app.formulario.as_mut() {
                formulario.datos.aplicar_errores_servidor(fields);
            }
        }
        Err(e) => manejar_error_api(app, servicios, &e),
    }
}

async fn handle_confirmacion_key(app: &mut App, servicios: &mut Servicios, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y' | 'Y') | KeyCode::Enter => ejecutar_eliminacion(app, servicios).await,
        KeyCode::Char('n' | 'N') | KeyCode::Esc => app.cancelar_confirmacion(),
        _ => {}
    }
}

async fn ejecutar_eliminacion(app: &mut App, servicios: &mut Servicios) {
    let Some(confirmacion) = app.confirmacion.take() else {
        app.mode = AppMode::Normal;
        return;
    };
    app.mode = AppMode::Normal;

    let resultado = match confirmacion.objetivo {
        ObjetivoEliminar::Contenedor(id) => servicios
            .client
            .eliminar_contenedor(id)
            .await
            .map(|()| "Contenedor eliminado"),
        ObjetivoEliminar::Alerta(id) => servicios
            .client
            .eliminar_alerta(id)
            .await
            .map(|()| "Alerta eliminada"),
    };

    match resultado {
        Ok(mensaje) => {
            app.status = mensaje.into();
            servicios.refrescar();
        }
        Err(e) => manejar_error_api(app, servicios, &e),
    }
}

/// An expired session drops the user back to the login screen; any other
/// failure lands in the status bar.
fn manejar_error_api(app: &mut App, servicios: &mut Servicios, error: &ApiError) {
    if matches!(error, ApiError::Unauthorized) {
        servicios.config.clear_auth();
        if let Err(e) = servicios.config.save() {
            warn!(error = %e, "no se pudo limpiar la sesión guardada");
        }
        app.login = LoginForm::new();
        app.login.error = Some("Sesión expirada, inicie sesión de nuevo".into());
        app.mode = AppMode::Login;
    } else {
        app.status = format!("Error: {error}");
    }
}
