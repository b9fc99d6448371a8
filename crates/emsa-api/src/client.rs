//! EMSA REST API client.
//!
//! Uses reqwest to call the backend endpoints for containers, alerts and
//! auth. Every request attaches the bearer token from the session store when
//! one exists; a 401 clears the session so the UI falls back to the login
//! screen. No automatic retry, no automatic token refresh.

use std::sync::Arc;

use reqwest::Method;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{debug, warn};

use emsa_core::envelope::{NormalizationError, normalize_records};
use emsa_core::form::CargaContenedor;
use emsa_core::model::{Alerta, AuthTokens, Contenedor, EstadisticasServidor};

use crate::session::{Session, SessionStore};

/// EMSA API client errors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request produced no HTTP response.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// HTTP 401; the stored session has been cleared.
    #[error("sesión expirada o credenciales inválidas")]
    Unauthorized,

    /// Non-2xx response with the server's field-level payload when present.
    #[error("server error ({status})")]
    Server {
        status: u16,
        /// `(field, message)` pairs from the validation payload.
        fields: Vec<(String, String)>,
    },

    /// Response did not match any known envelope or record shape.
    #[error(transparent)]
    Normalization(#[from] NormalizationError),

    /// Client misconfiguration.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Configuration for connecting to an EMSA backend.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL including the `/api` prefix (e.g. "<http://localhost:8000/api>").
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".into(),
        }
    }
}

/// EMSA REST API client.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionStore>,
}

impl ApiClient {
    /// Create a new API client sharing the given session store.
    pub fn new(config: &ApiConfig, session: Arc<SessionStore>) -> Result<Self, ApiError> {
        if config.base_url.is_empty() {
            return Err(ApiError::Config("base_url is empty".into()));
        }

        // Ensure a TLS crypto provider is installed (reqwest uses rustls-no-provider).
        // The `Err` case just means it was already installed.
        let _ = rustls::crypto::ring::default_provider().install_default();

        let http = reqwest::Client::builder().build()?;
        let base_url = config.base_url.trim_end_matches('/').to_string();
        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    /// Build the full URL for a given API path.
    pub(crate) fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Perform one request: attach the bearer token when a session exists,
    /// map the response into the error taxonomy, parse the body as JSON.
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        let url = self.api_url(path);
        debug!(%method, %url, "api request");

        let mut req = self.http.request(method, &url);
        if let Some(token) = self.session.access_token() {
            req = req.bearer_auth(token);
        }
        if let Some(payload) = body {
            req = req.json(payload);
        }

        let resp = req.send().await?;
        let status = resp.status();

        if status.as_u16() == 401 {
            warn!(%url, "401 from server, clearing session");
            self.session.limpiar();
            return Err(ApiError::Unauthorized);
        }

        let texto = resp.text().await?;
        if !status.is_success() {
            return Err(ApiError::Server {
                status: status.as_u16(),
                fields: campos_de_error(&texto),
            });
        }
        if texto.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&texto)
            .map_err(|e| ApiError::Normalization(NormalizationError::BadRecord(e.to_string())))
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Exchange credentials for a token pair and store the session.
    pub async fn login(&self, username: &str, password: &str) -> Result<AuthTokens, ApiError> {
        let payload = json!({ "username": username, "password": password });
        let valor = self
            .request(Method::POST, "/auth/token/", Some(&payload))
            .await?;
        let tokens: AuthTokens = serde_json::from_value(valor)
            .map_err(|e| ApiError::Normalization(NormalizationError::BadRecord(e.to_string())))?;
        self.session.establecer(Session {
            username: username.to_string(),
            access_token: tokens.access.clone(),
            refresh_token: tokens.refresh.clone(),
        });
        Ok(tokens)
    }

    /// Exchange the stored refresh token for a new access token.
    ///
    /// Provided for completeness; nothing calls it automatically. Expiry
    /// mid-session surfaces as repeated 401s and a forced re-login.
    pub async fn refresh_access_token(&self) -> Result<String, ApiError> {
        let refresh = self
            .session
            .refresh_token()
            .ok_or_else(|| ApiError::Config("no hay sesión activa".into()))?;
        let valor = self
            .request(
                Method::POST,
                "/auth/token/refresh/",
                Some(&json!({ "refresh": refresh })),
            )
            .await?;
        let access = valor
            .get("access")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                ApiError::Normalization(NormalizationError::BadRecord(
                    "respuesta sin campo `access`".into(),
                ))
            })?
            .to_string();
        if let Some(mut sesion) = self.session.sesion() {
            sesion.access_token.clone_from(&access);
            self.session.establecer(sesion);
        }
        Ok(access)
    }

    /// Discard the local session. The backend has no revocation endpoint.
    pub fn logout(&self) {
        self.session.limpiar();
    }

    // =========================================================================
    // Containers
    // =========================================================================

    /// List containers, unwrapping the paginated envelope.
    pub async fn listar_contenedores(&self) -> Result<Vec<Contenedor>, ApiError> {
        let valor = self
            .request(Method::GET, "/contenedores/contenedores/", None)
            .await?;
        Ok(normalize_records(valor)?)
    }

    /// Fetch a single container.
    pub async fn contenedor(&self, id: i64) -> Result<Contenedor, ApiError> {
        let valor = self
            .request(Method::GET, &format!("/contenedores/contenedores/{id}/"), None)
            .await?;
        serde_json::from_value(valor)
            .map_err(|e| ApiError::Normalization(NormalizationError::BadRecord(e.to_string())))
    }

    /// Create a container.
    pub async fn crear_contenedor(&self, carga: &CargaContenedor) -> Result<(), ApiError> {
        let payload = serde_json::to_value(carga)
            .map_err(|e| ApiError::Config(format!("carga no serializable: {e}")))?;
        self.request(Method::POST, "/contenedores/contenedores/", Some(&payload))
            .await?;
        Ok(())
    }

    /// Update a container.
    pub async fn actualizar_contenedor(
        &self,
        id: i64,
        carga: &CargaContenedor,
    ) -> Result<(), ApiError> {
        let payload = serde_json::to_value(carga)
            .map_err(|e| ApiError::Config(format!("carga no serializable: {e}")))?;
        self.request(
            Method::PUT,
            &format!("/contenedores/contenedores/{id}/"),
            Some(&payload),
        )
        .await?;
        Ok(())
    }

    /// Delete a container. Its alerts are not retracted client-side.
    pub async fn eliminar_contenedor(&self, id: i64) -> Result<(), ApiError> {
        self.request(
            Method::DELETE,
            &format!("/contenedores/contenedores/{id}/"),
            None,
        )
        .await?;
        Ok(())
    }

    /// Server-computed statistics action.
    pub async fn estadisticas(&self) -> Result<EstadisticasServidor, ApiError> {
        let valor = self
            .request(Method::GET, "/contenedores/contenedores/estadisticas/", None)
            .await?;
        serde_json::from_value(valor)
            .map_err(|e| ApiError::Normalization(NormalizationError::BadRecord(e.to_string())))
    }

    // =========================================================================
    // Alerts
    // =========================================================================

    /// List alerts, unwrapping the `{success, alertas}` envelope.
    pub async fn listar_alertas(&self) -> Result<Vec<Alerta>, ApiError> {
        let valor = self
            .request(Method::GET, "/contenedores/alertas/", None)
            .await?;
        Ok(normalize_records(valor)?)
    }

    /// Mark one alert as read.
    pub async fn marcar_leida(&self, id: i64) -> Result<(), ApiError> {
        self.request(
            Method::PATCH,
            &format!("/contenedores/alertas/{id}/"),
            Some(&json!({ "leida": true })),
        )
        .await?;
        Ok(())
    }

    /// Delete one alert.
    pub async fn eliminar_alerta(&self, id: i64) -> Result<(), ApiError> {
        self.request(Method::DELETE, &format!("/contenedores/alertas/{id}/"), None)
            .await?;
        Ok(())
    }
}

/// Flatten a server validation payload into `(field, message)` pairs.
/// DRF shapes: `{"campo": ["msg", ...]}` or `{"detail": "msg"}`.
pub(crate) fn campos_de_error(cuerpo: &str) -> Vec<(String, String)> {
    let Ok(Value::Object(map)) = serde_json::from_str::<Value>(cuerpo) else {
        if cuerpo.trim().is_empty() {
            return Vec::new();
        }
        return vec![("detalle".into(), cuerpo.trim().to_string())];
    };
    map.into_iter()
        .map(|(campo, v)| {
            let mensaje = match v {
                Value::String(s) => s,
                Value::Array(items) => items
                    .iter()
                    .map(|m| m.as_str().map_or_else(|| m.to_string(), String::from))
                    .collect::<Vec<_>>()
                    .join(", "),
                otro => otro.to_string(),
            };
            (campo, mensaje)
        })
        .collect()
}
