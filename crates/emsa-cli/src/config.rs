//! CLI configuration management.
//!
//! Persists the API URL, auth tokens and the monitor settings snapshot to
//! `~/.emsa/config.json`. Tokens are written on login and cleared on logout
//! or when the server rejects them with a 401.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use emsa_core::settings::MonitorSettings;

/// Persistent CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CliConfig {
    /// Backend base URL including the `/api` prefix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    /// Authentication credentials.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthConfig>,
    /// Operator settings snapshot (thresholds are write-only preferences).
    #[serde(default)]
    pub monitor: MonitorSettings,
}

/// Stored authentication credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub username: String,
    pub access_token: String,
    pub refresh_token: String,
}

impl CliConfig {
    /// Path to the config directory: `~/.emsa/`.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".emsa"))
    }

    /// Path to the config file: `~/.emsa/config.json`.
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.json"))
    }

    /// Load config from disk. Returns default if the file doesn't exist or
    /// is invalid.
    pub fn load() -> Self {
        Self::config_path()
            .map(|p| Self::load_from(&p))
            .unwrap_or_default()
    }

    /// Load config from an explicit path.
    pub fn load_from(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Save config to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        let dir =
            Self::config_dir().ok_or_else(|| anyhow::anyhow!("Cannot determine home directory"))?;
        std::fs::create_dir_all(&dir)?;
        self.save_to(&dir.join("config.json"))
    }

    /// Save config to an explicit path.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Clear stored auth credentials.
    pub fn clear_auth(&mut self) {
        self.auth = None;
    }

    /// Effective API base URL, with the config default.
    pub fn api_url(&self) -> String {
        self.api_url
            .clone()
            .unwrap_or_else(|| "http://localhost:8000/api".to_string())
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_no_auth() {
        let cfg = CliConfig::default();
        assert!(cfg.auth.is_none());
        assert_eq!(cfg.api_url(), "http://localhost:8000/api");
        assert_eq!(cfg.monitor.intervalo_actualizacion_segs, 30);
    }

    #[test]
    fn config_roundtrip_json() {
        let cfg = CliConfig {
            api_url: Some("https://monitor.emsa.bo/api".into()),
            auth: Some(AuthConfig {
                username: "operador".into(),
                access_token: "at".into(),
                refresh_token: "rt".into(),
            }),
            monitor: MonitorSettings::default(),
        };
        let json = serde_json::to_string(&cfg).unwrap();
        let loaded: CliConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.api_url.unwrap(), "https://monitor.emsa.bo/api");
        assert_eq!(loaded.auth.unwrap().username, "operador");
    }

    #[test]
    fn clear_auth_removes_credentials() {
        let mut cfg = CliConfig {
            auth: Some(AuthConfig {
                username: "operador".into(),
                access_token: "at".into(),
                refresh_token: "rt".into(),
            }),
            ..Default::default()
        };
        cfg.clear_auth();
        assert!(cfg.auth.is_none());
    }

    #[test]
    fn config_path_contains_emsa() {
        if let Some(path) = CliConfig::config_path() {
            assert!(path.to_string_lossy().contains(".emsa"));
            assert!(path.to_string_lossy().contains("config.json"));
        }
    }

    #[test]
    fn save_and_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let cfg = CliConfig {
            api_url: Some("http://10.0.0.5:8000/api".into()),
            ..Default::default()
        };
        cfg.save_to(&path).unwrap();
        let loaded = CliConfig::load_from(&path);
        assert_eq!(loaded.api_url.as_deref(), Some("http://10.0.0.5:8000/api"));
    }

    #[test]
    fn missing_file_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = CliConfig::load_from(&dir.path().join("nope.json"));
        assert!(loaded.auth.is_none());
    }
}
