//! Configuration loader for chathub.
//!
//! Reads `config.toml` from the data directory (`~/.chathub/` in
//! production, overridable via `CHATHUB_DATA_DIR`) and deserializes it
//! into [`HubConfig`]. Falls back to defaults when the file is missing
//! or malformed.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::sqlite::pool::default_database_url;

/// Resolve the data directory: `CHATHUB_DATA_DIR` if set, otherwise
/// `~/.chathub`.
pub fn resolve_data_dir() -> PathBuf {
    match std::env::var("CHATHUB_DATA_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".chathub")
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    /// Bind address. The original deployment listened on all interfaces.
    pub host: String,
    /// Listen port.
    pub port: u16,
    /// SQLite database URL.
    pub database_url: String,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4000,
            database_url: default_database_url(),
        }
    }
}

/// Load configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`HubConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns
///   the default.
pub async fn load_config(data_dir: &Path) -> HubConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return HubConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return HubConfig::default();
        }
    };

    match toml::from_str::<HubConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            HubConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).await;
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 4000);
    }

    #[tokio::test]
    async fn test_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
host = "127.0.0.1"
port = 9000
database_url = "sqlite::memory:"
"#,
        )
        .await
        .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9000);
        assert_eq!(config.database_url, "sqlite::memory:");
    }

    #[tokio::test]
    async fn test_partial_toml_fills_defaults() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "port = 8080\n")
            .await
            .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "0.0.0.0");
    }

    #[tokio::test]
    async fn test_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(config.port, 4000);
    }
}
