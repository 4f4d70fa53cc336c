use anyhow::Context;
use quote_storage_core::errors::Error as CoreError;
use quote_storage_core::{StorageConfiguration, StorageSettings, StorageType};
use std::{net::SocketAddr, time::Duration};

const DEFAULT_MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// Output format of the log subscriber, from `QS_LOG_FORMAT`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => anyhow::bail!("Invalid QS_LOG_FORMAT '{}', expected 'text' or 'json'", s),
        }
    }
}

pub struct Config {
    pub listen_addr: SocketAddr,
    pub log_format: LogFormat,
    pub storage: StorageConfiguration,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub max_upload_bytes: usize,
}

impl Config {
    /// Reads the configuration from the process environment (and `.env`).
    /// Fails if any value is malformed or the storage section is invalid.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let listen_addr = var("QS_LISTEN_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8080".to_string());
        let listen_addr: SocketAddr = listen_addr
            .parse()
            .with_context(|| format!("Invalid QS_LISTEN_ADDR '{}'", listen_addr))?;

        let log_format = match var("QS_LOG_FORMAT") {
            Some(v) => v.parse()?,
            None => LogFormat::default(),
        };

        let cors_allow = var("QS_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let timeout_ms: u64 = match var("QS_REQUEST_TIMEOUT_MS") {
            Some(v) => v
                .parse()
                .with_context(|| format!("Invalid QS_REQUEST_TIMEOUT_MS '{}'", v))?,
            None => 30000,
        };

        let max_upload_bytes: usize = match var("QS_MAX_UPLOAD_BYTES") {
            Some(v) => v
                .parse()
                .with_context(|| format!("Invalid QS_MAX_UPLOAD_BYTES '{}'", v))?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        let storage = load_storage_settings(&var)?
            .validate()
            .context("Invalid storage configuration")?;

        Ok(Self {
            listen_addr,
            log_format,
            storage,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            max_upload_bytes,
        })
    }
}

/// `Storage` section of `QS_CONFIG_FILE`, with `QS_STORAGE_*` variables
/// taking precedence over the file.
fn load_storage_settings(var: &impl Fn(&str) -> Option<String>) -> anyhow::Result<StorageSettings> {
    let mut settings = match var("QS_CONFIG_FILE") {
        Some(path) => {
            let document = std::fs::read_to_string(&path)
                .map_err(|e| CoreError::ConfigIO(format!("{}: {}", path, e)))?;
            StorageSettings::from_json_document(&document)?
        }
        None => StorageSettings::default(),
    };

    if let Some(storage_type) = var("QS_STORAGE_TYPE") {
        settings.storage_type = Some(storage_type.parse::<StorageType>()?);
    }
    if let Some(connection_string) = var("QS_STORAGE_DB_CONNECTION_STRING") {
        settings.db.get_or_insert_with(Default::default).connection_string =
            Some(connection_string);
    }
    if let Some(base_directory) = var("QS_STORAGE_FS_BASE_DIRECTORY") {
        settings
            .file_system
            .get_or_insert_with(Default::default)
            .base_directory = Some(base_directory);
    }

    Ok(settings)
}
