use std::sync::Arc;

use crate::config::{Config, LogFormat};
use quote_storage_core::quotes::{QuoteFileService, QuoteFileServiceTrait, QuoteFileStore};
use quote_storage_core::StorageConfiguration;
use quote_storage_fs::FileSystemStorage;
use quote_storage_sqlite::QuoteFileRepository;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub quote_file_service: Arc<dyn QuoteFileServiceTrait>,
}

pub fn init_tracing(log_format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match log_format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false))
            .init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init(),
    }
}

/// Constructs the backend selected by the validated storage configuration.
///
/// Opening the database runs migrations, so this blocks.
pub fn build_storage(storage: &StorageConfiguration) -> anyhow::Result<Arc<dyn QuoteFileStore>> {
    let store: Arc<dyn QuoteFileStore> = match storage {
        StorageConfiguration::Database { connection_string } => {
            Arc::new(QuoteFileRepository::connect(connection_string)?)
        }
        StorageConfiguration::FileSystem { base_directory } => {
            Arc::new(FileSystemStorage::new(base_directory.clone()))
        }
    };
    Ok(store)
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let storage = config.storage.clone();
    let store = tokio::task::spawn_blocking(move || build_storage(&storage)).await??;
    tracing::info!("Using {} storage", store.backend_name());

    let quote_file_service: Arc<dyn QuoteFileServiceTrait> =
        Arc::new(QuoteFileService::new(store));

    Ok(Arc::new(AppState { quote_file_service }))
}
