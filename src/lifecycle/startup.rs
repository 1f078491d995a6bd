//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Initialize logging and the metrics exporter
//! - Open the issuer store, restoring the snapshot when one is configured
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Logging is initialized before anything else can log
//! - The listener is bound last, by the caller

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use crate::config::{load_config, ConfigError, RegistryConfig, StorageConfig};
use crate::observability::{logging, metrics};
use crate::registry::{MemoryIssuerStore, StoreError};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to restore issuer snapshot: {0}")]
    Store(#[from] StoreError),
}

/// Read the configuration file, or use defaults when no path is given.
pub fn resolve_config(path: Option<&Path>) -> Result<RegistryConfig, StartupError> {
    match path {
        Some(path) => Ok(load_config(path)?),
        None => Ok(RegistryConfig::default()),
    }
}

/// Install the log subscriber and, when enabled, the metrics exporter.
pub fn init_observability(config: &RegistryConfig) {
    logging::init_logging(&config.observability.log_level);

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }
}

/// Open the issuer store described by `storage`.
pub fn open_store(storage: &StorageConfig) -> Result<Arc<MemoryIssuerStore>, StartupError> {
    let store = match &storage.persistence_path {
        Some(path) => MemoryIssuerStore::load_from_file(path)?,
        None => MemoryIssuerStore::new(None),
    };
    Ok(Arc::new(store))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::IssuerStore;

    #[test]
    fn test_defaults_without_config_file() {
        let config = resolve_config(None).unwrap();
        assert_eq!(config.server.bind_address, "0.0.0.0:8080");
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let result = resolve_config(Some(Path::new("no_such_registry_config.toml")));
        assert!(matches!(result, Err(StartupError::Config(ConfigError::Io(_)))));
    }

    #[test]
    fn test_open_volatile_store() {
        let store = open_store(&StorageConfig::default()).unwrap();
        assert_eq!(store.count(), 0);
    }
}
