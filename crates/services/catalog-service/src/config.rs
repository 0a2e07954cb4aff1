//! Catalog service configuration.

use std::env;
use std::path::PathBuf;

use common::{DatabaseConfig, ServiceConfig, StorageConfig};

/// Catalog service configuration.
#[derive(Debug, Clone, Default)]
pub struct CatalogServiceConfig {
    pub service: ServiceConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
}

impl CatalogServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            service: ServiceConfig {
                service_name: "catalog-service".to_string(),
                log_level: env::var("RUST_LOG").unwrap_or(defaults.service.log_level),
            },
            database: DatabaseConfig {
                url: env::var("CATALOG_SERVICE_DATABASE_URL")
                    .or_else(|_| env::var("DATABASE_URL"))
                    .unwrap_or(defaults.database.url),
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.database.max_connections),
                min_connections: env::var("DATABASE_MIN_CONNECTIONS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.database.min_connections),
            },
            storage: StorageConfig {
                attachment_root: env::var("ATTACHMENT_ROOT")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.storage.attachment_root),
            },
        }
    }
}

impl CatalogServiceConfig {
    /// Filter directive for the log subscriber; verbose forces debug
    pub fn log_directive(&self, verbose: bool) -> &str {
        if verbose {
            "debug"
        } else {
            &self.service.log_level
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_directive_uses_configured_level() {
        let mut config = CatalogServiceConfig::default();
        config.service.log_level = "catalog_service_lib=trace".to_string();

        assert_eq!(config.log_directive(false), "catalog_service_lib=trace");
        assert_eq!(config.log_directive(true), "debug");
    }
}
