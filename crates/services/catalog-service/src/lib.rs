//! Catalog Service Library
//!
//! Product, warehouse and attachment management over a unit-of-work
//! persistence layer. The binary drives it from the command line; other
//! crates can embed the services directly.

pub mod config;
pub mod infra;
pub mod repository;
pub mod service;

use std::sync::Arc;

use sea_orm::DbErr;
use tracing::info;

use crate::config::CatalogServiceConfig;
use crate::infra::{Database, SeaPersistence};
use crate::service::Services;

/// Connect to the database, apply pending migrations and wire the services.
pub async fn connect_services(config: &CatalogServiceConfig) -> Result<Services, DbErr> {
    let db = Database::connect(&config.database).await?;
    let uow = Arc::new(SeaPersistence::new(db.get_connection()));
    Ok(Services::from_store(uow, &config.storage))
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(
    config: &CatalogServiceConfig,
    action: MigrateAction,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::connect_without_migrations(&config.database).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}
