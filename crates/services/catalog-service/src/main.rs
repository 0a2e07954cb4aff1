//! Catalog Service - command line access to the catalog.

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use catalog_service_lib::config::CatalogServiceConfig;
use catalog_service_lib::service::ServiceContainer;
use catalog_service_lib::MigrateAction;
use common::AppError;
use domain::{Filter, PaginationParams, DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE};

#[derive(Parser)]
#[command(name = "catalog-service")]
#[command(about = "Product catalog and warehouse management")]
struct Cli {
    /// Log at debug level regardless of RUST_LOG
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Database migration commands
    Migrate {
        #[command(subcommand)]
        action: MigrateCommands,
    },
    /// Product queries
    Products {
        #[command(subcommand)]
        action: ProductCommands,
    },
    /// Warehouse queries
    Warehouses {
        #[command(subcommand)]
        action: WarehouseCommands,
    },
}

#[derive(Subcommand)]
enum MigrateCommands {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset database and run all migrations
    Fresh,
}

#[derive(Subcommand)]
enum ProductCommands {
    /// List products with stock levels
    List {
        #[arg(long, default_value_t = DEFAULT_PAGE_NUMBER)]
        page: u64,
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        per_page: u64,
        /// Only products in this category (not paginated)
        #[arg(long)]
        category: Option<i64>,
        /// Field to sort by, e.g. name or price
        #[arg(long)]
        order_by: Option<String>,
        #[arg(long)]
        desc: bool,
    },
    /// Show one product
    Show { id: i64 },
}

#[derive(Subcommand)]
enum WarehouseCommands {
    /// List warehouses
    List {
        #[arg(long, default_value_t = DEFAULT_PAGE_NUMBER)]
        page: u64,
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        per_page: u64,
    },
    /// Show one warehouse
    Show { id: i64 },
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Surface client errors as their message, everything else generically
fn report(err: AppError) -> Box<dyn std::error::Error> {
    format!("{}: {}", err.code(), err.user_message()).into()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = CatalogServiceConfig::from_env();

    // Initialize tracing
    let filter = EnvFilter::try_new(config.log_directive(cli.verbose))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
    tracing::debug!(service = %config.service.service_name, ?config, "Configuration loaded");

    match cli.command {
        Commands::Migrate { action } => {
            let migrate_action = match action {
                MigrateCommands::Up => MigrateAction::Up,
                MigrateCommands::Down => MigrateAction::Down,
                MigrateCommands::Status => MigrateAction::Status,
                MigrateCommands::Fresh => MigrateAction::Fresh,
            };
            catalog_service_lib::run_migrations(&config, migrate_action).await?;
        }
        Commands::Products { action } => {
            let services = catalog_service_lib::connect_services(&config).await?;
            let products = services.products();

            match action {
                ProductCommands::List {
                    category: Some(category_id),
                    ..
                } => {
                    let results = products
                        .retrieve_by_category(category_id)
                        .await
                        .map_err(report)?;
                    print_json(&results)?;
                }
                ProductCommands::List {
                    page,
                    per_page,
                    order_by,
                    desc,
                    ..
                } => {
                    let params = PaginationParams::new(page, per_page);
                    let filter = Filter {
                        order_by,
                        is_desc: desc,
                    };
                    let results = products
                        .retrieve_all(params, filter)
                        .await
                        .map_err(report)?;
                    print_json(&results)?;
                }
                ProductCommands::Show { id } => {
                    let result = products.retrieve_by_id(id).await.map_err(report)?;
                    print_json(&result)?;
                }
            }
        }
        Commands::Warehouses { action } => {
            let services = catalog_service_lib::connect_services(&config).await?;
            let warehouses = services.warehouses();

            match action {
                WarehouseCommands::List { page, per_page } => {
                    let results = warehouses
                        .retrieve_all(PaginationParams::new(page, per_page))
                        .await
                        .map_err(report)?;
                    print_json(&results)?;
                }
                WarehouseCommands::Show { id } => {
                    let result = warehouses.retrieve_by_id(id).await.map_err(report)?;
                    print_json(&result)?;
                }
            }
        }
    }

    Ok(())
}
