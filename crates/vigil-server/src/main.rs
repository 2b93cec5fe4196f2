//! Vigil Server — Application entry point.

use std::env;

use tracing_subscriber::EnvFilter;
use vigil_db::{DbConfig, DbManager};

fn config_from_env() -> DbConfig {
    let defaults = DbConfig::default();
    DbConfig {
        url: env::var("VIGIL_DB_URL").unwrap_or(defaults.url),
        namespace: env::var("VIGIL_DB_NAMESPACE").unwrap_or(defaults.namespace),
        database: env::var("VIGIL_DB_DATABASE").unwrap_or(defaults.database),
        username: env::var("VIGIL_DB_USERNAME").unwrap_or(defaults.username),
        password: env::var("VIGIL_DB_PASSWORD").unwrap_or(defaults.password),
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("vigil=info".parse().unwrap()))
        .json()
        .init();

    tracing::info!("Starting Vigil server...");

    let config = config_from_env();
    let manager = match DbManager::connect(&config).await {
        Ok(manager) => manager,
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to SurrealDB");
            std::process::exit(1);
        }
    };

    if let Err(e) = vigil_db::run_migrations(manager.client()).await {
        tracing::error!(error = %e, "Failed to run migrations");
        std::process::exit(1);
    }

    tracing::info!("Schema is up to date; Vigil server ready.");

    tracing::info!("Vigil server stopped.");
}
