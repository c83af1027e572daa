//! Parklot service entry point
//!
//! REST API server for the parking session and slot allocation engine.
//! Reads configuration from a TOML file (~/.config/parklot/config.toml).

use std::sync::Arc;

use sea_orm_migration::MigratorTrait;
use tracing::{error, info};

use parklot::application::{ClosingAggregator, ParkingService, SlotPool};
use parklot::config::AppConfig;
use parklot::domain::RepositoryProvider;
use parklot::infrastructure::database::migrator::Migrator;
use parklot::{
    create_api_router, default_config_path, init_database, DatabaseConfig,
    SeaOrmRepositoryProvider,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("PARKLOT_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting Parklot service...");

    let rates = app_cfg.rates.rate_table()?;
    let closing_offset = app_cfg.lot.closing_offset()?;

    // ── Database ───────────────────────────────────────────────
    let db_config = DatabaseConfig {
        url: app_cfg.database.connection_url(),
    };
    info!("Database: {}", db_config.url);

    let db = match init_database(&db_config).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    info!("Running database migrations...");
    if let Err(e) = Migrator::up(&db, None).await {
        error!("Failed to run migrations: {}", e);
        return Err(e.into());
    }
    info!("Migrations completed");

    // ── Repositories & Services ────────────────────────────────
    let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db));

    // Seed missing slot rows and rebuild occupancy from active sessions,
    // in case a previous run stopped between a session and a slot write.
    repos.slots().ensure_capacity(app_cfg.lot.capacity).await?;
    SlotPool::new(repos.clone()).reconcile().await?;
    info!("Slot table ready: capacity={}", app_cfg.lot.capacity);

    let parking = Arc::new(ParkingService::new(repos.clone(), rates.clone()));
    let aggregator = Arc::new(ClosingAggregator::new(repos, closing_offset));

    // ── REST API ───────────────────────────────────────────────
    let app = create_api_router(parking, aggregator, rates.currency.clone());
    let addr = app_cfg.server.address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("REST API listening on http://{} (docs at /docs)", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Parklot service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown signal received");
}
