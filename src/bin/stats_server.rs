//! ExploreWithMe stats server
//!
//! Records endpoint hits and serves aggregated view statistics. Runs against
//! the same configuration layout as the main service; deployments override
//! the bind port through `EWM__SERVER__PORT`.

use tracing::info;

use explore_with_me::config::Settings;
use explore_with_me::database::connection::{create_pool, run_migrations};
use explore_with_me::database::DatabaseService;
use explore_with_me::handlers::stats::{stats_router, StatsState};
use explore_with_me::services::StatsService;
use explore_with_me::utils::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let settings = Settings::new()?;
    settings.validate()?;

    let _log_guard = logging::init_logging(&settings.logging, "stats-server")?;

    info!("Starting stats server ({})...", explore_with_me::info());

    info!("Connecting to database...");
    let pool = create_pool(&settings.database).await?;

    info!("Running database migrations...");
    run_migrations(&pool).await?;

    let database_service = DatabaseService::new(pool.clone());
    let stats_service = StatsService::new(database_service.stats.clone());

    let app = stats_router(StatsState { stats_service, pool });

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    info!("Stats server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Stats server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
