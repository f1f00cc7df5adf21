//! ExploreWithMe main service
//!
//! Entry point wiring configuration, database, services and the HTTP router.

use std::net::SocketAddr;

use tracing::info;

use explore_with_me::config::Settings;
use explore_with_me::database::connection::{create_pool, run_migrations};
use explore_with_me::database::DatabaseService;
use explore_with_me::handlers::{main_router, AppState};
use explore_with_me::services::ServiceFactory;
use explore_with_me::utils::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging
    let _log_guard = logging::init_logging(&settings.logging, "main-service")?;

    info!("Starting {}...", explore_with_me::info());

    // Initialize database connection
    info!("Connecting to database...");
    let pool = create_pool(&settings.database).await?;

    info!("Running database migrations...");
    run_migrations(&pool).await?;

    let database_service = DatabaseService::new(pool.clone());

    // Initialize services
    info!("Initializing services...");
    let services = ServiceFactory::new(&settings, &database_service)?;

    let app = main_router(AppState { services, pool });

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    info!("Main service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    // ConnectInfo supplies the peer address used for view accounting when no
    // proxy headers are present.
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Main service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
