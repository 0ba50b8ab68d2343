use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{Level, info};
use tracing_subscriber::fmt::format::FmtSpan;

use repute::{
    DatabasePool, ReputeApiState, ReputeConfig, ReputationStore, create_app,
    config::sanitize_for_logging,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ReputeConfig::from_env().map_err(|e| {
        eprintln!("Configuration error: {:#}", e);
        eprintln!("Please check REPUTE_* environment variables.");
        e
    })?;

    init_logging(&config)?;

    info!("Starting reputon query service");

    let db = DatabasePool::new(&config.database).await.map_err(|e| {
        anyhow::anyhow!(
            "Failed to open reputation store at {}: {:?}",
            sanitize_for_logging(&config.database.url),
            e
        )
    })?;

    let store: Arc<dyn ReputationStore> = Arc::new(db.predictions().clone());
    let app = create_app(ReputeApiState::new(store), &config);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", bind_addr, e))?;

    info!("Reputon service listening on {}", bind_addr);
    info!(
        "Request timeout: {}s, store pool: {} connections",
        config.server.request_timeout_secs, config.database.max_connections
    );

    // Serve with connect info for client IP extraction
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    db.close().await;
    info!("Reputon service stopped");

    Ok(())
}

fn init_logging(config: &ReputeConfig) -> Result<()> {
    let log_level = match config.logging.level.to_lowercase().as_str() {
        "error" => Level::ERROR,
        "warn" => Level::WARN,
        "info" => Level::INFO,
        "debug" => Level::DEBUG,
        "trace" => Level::TRACE,
        _ => Level::INFO,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_span_events(if config.logging.log_requests {
            FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        })
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set logging subscriber: {}", e))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
