//! Database Connection Pool using sqlx

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::info;

use crate::config::{DatabaseConfig, sanitize_for_logging};
use crate::database::predictions::PredictionRepository;
use crate::error::ReputeError;

pub struct DatabasePool {
    pool: PgPool,
    predictions: PredictionRepository,
}

impl DatabasePool {
    pub async fn new(config: &DatabaseConfig) -> Result<Self, ReputeError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect(&config.url)
            .await
            .map_err(|e| {
                ReputeError::StoreUnavailable(format!("Failed to connect to PostgreSQL: {}", e))
            })?;

        info!(
            "Connected to PostgreSQL at {} (max_connections={})",
            sanitize_for_logging(&config.url),
            config.max_connections
        );

        Ok(Self::from_pool(pool))
    }

    /// Wrap an existing pool without connecting
    fn from_pool(pool: PgPool) -> Self {
        let predictions = PredictionRepository::new(pool.clone());
        Self { pool, predictions }
    }

    pub fn predictions(&self) -> &PredictionRepository {
        &self.predictions
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("PostgreSQL pool closed");
    }
}
