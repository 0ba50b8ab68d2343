//! Prediction Repository - read-only lookups against `predictions`
//!
//! Reference table layout (maintained elsewhere):
//!
//! ```sql
//! CREATE TABLE predictions (
//!     name             TEXT NOT NULL,
//!     reporter         TEXT NOT NULL,
//!     ratio_high       DOUBLE PRECISION NOT NULL,
//!     updated          TIMESTAMP WITH TIME ZONE NOT NULL,
//!     rate_samples     BIGINT NOT NULL,
//!     daily_limit_low  BIGINT NOT NULL,
//!     PRIMARY KEY (name, reporter)
//! );
//! ```
//!
//! Any numeric column types and either timestamp flavour are accepted; the
//! queries cast to the decoded types and convert `updated` to epoch seconds.

use async_trait::async_trait;
use sqlx::Row;
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgPool, Postgres};
use tracing::debug;

use crate::error::ReputeError;
use crate::reputation::{GLOBAL_REPORTER, RateLimitRecord, RatingRecord, ReputationStore};

const RATING_QUERY: &str = r#"
    SELECT ratio_high::float8 AS ratio_high,
           FLOOR(EXTRACT(EPOCH FROM updated))::bigint AS updated,
           rate_samples::bigint AS rate_samples
    FROM predictions
    WHERE name = $1 AND reporter = $2
"#;

const RATE_LIMIT_QUERY: &str = r#"
    SELECT daily_limit_low::bigint AS daily_limit_low
    FROM predictions
    WHERE name = $1 AND reporter = $2
"#;

#[derive(Clone)]
pub struct PredictionRepository {
    pool: PgPool,
}

impl PredictionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Check out a connection. Anything that goes wrong here (refused,
    /// timed out, bad credentials, unknown database) means the store is
    /// unavailable rather than the lookup failing.
    async fn connection(&self) -> Result<PoolConnection<Postgres>, ReputeError> {
        self.pool
            .acquire()
            .await
            .map_err(|e| ReputeError::StoreUnavailable(e.to_string()))
    }
}

#[async_trait]
impl ReputationStore for PredictionRepository {
    async fn lookup_rating(&self, subject: &str) -> Result<RatingRecord, ReputeError> {
        let mut conn = self.connection().await?;
        let row = sqlx::query(RATING_QUERY)
            .bind(subject)
            .bind(GLOBAL_REPORTER)
            .fetch_optional(&mut *conn)
            .await?;

        let Some(row) = row else {
            debug!("No global prediction record");
            return Err(ReputeError::RecordNotFound);
        };

        Ok(RatingRecord {
            ratio_high: row.try_get("ratio_high")?,
            updated: row.try_get("updated")?,
            rate_samples: row.try_get("rate_samples")?,
        })
    }

    async fn lookup_rate_limit(
        &self,
        subject: &str,
        reporter: &str,
    ) -> Result<RateLimitRecord, ReputeError> {
        let mut conn = self.connection().await?;
        let row = sqlx::query(RATE_LIMIT_QUERY)
            .bind(subject)
            .bind(reporter)
            .fetch_optional(&mut *conn)
            .await?;

        let Some(row) = row else {
            debug!("No reporter prediction record");
            return Err(ReputeError::RecordNotFound);
        };

        Ok(RateLimitRecord {
            daily_limit_low: row.try_get("daily_limit_low")?,
        })
    }

    async fn ping(&self) -> Result<(), ReputeError> {
        let mut conn = self.connection().await?;
        sqlx::query("SELECT 1").execute(&mut *conn).await?;
        Ok(())
    }
}
