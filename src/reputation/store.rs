//! Reputation Store Interface
//!
//! Two read-only point lookups against prediction records keyed by
//! `(subject, reporter)`. The rating is always read from the global record;
//! the rate limit is read for the requested reporter only.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::error::ReputeError;
use crate::reputation::query::GLOBAL_REPORTER;

/// A stored prediction row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub ratio_high: f64,
    pub updated: DateTime<Utc>,
    pub rate_samples: i64,
    pub daily_limit_low: i64,
}

/// Reporter-independent part of the global record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingRecord {
    pub ratio_high: f64,
    /// Epoch seconds
    pub updated: i64,
    pub rate_samples: i64,
}

/// Reporter-specific rate threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitRecord {
    pub daily_limit_low: i64,
}

impl From<&PredictionRecord> for RatingRecord {
    fn from(record: &PredictionRecord) -> Self {
        Self {
            ratio_high: record.ratio_high,
            updated: record.updated.timestamp(),
            rate_samples: record.rate_samples,
        }
    }
}

impl From<&PredictionRecord> for RateLimitRecord {
    fn from(record: &PredictionRecord) -> Self {
        Self {
            daily_limit_low: record.daily_limit_low,
        }
    }
}

/// Read access to prediction records.
///
/// `subject` and `reporter` are untrusted caller input and must only ever
/// be used as bound values.
#[async_trait]
pub trait ReputationStore: Send + Sync {
    /// Fetch the global record for `subject`
    async fn lookup_rating(&self, subject: &str) -> Result<RatingRecord, ReputeError>;

    /// Fetch the record for `(subject, reporter)`. There is no fallback to
    /// the global reporter.
    async fn lookup_rate_limit(
        &self,
        subject: &str,
        reporter: &str,
    ) -> Result<RateLimitRecord, ReputeError>;

    /// Check that the store is reachable
    async fn ping(&self) -> Result<(), ReputeError> {
        Ok(())
    }
}

/// Map-backed store for tests and embedding
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: RwLock<HashMap<(String, String), PredictionRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, subject: &str, reporter: &str, record: PredictionRecord) {
        self.records
            .write()
            .await
            .insert((subject.to_string(), reporter.to_string()), record);
    }

    async fn get(&self, subject: &str, reporter: &str) -> Option<PredictionRecord> {
        self.records
            .read()
            .await
            .get(&(subject.to_string(), reporter.to_string()))
            .cloned()
    }
}

#[async_trait]
impl ReputationStore for InMemoryStore {
    async fn lookup_rating(&self, subject: &str) -> Result<RatingRecord, ReputeError> {
        self.get(subject, GLOBAL_REPORTER)
            .await
            .map(|record| RatingRecord::from(&record))
            .ok_or(ReputeError::RecordNotFound)
    }

    async fn lookup_rate_limit(
        &self,
        subject: &str,
        reporter: &str,
    ) -> Result<RateLimitRecord, ReputeError> {
        self.get(subject, reporter)
            .await
            .map(|record| RateLimitRecord::from(&record))
            .ok_or(ReputeError::RecordNotFound)
    }
}
