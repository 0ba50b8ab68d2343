//! Reputon Assembly and Encoding
//!
//! Maps the two store lookups onto the reputon document and writes it in
//! the requested encoding. Values pass through exactly as the store
//! returned them.

use serde::Serialize;

use crate::error::ReputeError;
use crate::reputation::query::{Application, Assertion, ReputationQuery};
use crate::reputation::store::{RateLimitRecord, RatingRecord, ReputationStore};

/// Identity scheme the rated subjects are keyed by
pub const IDENTITY_DKIM: &str = "dkim";

/// Output encoding of a reputon document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReputonFormat {
    #[default]
    Json,
}

impl ReputonFormat {
    pub fn parse(value: &str) -> Result<Self, ReputeError> {
        if value.eq_ignore_ascii_case("json") {
            Ok(Self::Json)
        } else {
            Err(ReputeError::UnrecognizedFormat)
        }
    }

    pub fn media_type(&self) -> &'static str {
        match self {
            Self::Json => "application/reputon+json",
        }
    }

    pub fn encode(&self, document: &ReputonDocument) -> Result<Vec<u8>, ReputeError> {
        match self {
            Self::Json => {
                serde_json::to_vec(document).map_err(|e| ReputeError::Encoding(e.to_string()))
            }
        }
    }
}

/// A single reputation assertion about a rated subject
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reputon {
    pub rater: String,
    pub assertion: Assertion,
    pub rated: String,
    pub rating: f64,
    pub identity: &'static str,
    pub rate: i64,
    #[serde(rename = "sample-size")]
    pub sample_size: i64,
    /// Epoch seconds of the rating's last recomputation
    pub generated: i64,
}

/// Top-level response body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReputonDocument {
    pub application: Application,
    pub reputons: Vec<Reputon>,
}

impl Reputon {
    pub fn assemble(
        query: &ReputationQuery,
        rating: &RatingRecord,
        rate_limit: &RateLimitRecord,
    ) -> ReputonDocument {
        ReputonDocument {
            application: query.application,
            reputons: vec![Reputon {
                rater: query.service.clone(),
                assertion: query.assertion,
                rated: query.subject.clone(),
                rating: rating.ratio_high,
                identity: IDENTITY_DKIM,
                rate: rate_limit.daily_limit_low,
                sample_size: rating.rate_samples,
                generated: rating.updated,
            }],
        }
    }
}

/// Run both lookups for a validated query and assemble the result.
///
/// The lookups are independent and run concurrently. If both fail, the
/// rating lookup's error is the one reported.
pub async fn resolve_reputon(
    store: &dyn ReputationStore,
    query: &ReputationQuery,
) -> Result<ReputonDocument, ReputeError> {
    let (rating, rate_limit) = tokio::join!(
        store.lookup_rating(&query.subject),
        store.lookup_rate_limit(&query.subject, &query.reporter),
    );
    let rating = rating?;
    let rate_limit = rate_limit?;

    Ok(Reputon::assemble(query, &rating, &rate_limit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reputation::query::GLOBAL_REPORTER;
    use crate::reputation::store::{InMemoryStore, PredictionRecord};
    use chrono::{TimeZone, Utc};

    fn alice_query(reporter: &str) -> ReputationQuery {
        ReputationQuery {
            application: Application::EmailId,
            assertion: Assertion::Spam,
            service: "example.com".to_string(),
            subject: "alice@example.com".to_string(),
            reporter: reporter.to_string(),
            format: ReputonFormat::Json,
        }
    }

    fn record(
        ratio_high: f64,
        updated: i64,
        rate_samples: i64,
        daily_limit_low: i64,
    ) -> PredictionRecord {
        PredictionRecord {
            ratio_high,
            updated: Utc.timestamp_opt(updated, 0).unwrap(),
            rate_samples,
            daily_limit_low,
        }
    }

    async fn alice_store() -> InMemoryStore {
        let store = InMemoryStore::new();
        store
            .insert("alice@example.com", GLOBAL_REPORTER, record(0.2, 1_700_000_000, 150, 50))
            .await;
        store
    }

    #[test]
    fn test_format_parse_and_media_type() {
        assert_eq!(ReputonFormat::parse("Json").unwrap(), ReputonFormat::Json);
        assert!(ReputonFormat::parse("cbor").is_err());
        assert_eq!(ReputonFormat::Json.media_type(), "application/reputon+json");
    }

    #[test]
    fn test_assemble_maps_fields() {
        let doc = Reputon::assemble(
            &alice_query(GLOBAL_REPORTER),
            &RatingRecord {
                ratio_high: 0.75,
                updated: 42,
                rate_samples: 9,
            },
            &RateLimitRecord { daily_limit_low: 3 },
        );

        assert_eq!(doc.application, Application::EmailId);
        assert_eq!(doc.reputons.len(), 1);
        let r = &doc.reputons[0];
        assert_eq!(r.rater, "example.com");
        assert_eq!(r.rated, "alice@example.com");
        assert_eq!(r.rating, 0.75);
        assert_eq!(r.identity, "dkim");
        assert_eq!(r.rate, 3);
        assert_eq!(r.sample_size, 9);
        assert_eq!(r.generated, 42);
    }

    #[test]
    fn test_json_encoding_shape() {
        let doc = Reputon::assemble(
            &alice_query(GLOBAL_REPORTER),
            &RatingRecord {
                ratio_high: 0.2,
                updated: 1_700_000_000,
                rate_samples: 150,
            },
            &RateLimitRecord {
                daily_limit_low: 50,
            },
        );
        let body = ReputonFormat::Json.encode(&doc).unwrap();
        assert_eq!(
            String::from_utf8(body).unwrap(),
            concat!(
                r#"{"application":"email-id","reputons":[{"rater":"example.com","#,
                r#""assertion":"spam","rated":"alice@example.com","rating":0.2,"#,
                r#""identity":"dkim","rate":50,"sample-size":150,"generated":1700000000}]}"#,
            )
        );
    }

    #[test]
    fn test_encoding_escapes_untrusted_strings() {
        let mut query = alice_query(GLOBAL_REPORTER);
        query.service = "evil\",\"rating\":1".to_string();
        let doc = Reputon::assemble(
            &query,
            &RatingRecord {
                ratio_high: 0.0,
                updated: 0,
                rate_samples: 0,
            },
            &RateLimitRecord { daily_limit_low: 0 },
        );
        let body = ReputonFormat::Json.encode(&doc).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["reputons"][0]["rater"], "evil\",\"rating\":1");
        assert_eq!(value["reputons"][0]["rating"], 0.0);
    }

    #[tokio::test]
    async fn test_resolve_with_global_reporter() {
        let store = alice_store().await;
        let doc = resolve_reputon(&store, &alice_query(GLOBAL_REPORTER))
            .await
            .unwrap();
        assert_eq!(doc.reputons[0].rate, 50);
        assert_eq!(doc.reputons[0].sample_size, 150);
    }

    #[tokio::test]
    async fn test_resolve_with_specific_reporter() {
        let store = alice_store().await;
        store
            .insert("alice@example.com", "bob.example.com", record(0.9, 1, 1, 10))
            .await;

        let doc = resolve_reputon(&store, &alice_query("bob.example.com"))
            .await
            .unwrap();
        let r = &doc.reputons[0];
        assert_eq!(r.rate, 10);
        assert_eq!(r.rating, 0.2);
        assert_eq!(r.sample_size, 150);
        assert_eq!(r.generated, 1_700_000_000);
    }

    #[tokio::test]
    async fn test_resolve_missing_reporter_record_has_no_fallback() {
        let store = alice_store().await;
        let result = resolve_reputon(&store, &alice_query("carol.example.com")).await;
        assert!(matches!(result, Err(ReputeError::RecordNotFound)));
    }

    #[tokio::test]
    async fn test_resolve_missing_global_record() {
        let store = InMemoryStore::new();
        store
            .insert("alice@example.com", "bob.example.com", record(0.9, 1, 1, 10))
            .await;
        let result = resolve_reputon(&store, &alice_query("bob.example.com")).await;
        assert!(matches!(result, Err(ReputeError::RecordNotFound)));
    }
}
