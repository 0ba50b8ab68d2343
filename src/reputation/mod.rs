//! Reputon Pipeline
//!
//! Answers "what is the reputation of this subject, and how hard may this
//! reporter act on it?" for the email-id/spam pair.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐     ┌───────────────────┐     ┌──────────────────┐
//! │ ReputationQuery  │────►│ ReputationStore   │────►│ Reputon          │
//! │ (validation)     │     │ rating (global)   │     │ (assembly,       │
//! │                  │     │ rate (reporter)   │     │  encoding)       │
//! └──────────────────┘     └───────────────────┘     └──────────────────┘
//! ```
//!
//! Nothing is kept between requests. Each request either produces a full
//! reputon or fails with a single `ReputeError`.

mod query;
mod reputon;
mod store;

pub use query::{Application, Assertion, GLOBAL_REPORTER, ReputationQuery};
pub use reputon::{IDENTITY_DKIM, Reputon, ReputonDocument, ReputonFormat, resolve_reputon};
pub use store::{InMemoryStore, PredictionRecord, RateLimitRecord, RatingRecord, ReputationStore};
