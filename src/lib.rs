//! Repute
//!
//! Read-only reputation query service. Answers email-id/spam reputation
//! queries with a reputon document built from two lookups against a
//! prediction store.
//!
//! ## Module Structure
//!
//! ```text
//! src/
//! ├── lib.rs         - Crate root with re-exports
//! ├── main.rs        - Server entrypoint
//! ├── config.rs      - Configuration management
//! ├── error.rs       - Error kinds and their HTTP rendering
//! ├── reputation/    - Reputon pipeline
//! │   ├── query.rs   - Request validation
//! │   ├── store.rs   - Store lookup interface, in-memory store
//! │   └── reputon.rs - Reputon assembly and encoding
//! ├── database/      - PostgreSQL persistence
//! │   ├── pool.rs        - Connection pool
//! │   └── predictions.rs - Prediction record lookups
//! └── api/           - HTTP API endpoints
//!     ├── repute.rs     - Query and health endpoints
//!     └── middleware.rs - Request logging, response headers
//! ```

pub mod api;
pub mod config;
pub mod database;
pub mod error;
pub mod reputation;

// Re-export main types for convenience
pub use config::ReputeConfig;
pub use database::{DatabasePool, PredictionRepository};
pub use error::ReputeError;

pub use api::{ReputeApiState, create_app, create_router};

pub use reputation::{
    Application, Assertion, GLOBAL_REPORTER, InMemoryStore, PredictionRecord, RateLimitRecord,
    RatingRecord, ReputationQuery, ReputationStore, Reputon, ReputonDocument, ReputonFormat,
    resolve_reputon,
};
