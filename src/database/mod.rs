//! PostgreSQL Database Module
//!
//! Connection pool and the read-only prediction repository.

pub mod pool;
pub mod predictions;

pub use pool::DatabasePool;
pub use predictions::PredictionRepository;
