//! Storage for catalog records.
//!
//! Ports describe what the domain needs from storage; the PostgreSQL adapter
//! under `infrastructure` is the only implementation.

pub mod infrastructure;
pub mod ports;
pub mod postgres;

pub use infrastructure::postgres::repositories::games::PostgresGameRepository;
pub use ports::games::GameRepository;
pub use postgres::{PoolSettings, PoolStats, PostgresDatabase};
