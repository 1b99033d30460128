//! PostgreSQL-backed repository implementations.

pub mod games;
