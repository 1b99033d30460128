//! Core data model definitions shared across Arcade crates.
#![allow(missing_docs)]

pub mod error;
pub mod filters;
pub mod game;
pub mod metadata;

pub use error::ModelError;
pub use filters::{
    DEFAULT_SORT_SAFELIST, Filters, MAX_PAGE, MAX_PAGE_SIZE, SortDirection,
    SortField, SortKey,
};
pub use game::{Game, GameId, Runtime};
pub use metadata::{Metadata, calculate_metadata};
