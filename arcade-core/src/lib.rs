//! # Arcade Core
//!
//! Domain logic and persistence for the Arcade game catalog.
//!
//! - [`validation`]: field-level rules for games and listing filters
//! - [`database`]: the [`GameRepository`] port and its PostgreSQL adapter
//! - [`error`]: the [`CatalogError`] taxonomy every operation returns
//!
//! ## Examples
//!
//! ```no_run
//! use arcade_core::{Filters, Game, GameRepository, PostgresDatabase, Runtime};
//!
//! async fn add_and_list(db: &PostgresDatabase) -> arcade_core::Result<()> {
//!     let mut game = Game::new("Quake", 1996, Runtime(45), vec!["fps".into()]);
//!     db.games().insert(&mut game).await?;
//!
//!     let (games, metadata) = db
//!         .games()
//!         .list("quake", &[], &Filters::new(1, 20, "-year"))
//!         .await?;
//!     println!("{} of {} games", games.len(), metadata.total_records);
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

pub mod database;
pub mod error;
pub mod validation;

pub use arcade_model::{
    DEFAULT_SORT_SAFELIST, Filters, Game, GameId, Metadata, Runtime,
    SortDirection, SortField, SortKey, calculate_metadata,
};
pub use database::{
    GameRepository, PoolSettings, PostgresDatabase, PostgresGameRepository,
};
pub use error::{CatalogError, Result, StorageError};
pub use validation::{ValidationErrors, Validator};

/// Embedded schema migrations for the catalog tables.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
