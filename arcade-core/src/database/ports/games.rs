use async_trait::async_trait;

use arcade_model::{Filters, Game, GameId, Metadata};

use crate::error::Result;

/// Persistent store for catalog records.
///
/// Implementations hold no per-call state and must be safe to share across
/// tasks. Every operation surfaces failures as [`crate::CatalogError`]
/// without retrying or downgrading them.
#[async_trait]
pub trait GameRepository: Send + Sync {
    /// Persists a new record and writes the storage-assigned `id`,
    /// `created_at` and `version` back onto `game`.
    async fn insert(&self, game: &mut Game) -> Result<()>;

    /// Fetches one record. Identifiers below 1 are `NotFound` without a
    /// storage round trip.
    async fn get(&self, id: GameId) -> Result<Game>;

    /// Writes `game` only if the stored version still equals `game.version`.
    ///
    /// On success the bumped version is returned and also assigned to
    /// `game.version`. Zero matching rows is `EditConflict`, whether the row
    /// was modified concurrently or deleted.
    async fn update(&self, game: &mut Game) -> Result<i32>;

    async fn delete(&self, id: GameId) -> Result<()>;

    /// One page of records matching a title search and a genre superset,
    /// plus pagination metadata for the full match set.
    ///
    /// An empty `title` or `genres` matches everything. The sort key is
    /// checked against `filters.sort_safelist` before any query is built.
    async fn list(
        &self,
        title: &str,
        genres: &[String],
        filters: &Filters,
    ) -> Result<(Vec<Game>, Metadata)>;
}
