use std::future::Future;
use std::time::Duration;

use arcade_model::{
    Filters, Game, GameId, Metadata, Runtime, SortField, SortKey,
    calculate_metadata,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{debug, info, warn};

use crate::{
    database::{ports::games::GameRepository, postgres::DEFAULT_QUERY_TIMEOUT},
    error::{CatalogError, Result, StorageError},
    validation::{ValidationErrors, Validator, validate_filters},
};

const GAME_COLUMNS: &str = "id, created_at, title, year, runtime, genres, description, size, price, version";

#[derive(Clone, Debug)]
pub struct PostgresGameRepository {
    pool: PgPool,
    query_timeout: Duration,
}

impl PostgresGameRepository {
    pub fn new(pool: PgPool) -> Self {
        Self::with_timeout(pool, DEFAULT_QUERY_TIMEOUT)
    }

    pub fn with_timeout(pool: PgPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs one statement under the repository deadline.
    async fn with_deadline<T, F>(&self, operation: &'static str, fut: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.query_timeout, fut).await {
            Ok(result) => result.map_err(|err| {
                debug!(operation, error = %err, "games statement failed");
                CatalogError::from(err)
            }),
            Err(_) => {
                warn!(
                    operation,
                    timeout = ?self.query_timeout,
                    "games statement exceeded deadline"
                );
                Err(StorageError::Timeout(self.query_timeout).into())
            }
        }
    }
}

/// Validates paging and resolves the sort key before any SQL exists.
fn resolve_sort(filters: &Filters) -> Result<SortKey> {
    let mut v = Validator::new();
    validate_filters(&mut v, filters);
    v.into_result()?;

    filters.sort_key().ok_or_else(|| {
        CatalogError::Validation(ValidationErrors::single(
            "sort",
            "invalid sort value",
        ))
    })
}

/// Builds the listing statement. Every caller value is bound; the ORDER BY
/// text comes from [`SortKey`] and is therefore one of a fixed set.
fn list_query<'a>(
    title: &'a str,
    genres: &[String],
    sort: SortKey,
    filters: &Filters,
) -> QueryBuilder<'a, Postgres> {
    let mut builder = QueryBuilder::<Postgres>::new(
        "SELECT count(*) OVER() AS total_records, ",
    );
    builder.push(GAME_COLUMNS);
    builder.push(" FROM games WHERE 1=1");

    if !title.is_empty() {
        builder.push(
            " AND to_tsvector('simple', title) @@ plainto_tsquery('simple', ",
        );
        builder.push_bind(title);
        builder.push(")");
    }

    if !genres.is_empty() {
        builder.push(" AND genres @> ");
        builder.push_bind(genres.to_vec());
    }

    builder.push(" ORDER BY ");
    builder.push(sort.field.column());
    builder.push(" ");
    builder.push(sort.direction.keyword());
    if sort.field != SortField::Id {
        builder.push(", id ASC");
    }

    builder.push(" LIMIT ");
    builder.push_bind(filters.limit());
    builder.push(" OFFSET ");
    builder.push_bind(filters.offset());

    builder
}

#[async_trait]
impl GameRepository for PostgresGameRepository {
    async fn insert(&self, game: &mut Game) -> Result<()> {
        let (id, created_at, version) = self
            .with_deadline(
                "insert",
                sqlx::query_as::<_, (GameId, DateTime<Utc>, i32)>(
                    r#"
                    INSERT INTO games (title, year, runtime, genres, description, size, price)
                    VALUES ($1, $2, $3, $4, $5, $6, $7)
                    RETURNING id, created_at, version
                    "#,
                )
                .bind(&game.title)
                .bind(game.year)
                .bind(game.runtime)
                .bind(&game.genres)
                .bind(&game.description)
                .bind(game.size)
                .bind(game.price)
                .fetch_one(self.pool()),
            )
            .await?;

        game.id = id;
        game.created_at = created_at;
        game.version = version;

        info!(game_id = id, title = %game.title, "game inserted");
        Ok(())
    }

    async fn get(&self, id: GameId) -> Result<Game> {
        if id < 1 {
            return Err(CatalogError::NotFound);
        }

        let sql = format!("SELECT {GAME_COLUMNS} FROM games WHERE id = $1");
        let row = self
            .with_deadline(
                "get",
                sqlx::query_as::<_, GameRow>(&sql)
                    .bind(id)
                    .fetch_optional(self.pool()),
            )
            .await?;

        row.map(Game::from).ok_or(CatalogError::NotFound)
    }

    async fn update(&self, game: &mut Game) -> Result<i32> {
        if !game.is_persisted() {
            return Err(CatalogError::NotFound);
        }

        let version = self
            .with_deadline(
                "update",
                sqlx::query_scalar::<_, i32>(
                    r#"
                    UPDATE games
                    SET title = $1, year = $2, runtime = $3, genres = $4,
                        description = $5, size = $6, price = $7,
                        version = version + 1
                    WHERE id = $8 AND version = $9
                    RETURNING version
                    "#,
                )
                .bind(&game.title)
                .bind(game.year)
                .bind(game.runtime)
                .bind(&game.genres)
                .bind(&game.description)
                .bind(game.size)
                .bind(game.price)
                .bind(game.id)
                .bind(game.version)
                .fetch_optional(self.pool()),
            )
            .await?;

        let Some(version) = version else {
            debug!(
                game_id = game.id,
                expected_version = game.version,
                "conditional update matched no rows"
            );
            return Err(CatalogError::EditConflict);
        };

        game.version = version;
        Ok(version)
    }

    async fn delete(&self, id: GameId) -> Result<()> {
        if id < 1 {
            return Err(CatalogError::NotFound);
        }

        let result = self
            .with_deadline(
                "delete",
                sqlx::query("DELETE FROM games WHERE id = $1")
                    .bind(id)
                    .execute(self.pool()),
            )
            .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::NotFound);
        }

        info!(game_id = id, "game deleted");
        Ok(())
    }

    async fn list(
        &self,
        title: &str,
        genres: &[String],
        filters: &Filters,
    ) -> Result<(Vec<Game>, Metadata)> {
        let sort = resolve_sort(filters)?;

        let mut builder = list_query(title, genres, sort, filters);
        let rows = self
            .with_deadline(
                "list",
                builder
                    .build_query_as::<CountedGameRow>()
                    .fetch_all(self.pool()),
            )
            .await?;

        // Every row carries the same window count; no rows means no total.
        let total = rows.first().map(|row| row.total_records).unwrap_or(0);
        let games: Vec<Game> =
            rows.into_iter().map(|row| row.game.into()).collect();

        let metadata = calculate_metadata(total, filters.page, filters.page_size);
        if metadata.is_empty() {
            debug!(page = filters.page, sort = %sort, "listing matched no games");
        } else {
            debug!(
                returned = games.len(),
                total,
                sort = %sort,
                "listed games"
            );
        }

        Ok((games, metadata))
    }
}

// Database row types for the games table
#[derive(sqlx::FromRow)]
struct GameRow {
    id: GameId,
    created_at: DateTime<Utc>,
    title: String,
    year: i32,
    runtime: Runtime,
    genres: Vec<String>,
    description: Vec<String>,
    size: f64,
    price: f64,
    version: i32,
}

#[derive(sqlx::FromRow)]
struct CountedGameRow {
    total_records: i64,
    #[sqlx(flatten)]
    game: GameRow,
}

impl From<GameRow> for Game {
    fn from(row: GameRow) -> Self {
        Game {
            id: row.id,
            created_at: row.created_at,
            title: row.title,
            year: row.year,
            runtime: row.runtime,
            genres: row.genres,
            description: row.description,
            size: row.size,
            price: row.price,
            version: row.version,
        }
    }
}
