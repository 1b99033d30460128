use std::{fmt, time::Duration};

use sqlx::{
    PgPool,
    postgres::{PgConnectOptions, PgPoolOptions},
};
use tracing::info;

use crate::{
    MIGRATOR,
    database::infrastructure::postgres::repositories::games::PostgresGameRepository,
    error::{Result, StorageError},
};

/// Deadline applied to every repository statement unless configured otherwise.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(3);

/// Statistics about the connection pool
#[derive(Debug, Clone)]
pub struct PoolStats {
    pub size: u32,
    pub idle: u32,
    pub max_size: u32,
    pub min_idle: u32,
}

/// Connection pool tuning plus the per-statement deadline.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub min_connections: u32,
    pub idle_timeout: Duration,
    pub acquire_timeout: Duration,
    pub query_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 25,
            min_connections: 0,
            idle_timeout: Duration::from_secs(15 * 60),
            acquire_timeout: Duration::from_secs(30),
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }
}

#[derive(Clone)]
pub struct PostgresDatabase {
    pool: PgPool,
    max_connections: u32,
    min_connections: u32,
    games: PostgresGameRepository,
}

impl fmt::Debug for PostgresDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pool_size = self.pool.size();
        let idle = self.pool.num_idle();

        f.debug_struct("PostgresDatabase")
            .field("pool_size", &pool_size)
            .field("idle_connections", &idle)
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .finish()
    }
}

impl PostgresDatabase {
    pub async fn new(
        connection_string: &str,
        settings: &PoolSettings,
    ) -> Result<Self> {
        let connect_options = Self::build_connect_options(connection_string)?;
        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .min_connections(settings.min_connections)
            .acquire_timeout(settings.acquire_timeout)
            .idle_timeout(settings.idle_timeout)
            .test_before_acquire(true)
            .connect_with(connect_options)
            .await
            .map_err(StorageError::Database)?;

        info!(
            max_connections = settings.max_connections,
            min_connections = settings.min_connections,
            query_timeout = ?settings.query_timeout,
            "database pool initialized"
        );

        let games =
            PostgresGameRepository::with_timeout(pool.clone(), settings.query_timeout);

        Ok(Self {
            pool,
            max_connections: settings.max_connections,
            min_connections: settings.min_connections,
            games,
        })
    }

    /// Wraps an existing pool, e.g. one handed out by `#[sqlx::test]`.
    pub fn from_pool(pool: PgPool) -> Self {
        let settings = PoolSettings::default();
        let games = PostgresGameRepository::new(pool.clone());

        Self {
            pool,
            max_connections: settings.max_connections,
            min_connections: settings.min_connections,
            games,
        }
    }

    fn build_connect_options(
        connection_string: &str,
    ) -> Result<PgConnectOptions> {
        let trimmed = connection_string.trim();
        if trimmed.is_empty() {
            return Ok(PgConnectOptions::new());
        }

        trimmed
            .parse::<PgConnectOptions>()
            .map_err(|e| StorageError::Database(e).into())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn games(&self) -> &PostgresGameRepository {
        &self.games
    }

    pub fn pool_stats(&self) -> PoolStats {
        PoolStats {
            size: self.pool.size(),
            idle: self.pool.num_idle() as u32,
            max_size: self.max_connections,
            min_idle: self.min_connections,
        }
    }

    /// Apply the embedded migrations.
    pub async fn initialize_schema(&self) -> Result<()> {
        MIGRATOR
            .run(&self.pool)
            .await
            .map_err(StorageError::Migration)?;

        info!("database migrations applied");
        Ok(())
    }
}
