use std::{fmt, sync::Arc};

use arcade_core::{GameRepository, PostgresDatabase};

use crate::infra::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub games: Arc<dyn GameRepository>,
    pub config: Arc<Config>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("environment", &self.config.environment)
            .finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(games: Arc<dyn GameRepository>, config: Arc<Config>) -> Self {
        Self { games, config }
    }

    pub fn from_database(db: &PostgresDatabase, config: Arc<Config>) -> Self {
        Self::new(Arc::new(db.games().clone()), config)
    }
}
