use std::time::Duration;

use thiserror::Error;

use crate::validation::ValidationErrors;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("record not found")]
    NotFound,

    #[error("edit conflict")]
    EditConflict,

    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Backend failures that carry no domain meaning.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("query exceeded the {0:?} deadline")]
    Timeout(Duration),

    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl CatalogError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound)
    }

    pub fn is_edit_conflict(&self) -> bool {
        matches!(self, CatalogError::EditConflict)
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, CatalogError::Validation(_))
    }

    pub fn is_storage(&self) -> bool {
        matches!(self, CatalogError::Storage(_))
    }
}

impl From<sqlx::Error> for CatalogError {
    fn from(err: sqlx::Error) -> Self {
        CatalogError::Storage(StorageError::Database(err))
    }
}

impl From<ValidationErrors> for CatalogError {
    fn from(errors: ValidationErrors) -> Self {
        CatalogError::Validation(errors)
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
