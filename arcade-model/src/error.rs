use std::fmt::{self, Display};

/// Errors produced by model constructors and parsers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    InvalidRuntime(String),
    InvalidSortKey(String),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::InvalidRuntime(raw) => {
                write!(f, "invalid runtime format: {raw:?}")
            }
            ModelError::InvalidSortKey(raw) => {
                write!(f, "unknown sort key: {raw:?}")
            }
        }
    }
}

impl std::error::Error for ModelError {}
