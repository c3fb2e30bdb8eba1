//! Error types for the ledger

use thiserror::Error;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ledger errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Referenced user does not exist
    #[error("User not found: {0}")]
    NotFound(String),

    /// Missing, zero, or negative amount; malformed operation or record
    #[error("Validation error: {0}")]
    Validation(String),

    /// User with this name already exists
    #[error("User already exists: {0}")]
    Conflict(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Short machine-readable kind
    pub fn kind(&self) -> &'static str {
        match self {
            Error::NotFound(_) => "not_found",
            Error::Validation(_) => "validation",
            Error::Conflict(_) => "conflict",
            Error::Other(_) => "other",
        }
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}
