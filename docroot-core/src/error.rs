//! Error types for docroot

use thiserror::Error;

/// Result type for docroot operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for docroot
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
