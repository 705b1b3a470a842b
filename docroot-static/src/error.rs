//! File resource errors

use thiserror::Error;

/// Result type for file resource operations
pub type Result<T> = std::result::Result<T, ResourceError>;

/// Failure of a single filesystem operation. None of these are fatal.
#[derive(Error, Debug)]
pub enum ResourceError {
    #[error("open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("opendir {path}: {source}")]
    DirectoryOpen {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unlink {path}: {source}")]
    Unlink {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Content was requested before the resource was opened
    #[error("{path} is not open")]
    NotOpen { path: String },
}

impl ResourceError {
    /// Path the failed operation targeted
    pub fn path(&self) -> &str {
        match self {
            ResourceError::Open { path, .. }
            | ResourceError::Write { path, .. }
            | ResourceError::Read { path, .. }
            | ResourceError::DirectoryOpen { path, .. }
            | ResourceError::Unlink { path, .. }
            | ResourceError::NotOpen { path } => path,
        }
    }

    /// Underlying OS error kind, if any
    pub fn kind(&self) -> Option<std::io::ErrorKind> {
        match self {
            ResourceError::Open { source, .. }
            | ResourceError::Write { source, .. }
            | ResourceError::Read { source, .. }
            | ResourceError::DirectoryOpen { source, .. }
            | ResourceError::Unlink { source, .. } => Some(source.kind()),
            ResourceError::NotOpen { .. } => None,
        }
    }

    /// True when the target does not exist
    pub fn is_not_found(&self) -> bool {
        self.kind() == Some(std::io::ErrorKind::NotFound)
    }
}
