use std::path::PathBuf;

use thiserror::Error;

/// Result alias for the persistence and controller layers.
pub type Result<T, E = PlaceError> = std::result::Result<T, E>;

/// Failures surfaced by the place store and the place list controller.
#[derive(Debug, Error)]
pub enum PlaceError {
    /// A required field was missing or malformed. Raised before any
    /// statement executes.
    #[error("{0}")]
    Validation(String),

    /// Opening the connection or executing a statement failed.
    #[error("failed to {action}")]
    Storage {
        action: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    /// The database's parent directory could not be prepared.
    #[error("failed to prepare data directory {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The write for place `id` committed, but reloading the snapshot
    /// afterwards failed. Resubmitting would repeat the write.
    #[error("place {id} was saved, but refreshing the list failed")]
    Unsynced {
        id: i64,
        #[source]
        source: Box<PlaceError>,
    },

    /// A stored value did not match the expected column mapping.
    #[error("column `{column}` holds an unexpected {found} value")]
    Decode {
        column: &'static str,
        found: &'static str,
    },
}

impl PlaceError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        PlaceError::Validation(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, PlaceError::Validation(_))
    }

    /// The underlying write went through even though the call failed.
    pub fn is_saved(&self) -> bool {
        matches!(self, PlaceError::Unsynced { .. })
    }

    /// Connection, statement, filesystem, and decode failures all count as
    /// storage-side problems.
    pub fn is_storage(&self) -> bool {
        !self.is_validation()
    }
}

/// Build a `map_err` adapter that tags a SQLite error with what we were doing.
pub(crate) fn storage(action: &'static str) -> impl FnOnce(rusqlite::Error) -> PlaceError {
    move |source| PlaceError::Storage { action, source }
}
