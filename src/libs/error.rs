//! Error types for the task core.
//!
//! Storage failures abort a mutation and reach the caller. Scheduling and
//! widget failures happen after the write has committed, so they are logged
//! and reported as warnings instead.

use rusqlite::ErrorCode;

/// Failure at the persistence boundary. The mutation is not applied.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Constraint violation, e.g. a task pointing at a missing category.
    #[error("constraint violation: {0}")]
    Constraint(String),

    /// Entity addressed by id does not exist.
    #[error("{entity} #{id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// Operation needs a stored entity but got one without an id.
    #[error("{0} has no id")]
    MissingId(&'static str),

    /// Schema migration failed.
    #[error("migration v{version} failed: {reason}")]
    Migration { version: u32, reason: String },

    /// Any other SQLite failure.
    #[error("database error: {0}")]
    Sqlite(rusqlite::Error),

    /// Database file or directory could not be accessed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(code, ref message) if code.code == ErrorCode::ConstraintViolation => {
                StorageError::Constraint(message.clone().unwrap_or_else(|| code.to_string()))
            }
            other => StorageError::Sqlite(other),
        }
    }
}

/// The reminder scheduler could not arrange or cancel a notification.
#[derive(Debug, thiserror::Error)]
pub enum SchedulingError {
    /// Notifications are not permitted (disabled in the configuration).
    #[error("notifications are not permitted: {0}")]
    PermissionDenied(String),

    /// The reminder store failed.
    #[error("reminder store error: {0}")]
    Store(String),
}

impl From<rusqlite::Error> for SchedulingError {
    fn from(err: rusqlite::Error) -> Self {
        SchedulingError::Store(err.to_string())
    }
}

/// The widget snapshot could not be republished.
#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Non-fatal failure of a mutation side effect.
#[derive(Debug, thiserror::Error)]
pub enum SideEffectError {
    #[error("reminder for task #{task_id}: {source}")]
    Scheduling {
        task_id: i64,
        #[source]
        source: SchedulingError,
    },

    #[error("widget refresh: {0}")]
    Refresh(#[from] RefreshError),
}

/// Convenience result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
