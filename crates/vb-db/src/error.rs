//! Error types for vb-db.
//!
//! `DatabaseError` is raised by the store layer. `BookingError` is the
//! service-layer taxonomy callers translate into user-facing responses.

use thiserror::Error;
use vb_core::errors::CoreError;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Lookup against a missing id, or an inactive one when inactive rows
    /// are excluded. The message never says which.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// A SQL query failed or returned unparseable data.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DatabaseError {
    /// Whether this is the distinguishable not-found kind.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Errors surfaced by the booking service.
#[derive(Debug, Error)]
pub enum BookingError {
    /// Payload failed validation. Raised before any write.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The reservation does not exist (or is cancelled, for active-only lookups).
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// The store is unavailable or rejected the write.
    #[error("Persistence failure: {0}")]
    Persistence(#[source] DatabaseError),
}

/// Errors from delivering a booking notice. Logged and discarded by the
/// booking service; they never reach the caller of `book`.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Neither the owner nor any administrator has an address.
    #[error("no recipient for reservation {reservation_id}")]
    NoRecipient { reservation_id: i64 },

    /// A message template failed to compile or render.
    #[error("template error: {0}")]
    Template(String),

    /// The outbox could not be written.
    #[error("outbox write failed: {0}")]
    Io(#[from] std::io::Error),

    /// The delivery task was cancelled or panicked.
    #[error("delivery task failed: {0}")]
    Task(String),
}

impl From<DatabaseError> for BookingError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound { entity, id } => Self::NotFound { entity, id },
            other => Self::Persistence(other),
        }
    }
}

impl From<CoreError> for BookingError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => Self::Validation(msg),
            CoreError::NotFound { id, .. } => Self::NotFound {
                entity: "reservation",
                id,
            },
            CoreError::Other(e) => Self::Persistence(DatabaseError::Other(e)),
        }
    }
}
