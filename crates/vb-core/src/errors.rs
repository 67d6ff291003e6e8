//! Cross-cutting error types for venuebook.
//!
//! Store- and renderer-specific errors (`DatabaseError`, `ReportError`) live in
//! their own crates. The CLI converges everything into `anyhow`.

use thiserror::Error;

/// Errors that can be raised by any venuebook crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: i64 },

    /// Data failed validation (missing fields, negative charges, bad shape).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
