//! Unified error type for the event desk.
//!
//! Every store and API operation returns [`Result`]. The variants mirror the failure
//! classes a client can observe: field-level validation failures, unknown ids, unique
//! field conflicts, and unexpected store failures.

use crate::core::validation::FieldErrors;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// All errors produced by the event desk.
#[derive(Debug, Error)]
pub enum Error {
    /// One or more fields failed decoding or validation.
    #[error("Validation failed: {errors}")]
    Validation {
        /// Field name to human-readable reason
        errors: FieldErrors,
    },

    /// The requested id does not resolve to a record.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Display name of the record kind ("Event", "Vendor", "Staff member")
        kind: &'static str,
        /// The id as supplied by the caller
        id: String,
    },

    /// A unique field already holds this value.
    #[error("{message}")]
    Conflict {
        /// The field carrying the unique constraint
        field: &'static str,
        /// Human-readable description of the conflict
        message: String,
    },

    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the problem
        message: String,
    },

    /// Underlying database failure.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// I/O failure, e.g. binding the listener.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Builds a not-found error for the given record kind.
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Maps a unique-constraint violation on `field` to `Error::Conflict`.
    /// Any other database failure passes through unchanged.
    pub(crate) fn on_unique_violation(err: DbErr, field: &'static str, message: String) -> Self {
        if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
            Self::Conflict { field, message }
        } else {
            Self::Database(err)
        }
    }
}

impl From<FieldErrors> for Error {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation { errors }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
