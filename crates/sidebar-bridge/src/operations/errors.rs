//! Errors raised by job operations.

use thiserror::Error;

use crate::collaborators::{LoaderError, StoreError};

/// Failure of a single job operation.
///
/// Collaborator failures are transparent so the sidebar shows the message
/// the store or loader produced.
#[derive(Debug, Error)]
pub enum OperationError {
    /// The job lacks a field the operation needs.
    #[error("job is missing required field '{field}'")]
    MissingField {
        /// JSON name of the absent field.
        field: &'static str,
    },

    /// No loader is registered for the requested entity.
    #[error("no loader registered for entity '{entity}'")]
    UnknownEntity {
        /// Entity tag carried by the job.
        entity: String,
    },

    /// A job field holds a value the operation cannot use.
    #[error("invalid {field}: {message}")]
    InvalidArgument {
        /// JSON name of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        message: String,
    },

    /// The stored job counter is not a non-negative integer.
    #[error("stored job id '{value}' is not a non-negative integer")]
    InvalidJobId {
        /// Text found in the property store.
        value: String,
    },

    /// The job counter cannot be advanced any further.
    #[error("job id counter overflowed")]
    JobIdOverflow,

    /// Appending the log rows would move the offset past the largest row.
    #[error("log offset {offset} cannot advance by {rows} row(s)")]
    OffsetOverflow {
        /// Offset carried by the job.
        offset: u64,
        /// Rows that were to be written.
        rows: usize,
    },

    /// A sheet, property or id store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// An entity loader failed.
    #[error(transparent)]
    Loader(#[from] LoaderError),
}

impl OperationError {
    /// Creates a missing field error.
    pub fn missing_field(field: &'static str) -> Self {
        Self::MissingField { field }
    }

    /// Creates an unknown entity error.
    pub fn unknown_entity(entity: impl Into<String>) -> Self {
        Self::UnknownEntity {
            entity: entity.into(),
        }
    }

    /// Creates an invalid argument error.
    pub fn invalid_argument(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field,
            message: message.into(),
        }
    }

    /// Creates an invalid job id error.
    pub fn invalid_job_id(value: impl Into<String>) -> Self {
        Self::InvalidJobId {
            value: value.into(),
        }
    }
}
