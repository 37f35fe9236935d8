//! Error types for operation dispatch.

use thiserror::Error;

use crate::operations::OperationError;

/// Errors raised while routing a call to its operation.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Operation name is not in the operation table.
    #[error("unknown operation: {operation}")]
    UnknownOperation {
        /// Name sent by the caller.
        operation: String,
    },

    /// Payload cannot be decoded into the input the operation expects.
    #[error("invalid job payload: {message}")]
    InvalidEnvelope {
        /// Decoder message.
        message: String,
    },

    /// The resulting job could not be serialized.
    #[error("failed to serialize response: {0}")]
    SerializeResponse(#[from] serde_json::Error),

    /// The operation itself failed.
    #[error(transparent)]
    Operation(#[from] OperationError),
}

impl DispatchError {
    /// Creates an unknown operation error.
    pub fn unknown_operation(operation: impl Into<String>) -> Self {
        Self::UnknownOperation {
            operation: operation.into(),
        }
    }

    /// Creates an invalid envelope error.
    pub fn invalid_envelope(message: impl Into<String>) -> Self {
        Self::InvalidEnvelope {
            message: message.into(),
        }
    }
}

/// Serialized failure returned to the caller.
///
/// The payload always decodes to a JSON object with an `error` field. When
/// the job was decoded, the object also carries every job field, including
/// any the operation set before it failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{payload}")]
pub struct DispatchFailure {
    payload: String,
}

impl DispatchFailure {
    pub(crate) fn new(payload: String) -> Self {
        Self { payload }
    }

    /// Serialized failure envelope.
    #[must_use]
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Consumes the failure, returning the serialized envelope.
    #[must_use]
    pub fn into_payload(self) -> String {
        self.payload
    }
}
