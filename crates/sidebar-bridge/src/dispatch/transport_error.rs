//! Errors raised by the stdio transport.

use std::io;

use thiserror::Error;

/// Failures reading requests or writing responses.
///
/// Malformed and oversized requests are answered with an `error` line and the
/// loop carries on; only I/O and serialization failures end it.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Request line is not a valid request.
    #[error("invalid request: {message}")]
    MalformedRequest {
        /// Why the line was rejected.
        message: String,
    },

    /// Request line exceeds the size limit.
    #[error("request too large: {size} bytes exceeds {max_size} byte limit")]
    RequestTooLarge {
        /// Bytes read before giving up.
        size: usize,
        /// Configured limit.
        max_size: usize,
    },

    /// Reading or writing the stream failed.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Response serialization failed.
    #[error("failed to serialize response: {0}")]
    SerializeResponse(#[from] serde_json::Error),
}

impl TransportError {
    /// Creates a malformed request error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedRequest {
            message: message.into(),
        }
    }

    /// Creates a request too large error.
    pub fn request_too_large(size: usize, max_size: usize) -> Self {
        Self::RequestTooLarge { size, max_size }
    }

    /// Returns `true` for errors that only affect the current request.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::MalformedRequest { .. } | Self::RequestTooLarge { .. }
        )
    }
}
