//! Request lines read by the stdio transport.

use serde::Deserialize;
use serde_json::Value;

use super::transport_error::TransportError;

/// One call from the host, encoded as a single JSON line.
///
/// ```json
/// {"operation":"writeLogs","payload":"{\"offset\":0,\"jobs\":[]}"}
/// ```
///
/// A string `payload` is raw sidebar text and goes through safe parsing;
/// any other JSON value is taken as already decoded. A missing payload is
/// `null`.
#[derive(Debug, Deserialize)]
pub struct BridgeRequest {
    /// Operation name, as the sidebar calls it.
    pub operation: String,
    /// Raw or pre-decoded input.
    #[serde(default)]
    pub payload: Value,
}

impl BridgeRequest {
    /// Parses a request line. Trailing whitespace, including the newline
    /// delimiter, is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::MalformedRequest`] when the line is empty or
    /// does not match the request schema.
    pub fn parse(line: &[u8]) -> Result<Self, TransportError> {
        let trimmed = line.trim_ascii_end();
        if trimmed.is_empty() {
            return Err(TransportError::malformed("empty request line"));
        }
        let request: Self = serde_json::from_slice(trimmed)
            .map_err(|error| TransportError::malformed(error.to_string()))?;
        if request.operation.trim().is_empty() {
            return Err(TransportError::malformed("operation field is empty"));
        }
        Ok(request)
    }

    /// Operation name without surrounding whitespace.
    #[must_use]
    pub fn operation(&self) -> &str {
        self.operation.trim()
    }
}
