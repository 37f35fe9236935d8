//! Response lines written by the stdio transport.

use std::io::Write;

use serde::Serialize;

use super::transport_error::TransportError;

/// Outcome of one call, encoded as a single JSON line.
///
/// ```json
/// {"kind":"ok","payload":"{\"offset\":2}"}
/// {"kind":"error","payload":"{\"error\":\"unknown operation: run\"}"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum BridgeResponse {
    /// The call succeeded; the payload is the serialized result.
    Ok(String),
    /// The call failed; the payload is a serialized envelope with `error`.
    Error(String),
}

impl BridgeResponse {
    /// Failure response carrying only `message` in its envelope.
    pub fn error_message(message: impl Into<String>) -> Self {
        let envelope = serde_json::json!({ "error": message.into() });
        Self::Error(envelope.to_string())
    }
}

/// Writer that frames responses as JSONL.
pub struct ResponseWriter<W> {
    writer: W,
}

impl<W: Write> ResponseWriter<W> {
    /// Wraps `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Writes `response` as one line and flushes, so the host sees each
    /// answer as soon as it is ready.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if serialization or writing fails.
    pub fn write_response(&mut self, response: &BridgeResponse) -> Result<(), TransportError> {
        serde_json::to_writer(&mut self.writer, response)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}
