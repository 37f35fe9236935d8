//! JSONL request loop over a pair of byte streams.

use std::io::{self, BufRead, Read, Write};

use serde_json::Value;
use tracing::{debug, info, warn};

use super::DISPATCH_TARGET;
use super::dispatcher::Dispatcher;
use super::request::BridgeRequest;
use super::response::{BridgeResponse, ResponseWriter};
use super::transport_error::TransportError;
use crate::assets::HtmlAssets;

/// Maximum size of a single request line in bytes.
pub(crate) const MAX_REQUEST_BYTES: usize = 1024 * 1024;

/// Pseudo-operation that returns an HTML fragment instead of a job.
const INCLUDE_OPERATION: &str = "include";

/// Serves calls read line by line from an input stream.
///
/// Requests are answered strictly in order, one response line per request
/// line. Blank lines are skipped. The loop ends cleanly at end of input.
#[derive(Debug)]
pub struct StdioServer {
    dispatcher: Dispatcher,
    assets: Option<HtmlAssets>,
}

impl StdioServer {
    /// Creates a server over `dispatcher` without HTML assets.
    #[must_use]
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            assets: None,
        }
    }

    /// Serves `include` requests from `assets`.
    #[must_use]
    pub fn with_assets(mut self, assets: HtmlAssets) -> Self {
        self.assets = Some(assets);
        self
    }

    /// Dispatcher handling job calls.
    pub fn dispatcher_mut(&mut self) -> &mut Dispatcher {
        &mut self.dispatcher
    }

    /// Reads requests from `reader` until end of input, writing one
    /// response per request to `writer`. Returns the number of requests
    /// answered.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if reading or writing fails. Invalid
    /// requests are answered with an error line instead.
    pub fn serve<R: BufRead, W: Write>(
        &mut self,
        mut reader: R,
        writer: W,
    ) -> Result<usize, TransportError> {
        let mut writer = ResponseWriter::new(writer);
        let mut answered = 0;

        loop {
            let line = match read_request_line(&mut reader) {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(error) if error.is_recoverable() => {
                    warn!(target: DISPATCH_TARGET, %error, "rejected request");
                    writer.write_response(&BridgeResponse::error_message(error.to_string()))?;
                    answered += 1;
                    continue;
                }
                Err(error) => return Err(error),
            };
            if line.trim_ascii().is_empty() {
                continue;
            }

            let response = match BridgeRequest::parse(&line) {
                Ok(request) => self.answer(request),
                Err(error) => {
                    warn!(target: DISPATCH_TARGET, %error, "malformed request");
                    BridgeResponse::error_message(error.to_string())
                }
            };
            writer.write_response(&response)?;
            answered += 1;
        }

        info!(target: DISPATCH_TARGET, answered, "input closed");
        Ok(answered)
    }

    fn answer(&mut self, request: BridgeRequest) -> BridgeResponse {
        let operation = request.operation().to_owned();
        debug!(target: DISPATCH_TARGET, operation = %operation, "received request");

        if operation == INCLUDE_OPERATION {
            return self.include(&request.payload);
        }

        let result = match request.payload {
            Value::String(raw) => self.dispatcher.invoke(&operation, &raw),
            decoded => self.dispatcher.invoke_value(&operation, decoded),
        };
        match result {
            Ok(payload) => BridgeResponse::Ok(payload),
            Err(failure) => BridgeResponse::Error(failure.into_payload()),
        }
    }

    fn include(&self, payload: &Value) -> BridgeResponse {
        let Some(assets) = &self.assets else {
            return BridgeResponse::error_message("no asset directory configured");
        };
        let Some(filename) = payload.as_str() else {
            return BridgeResponse::error_message("include expects a file name");
        };
        match assets.include(filename) {
            Ok(content) => BridgeResponse::Ok(content),
            Err(error) => {
                warn!(target: DISPATCH_TARGET, %error, "include failed");
                BridgeResponse::error_message(error.to_string())
            }
        }
    }
}

/// Reads one newline-terminated line of at most [`MAX_REQUEST_BYTES`].
///
/// Returns `Ok(None)` at end of input. An oversized line is consumed up to
/// its newline so the next request starts cleanly.
fn read_request_line<R: BufRead>(reader: &mut R) -> Result<Option<Vec<u8>>, TransportError> {
    let mut buffer = Vec::new();
    let limit = u64::try_from(MAX_REQUEST_BYTES + 1).unwrap_or(u64::MAX);
    let read = read_with_retry(&mut reader.by_ref().take(limit), &mut buffer)?;
    if read == 0 {
        return Ok(None);
    }
    if buffer.len() > MAX_REQUEST_BYTES && buffer.last() != Some(&b'\n') {
        let skipped = skip_line(reader)?;
        return Err(TransportError::request_too_large(
            buffer.len() + skipped,
            MAX_REQUEST_BYTES,
        ));
    }
    Ok(Some(buffer))
}

/// Reads up to the next newline, retrying on interrupts.
fn read_with_retry<R: BufRead>(reader: &mut R, buffer: &mut Vec<u8>) -> io::Result<usize> {
    loop {
        match reader.read_until(b'\n', buffer) {
            Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
            result => return result,
        }
    }
}

/// Discards input up to and including the next newline.
fn skip_line<R: BufRead>(reader: &mut R) -> io::Result<usize> {
    let mut skipped = 0;
    loop {
        let available = match reader.fill_buf() {
            Ok(available) => available,
            Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
            Err(error) => return Err(error),
        };
        if available.is_empty() {
            return Ok(skipped);
        }
        match available.iter().position(|byte| *byte == b'\n') {
            Some(newline) => {
                reader.consume(newline + 1);
                return Ok(skipped + newline + 1);
            }
            None => {
                let length = available.len();
                reader.consume(length);
                skipped += length;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use serde_json::json;

    use super::*;
    use crate::tests::support::memory_services;

    fn server() -> StdioServer {
        let (services, _workbook, _properties) = memory_services();
        StdioServer::new(Dispatcher::new(services))
    }

    fn run(server: &mut StdioServer, input: &str) -> Vec<Value> {
        let mut output = Vec::new();
        server
            .serve(Cursor::new(input.as_bytes().to_vec()), &mut output)
            .expect("serve");
        String::from_utf8(output)
            .expect("utf8")
            .lines()
            .map(|line| serde_json::from_str(line).expect("response line is JSON"))
            .collect()
    }

    #[test]
    fn answers_each_request_in_order() {
        let mut server = server();
        let responses = run(
            &mut server,
            concat!(
                r#"{"operation":"initializeJob","payload":"{}"}"#,
                "\n\n",
                r#"{"operation":"initializeJob","payload":{"entity":"Ad"}}"#,
                "\n",
                r#"{"operation":"runScript","payload":"x"}"#,
                "\n",
            ),
        );

        assert_eq!(responses, vec![
            json!({"kind": "ok", "payload": r#"{"jobId":0}"#}),
            json!({"kind": "ok", "payload": r#"{"entity":"Ad","jobId":1}"#}),
            json!({"kind": "error", "payload": r#"{"error":"unknown operation: runScript"}"#}),
        ]);
    }

    #[test]
    fn malformed_lines_do_not_stop_the_loop() {
        let mut server = server();
        let responses = run(
            &mut server,
            "not json\n{\"operation\":\"goToTab\",\"payload\":\"Log\"}",
        );

        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["kind"], json!("error"));
        assert_eq!(responses[1], json!({"kind": "ok", "payload": "null"}));
    }

    #[test]
    fn oversized_lines_are_rejected_and_skipped() {
        let mut server = server();
        let mut input = format!(
            "{{\"operation\":\"goToTab\",\"payload\":\"{}\"}}\n",
            "x".repeat(MAX_REQUEST_BYTES)
        );
        input.push_str("{\"operation\":\"goToTab\",\"payload\":\"Store\"}\n");

        let responses = run(&mut server, &input);
        assert_eq!(responses.len(), 2);
        let rejection: Value = serde_json::from_str(
            responses[0]["payload"].as_str().expect("string payload"),
        )
        .expect("envelope");
        assert!(
            rejection["error"]
                .as_str()
                .is_some_and(|message| message.starts_with("request too large"))
        );
        assert_eq!(responses[1], json!({"kind": "ok", "payload": "null"}));
    }

    #[test]
    fn include_needs_an_asset_directory() {
        let mut server = server();
        let responses = run(&mut server, "{\"operation\":\"include\",\"payload\":\"Sidebar\"}\n");
        assert_eq!(responses, vec![json!({
            "kind": "error",
            "payload": r#"{"error":"no asset directory configured"}"#,
        })]);
    }

    #[test]
    fn include_serves_fragments() {
        let temp = tempfile::TempDir::new().expect("temp dir");
        std::fs::write(temp.path().join("Sidebar.html"), "<p>hi</p>").expect("write");
        let root = camino::Utf8Path::from_path(temp.path()).expect("utf8 temp path");
        let mut server = server().with_assets(HtmlAssets::open(root).expect("open assets"));

        let responses = run(&mut server, "{\"operation\":\"include\",\"payload\":\"Sidebar\"}\n");
        assert_eq!(responses, vec![json!({"kind": "ok", "payload": "<p>hi</p>"})]);
    }
}
