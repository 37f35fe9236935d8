//! Call dispatch between the sidebar and the job operations.
//!
//! The sidebar calls operations by name with a single payload: usually a
//! serialized job, sometimes a bare string such as a tab name. The
//! [`Dispatcher`] decodes the payload leniently, resolves the name through
//! the fixed [`Operation`] table, runs the handler, and serializes the job it
//! leaves behind. Failures come back as data, never as a panic or a bare
//! error string:
//!
//! ```json
//! {"entity":"Campaign","idsToLoad":[1001],"error":"API quota exceeded"}
//! ```
//!
//! ## Protocol
//!
//! The binary exposes the dispatcher over stdin and stdout, one JSON object
//! per line:
//!
//! ```json
//! {"operation":"writeLogs","payload":"{\"offset\":0,\"jobs\":[{\"logs\":[[\"INFO\",\"start\"]]}]}"}
//! ```
//!
//! and answers each line with exactly one response line:
//!
//! ```json
//! {"kind":"ok","payload":"{\"jobs\":[{\"logs\":[]}],\"offset\":1}"}
//! ```

mod dispatcher;
mod errors;
mod operation;
mod parse;
mod request;
mod response;
mod stdio;
mod transport_error;

pub use self::dispatcher::Dispatcher;
pub use self::errors::{DispatchError, DispatchFailure};
pub use self::operation::{JobHandler, Operation};
pub use self::parse::safe_parse;
pub use self::request::BridgeRequest;
pub use self::response::{BridgeResponse, ResponseWriter};
pub use self::stdio::StdioServer;
pub use self::transport_error::TransportError;

/// Tracing target for dispatch events, matched by filters such as
/// `sidebar_bridge=debug`.
pub(crate) const DISPATCH_TARGET: &str = module_path!();
