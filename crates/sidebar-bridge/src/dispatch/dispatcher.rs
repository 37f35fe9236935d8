//! The call boundary between the sidebar and the operations.

use serde::Deserialize as _;
use serde_json::{Map, Value};
use sidebar_types::Job;
use tracing::{debug, warn};

use super::DISPATCH_TARGET;
use super::errors::{DispatchError, DispatchFailure};
use super::operation::Operation;
use super::parse::safe_parse;
use crate::operations::{self, Services};

/// Serialized result of [`Operation::GoToTab`], which returns nothing.
const EMPTY_RESULT: &str = "null";

/// Routes named calls to operations and serializes their outcome.
///
/// Every call yields text: the serialized job on success, or a
/// [`DispatchFailure`] carrying the serialized job plus an `error` field.
/// Calls are handled one at a time and never retried.
#[derive(Debug)]
pub struct Dispatcher {
    services: Services,
}

impl Dispatcher {
    /// Creates a dispatcher over `services`.
    #[must_use]
    pub fn new(services: Services) -> Self {
        Self { services }
    }

    /// Shared collaborators.
    #[must_use]
    pub fn services(&self) -> &Services {
        &self.services
    }

    /// Mutable collaborators, for registering loaders after bootstrap.
    pub fn services_mut(&mut self) -> &mut Services {
        &mut self.services
    }

    /// Invokes `operation` with raw text from the sidebar.
    ///
    /// The text is decoded with [`safe_parse`], so a bare tab name is as
    /// valid an input as a serialized job.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchFailure`] when the operation is unknown, the payload
    /// is not a job, or the operation fails.
    pub fn invoke(&mut self, operation: &str, raw: &str) -> Result<String, DispatchFailure> {
        self.invoke_value(operation, safe_parse(raw))
    }

    /// Invokes `operation` with an already decoded payload.
    ///
    /// # Errors
    ///
    /// As for [`Dispatcher::invoke`].
    pub fn invoke_value(
        &mut self,
        operation: &str,
        payload: Value,
    ) -> Result<String, DispatchFailure> {
        let resolved = match Operation::parse(operation) {
            Ok(resolved) => resolved,
            Err(error) => return Err(reject(operation, envelope_fields(payload), &error)),
        };
        debug!(target: DISPATCH_TARGET, operation = resolved.as_str(), "dispatching call");

        let Some(handler) = resolved.job_handler() else {
            return self.go_to_tab(payload);
        };

        let mut job = match decode_job(&payload) {
            Ok(job) => job,
            Err(error) => return Err(reject(operation, envelope_fields(payload), &error)),
        };

        match handler(&mut self.services, &mut job) {
            Ok(()) => serde_json::to_string(&job).map_err(|error| {
                reject(operation, Map::new(), &DispatchError::from(error))
            }),
            Err(error) => {
                let error = DispatchError::from(error);
                job.error = Some(error.to_string());
                let fields = match serde_json::to_value(&job) {
                    Ok(Value::Object(fields)) => fields,
                    _ => Map::new(),
                };
                Err(reject(operation, fields, &error))
            }
        }
    }

    fn go_to_tab(&mut self, payload: Value) -> Result<String, DispatchFailure> {
        let operation = Operation::GoToTab.as_str();
        let result = tab_name(&payload).and_then(|tab| {
            operations::go_to_tab(&mut self.services, &tab).map_err(DispatchError::from)
        });
        match result {
            Ok(()) => Ok(EMPTY_RESULT.to_owned()),
            Err(error) => Err(reject(operation, envelope_fields(payload), &error)),
        }
    }
}

/// Decodes a job envelope. A `null` payload is an empty job.
fn decode_job(payload: &Value) -> Result<Job, DispatchError> {
    if payload.is_null() {
        return Ok(Job::new());
    }
    Job::deserialize(payload).map_err(|error| DispatchError::invalid_envelope(error.to_string()))
}

/// Reads the tab name for `goToTab`. Scalars other than strings use their
/// JSON text, the way the sidebar would have stringified them.
fn tab_name(payload: &Value) -> Result<String, DispatchError> {
    match payload {
        Value::String(name) => Ok(name.clone()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => Err(
            DispatchError::invalid_envelope("goToTab expects a tab name"),
        ),
    }
}

/// Fields kept in a failure envelope when no job could be decoded.
fn envelope_fields(payload: Value) -> Map<String, Value> {
    match payload {
        Value::Object(fields) => fields,
        _ => Map::new(),
    }
}

/// Logs `error` and renders the failure envelope.
fn reject(operation: &str, mut fields: Map<String, Value>, error: &DispatchError) -> DispatchFailure {
    warn!(target: DISPATCH_TARGET, operation, %error, "operation failed");
    fields.insert("error".to_owned(), Value::String(error.to_string()));
    DispatchFailure::new(Value::Object(fields).to_string())
}
