//! Job dispatch bridge between a spreadsheet sidebar and its server logic.
//!
//! The sidebar hands every call to the bridge as an operation name and a
//! single payload. The bridge decodes the payload into a [`Job`], runs the
//! named operation against its collaborators, and returns the decorated job
//! as text. Success and failure differ only in which side of the `Result`
//! the text arrives on; a failed job carries an `error` field plus whatever
//! the operation had already written.
//!
//! Around that core the bridge keeps three pieces of bookkeeping:
//!
//! - a session job counter, starting at 0 and advancing by one per
//!   `initializeJob` call, stored in the session property store;
//! - an append-only log sheet, written by `writeLogs` using the offset the
//!   sidebar sends back with each call;
//! - the id map, saved to and loaded from a dedicated store sheet.
//!
//! Entity-specific work (loading and pushing campaigns, ads and so on) is
//! delegated to [`Loader`] implementations registered per entity tag.
//!
//! [`Job`]: sidebar_types::Job
//! [`Loader`]: collaborators::Loader

pub mod a1;
pub mod assets;
mod bootstrap;
pub mod collaborators;
pub mod dispatch;
pub mod operations;
pub mod session;
mod telemetry;

pub use bootstrap::{
    BootstrapError, Bridge, ConfigLoader, StaticConfigLoader, SystemConfigLoader, bootstrap_with,
    build_services,
};
pub use dispatch::{DispatchFailure, Dispatcher, Operation, safe_parse};
pub use telemetry::{TelemetryError, TelemetryHandle};

#[cfg(test)]
mod tests;
