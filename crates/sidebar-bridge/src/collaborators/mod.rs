//! Collaborator contracts consumed by the job operations.
//!
//! The bridge never talks to the spreadsheet, the property service or the
//! marketing platform directly. Operations reach them through the traits in
//! this module so hosts (and tests) can supply their own implementations.
//! Reference implementations backed by memory or the local filesystem live in
//! the submodules.

mod id_store;
mod loaders;
mod properties;
mod workbook;

use std::sync::Arc;

use serde_json::Value;
use sidebar_types::IdMap;
use thiserror::Error;

use crate::a1::{A1Range, A1Span};

pub use self::id_store::SheetIdStore;
pub use self::loaders::{Loader, LoaderError, LoaderRegistry};
pub use self::properties::{FilePropertyStore, MemoryPropertyStore};
pub use self::workbook::MemoryWorkbook;

/// Rows of cell values in sheet order.
pub type Rows = Vec<Vec<Value>>;

/// Read/write access to the spreadsheet hosting the sidebar.
pub trait SheetStore {
    /// Clears `range` on `sheet`, or the whole sheet when `range` is `None`.
    ///
    /// Open-ended spans such as `A2:B` are passed through as given.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the sheet is missing or the host rejects
    /// the call.
    fn clear(&self, sheet: &str, range: Option<A1Span>) -> Result<(), StoreError>;

    /// Writes `rows` into `range` on `sheet`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if `rows` does not match the shape of `range`
    /// or the host rejects the call.
    fn set_values(&self, sheet: &str, range: A1Range, rows: &[Vec<Value>])
    -> Result<(), StoreError>;

    /// Reads every populated row of `sheet`. A missing sheet reads as empty.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the host rejects the call.
    fn get_values(&self, sheet: &str) -> Result<Rows, StoreError>;

    /// Brings the tab named `tab` to the front.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MissingSheet`] if no such tab exists.
    fn go_to_tab(&self, tab: &str) -> Result<(), StoreError>;
}

/// Per-user key/value properties that persist across calls.
pub trait PropertyStore {
    /// Reads the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing store cannot be read.
    fn get_property(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing store cannot be written.
    fn set_property(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Persistent mapping from logical keys to external identifiers.
pub trait IdStore {
    /// Replaces the in-memory map with `map`.
    fn initialize(&mut self, map: IdMap);

    /// Persists the in-memory map.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if serialization or the write fails.
    fn store(&mut self) -> Result<(), StoreError>;

    /// Replaces the in-memory map with the persisted one.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the persisted data cannot be read or decoded.
    fn load(&mut self) -> Result<(), StoreError>;

    /// Returns a copy of the in-memory map.
    fn data(&self) -> IdMap;
}

/// Errors raised by sheet, property and id-map stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The named sheet does not exist.
    #[error("sheet '{name}' does not exist")]
    MissingSheet {
        /// Requested sheet name.
        name: String,
    },

    /// The rows passed to a write do not fill the target range.
    #[error(
        "range {range} expects {expected_rows}x{expected_columns} values but got {rows} row(s) of width {columns}"
    )]
    ShapeMismatch {
        /// Target range in A1 notation.
        range: String,
        /// Rows covered by the range.
        expected_rows: u64,
        /// Columns covered by the range.
        expected_columns: u32,
        /// Rows supplied.
        rows: usize,
        /// Width of the first mismatching row.
        columns: usize,
    },

    /// Persisted data could not be decoded.
    #[error("corrupt data in {location}: {message}")]
    Corrupt {
        /// Where the data was read from.
        location: String,
        /// Decoder message.
        message: String,
    },

    /// Reading or writing a backing file failed.
    #[error("I/O error on '{path}': {source}")]
    Io {
        /// File involved.
        path: String,
        /// Underlying error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// A shared store was poisoned by a panic in another caller.
    #[error("internal error: {store} lock poisoned")]
    Poisoned {
        /// Store whose lock was poisoned.
        store: &'static str,
    },

    /// The host reported a failure; the message is passed through verbatim.
    #[error("{message}")]
    Backend {
        /// Host-provided message.
        message: String,
    },
}

impl StoreError {
    /// Creates a missing sheet error.
    pub fn missing_sheet(name: impl Into<String>) -> Self {
        Self::MissingSheet { name: name.into() }
    }

    /// Creates a corrupt data error.
    pub fn corrupt(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Corrupt {
            location: location.into(),
            message: message.into(),
        }
    }

    /// Creates an I/O error for `path`.
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source: Arc::new(source),
        }
    }

    /// Creates a lock poisoned error.
    pub fn poisoned(store: &'static str) -> Self {
        Self::Poisoned { store }
    }

    /// Creates a host failure carrying `message` verbatim.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}
