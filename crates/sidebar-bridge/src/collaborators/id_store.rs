//! Id-map store persisted in a sheet.

use serde_json::Value;
use sidebar_types::IdMap;

use super::{IdStore, SheetStore, StoreError};
use crate::a1::A1Range;

/// Id store that keeps the serialized map in column A of a sheet.
///
/// Hosted spreadsheets cap the size of a single cell, so the JSON text is
/// split into consecutive cells of at most `chunk_size` characters and
/// reassembled on load.
#[derive(Debug)]
pub struct SheetIdStore<S> {
    sheets: S,
    sheet: String,
    chunk_size: usize,
    data: IdMap,
}

impl<S: SheetStore> SheetIdStore<S> {
    /// Creates a store writing to `sheet` through `sheets`.
    pub fn new(sheets: S, sheet: impl Into<String>, chunk_size: usize) -> Self {
        Self {
            sheets,
            sheet: sheet.into(),
            chunk_size: chunk_size.max(1),
            data: IdMap::new(),
        }
    }
}

impl<S: SheetStore> IdStore for SheetIdStore<S> {
    fn initialize(&mut self, map: IdMap) {
        self.data = map;
    }

    fn store(&mut self) -> Result<(), StoreError> {
        let encoded = serde_json::to_string(&self.data)
            .map_err(|error| StoreError::corrupt(self.sheet.as_str(), error.to_string()))?;
        let rows: Vec<Vec<Value>> = split_chars(&encoded, self.chunk_size)
            .into_iter()
            .map(|chunk| vec![Value::String(chunk)])
            .collect();

        match self.sheets.clear(&self.sheet, None) {
            Ok(()) | Err(StoreError::MissingSheet { .. }) => {}
            Err(error) => return Err(error),
        }

        let count = u64::try_from(rows.len()).unwrap_or(u64::MAX);
        let Some(range) = A1Range::row_span(1, 1, 1, count) else {
            return Ok(());
        };
        self.sheets.set_values(&self.sheet, range, &rows)
    }

    fn load(&mut self) -> Result<(), StoreError> {
        let encoded: String = self
            .sheets
            .get_values(&self.sheet)?
            .iter()
            .filter_map(|row| row.first().and_then(Value::as_str))
            .collect();

        self.data = if encoded.trim().is_empty() {
            IdMap::new()
        } else {
            serde_json::from_str(&encoded)
                .map_err(|error| StoreError::corrupt(self.sheet.as_str(), error.to_string()))?
        };
        Ok(())
    }

    fn data(&self) -> IdMap {
        self.data.clone()
    }
}

/// Splits `text` into pieces of at most `size` characters.
fn split_chars(text: &str, size: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    for (index, character) in text.chars().enumerate() {
        if index > 0 && index % size == 0 {
            chunks.push(std::mem::take(&mut current));
        }
        current.push(character);
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
