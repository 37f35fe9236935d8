//! In-memory spreadsheet used by the binary and the behaviour tests.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;

use super::{Rows, SheetStore, StoreError};
use crate::a1::{A1Range, A1Span, CellRef};

/// Sparse cells of one sheet keyed by `(row, column)`.
type Cells = BTreeMap<(u64, u32), Value>;

#[derive(Debug, Default)]
struct WorkbookState {
    sheets: BTreeMap<String, Cells>,
    active_tab: Option<String>,
}

/// Shareable in-memory workbook.
///
/// Clones share the same sheets, so one workbook can back both the sheet
/// store and the id store. Writes create missing sheets; clearing or
/// navigating to a missing sheet fails the way the hosted spreadsheet does.
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkbook {
    state: Arc<Mutex<WorkbookState>>,
}

impl MemoryWorkbook {
    /// Creates a workbook without sheets.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a workbook holding empty sheets named `names`.
    pub fn with_sheets<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let sheets = names
            .into_iter()
            .map(|name| (name.into(), Cells::new()))
            .collect();
        Self {
            state: Arc::new(Mutex::new(WorkbookState {
                sheets,
                active_tab: None,
            })),
        }
    }

    /// Adds an empty sheet unless one with the same name exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Poisoned`] if the workbook lock is poisoned.
    pub fn add_sheet(&self, name: &str) -> Result<(), StoreError> {
        self.lock()?.sheets.entry(name.to_owned()).or_default();
        Ok(())
    }

    /// Name of the tab last brought to the front.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Poisoned`] if the workbook lock is poisoned.
    pub fn active_tab(&self) -> Result<Option<String>, StoreError> {
        Ok(self.lock()?.active_tab.clone())
    }

    /// Names of all sheets in alphabetical order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Poisoned`] if the workbook lock is poisoned.
    pub fn sheet_names(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.lock()?.sheets.keys().cloned().collect())
    }

    fn lock(&self) -> Result<MutexGuard<'_, WorkbookState>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::poisoned("workbook"))
    }
}

impl SheetStore for MemoryWorkbook {
    fn clear(&self, sheet: &str, range: Option<A1Span>) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        let cells = state
            .sheets
            .get_mut(sheet)
            .ok_or_else(|| StoreError::missing_sheet(sheet))?;
        match range {
            None => cells.clear(),
            Some(range) => cells.retain(|&(row, column), _| {
                CellRef::new(column, row).is_none_or(|cell| !range.contains(cell))
            }),
        }
        Ok(())
    }

    fn set_values(
        &self,
        sheet: &str,
        range: A1Range,
        rows: &[Vec<Value>],
    ) -> Result<(), StoreError> {
        check_shape(range, rows)?;

        let mut state = self.lock()?;
        let cells = state.sheets.entry(sheet.to_owned()).or_default();
        let start = range.start();
        for (row, values) in (start.row()..).zip(rows) {
            for (column, value) in (start.column()..).zip(values) {
                if value.is_null() {
                    cells.remove(&(row, column));
                } else {
                    cells.insert((row, column), value.clone());
                }
            }
        }
        Ok(())
    }

    fn get_values(&self, sheet: &str) -> Result<Rows, StoreError> {
        let state = self.lock()?;
        let Some(cells) = state.sheets.get(sheet) else {
            return Ok(Rows::new());
        };
        Ok(populated_rows(cells))
    }

    fn go_to_tab(&self, tab: &str) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        if !state.sheets.contains_key(tab) {
            return Err(StoreError::missing_sheet(tab));
        }
        state.active_tab = Some(tab.to_owned());
        Ok(())
    }
}

fn check_shape(range: A1Range, rows: &[Vec<Value>]) -> Result<(), StoreError> {
    let width = usize::try_from(range.width()).unwrap_or(usize::MAX);
    let height_matches = u64::try_from(rows.len()).is_ok_and(|len| len == range.height());
    let mismatched_row = rows.iter().find(|row| row.len() != width);

    if height_matches && mismatched_row.is_none() {
        return Ok(());
    }
    Err(StoreError::ShapeMismatch {
        range: range.to_string(),
        expected_rows: range.height(),
        expected_columns: range.width(),
        rows: rows.len(),
        columns: mismatched_row.or(rows.first()).map_or(0, Vec::len),
    })
}

/// Builds the rectangular data region `A1:<last column><last row>`, filling
/// gaps with `null`.
fn populated_rows(cells: &Cells) -> Rows {
    let last_row = cells.keys().map(|&(row, _)| row).max().unwrap_or(0);
    let last_column = cells.keys().map(|&(_, column)| column).max().unwrap_or(0);
    (1..=last_row)
        .map(|row| {
            (1..=last_column)
                .map(|column| cells.get(&(row, column)).cloned().unwrap_or(Value::Null))
                .collect()
        })
        .collect()
}
