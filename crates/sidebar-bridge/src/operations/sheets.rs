//! Sheet housekeeping operations.

use sidebar_types::Job;

use super::{OperationError, Services};
use crate::a1::A1Span;

/// Clears `job.range` on `job.sheetName`, or the whole sheet without a range.
///
/// The range may be closed (`A2:C9`) or open-ended (`A2:B`, `A:B`, `2:5`).
///
/// # Errors
///
/// Returns [`OperationError::MissingField`] without a sheet name,
/// [`OperationError::InvalidArgument`] for a range that is not A1 notation,
/// and store failures verbatim.
pub fn clear(services: &mut Services, job: &mut Job) -> Result<(), OperationError> {
    let sheet = job
        .sheet_name
        .as_deref()
        .ok_or_else(|| OperationError::missing_field("sheetName"))?;
    let range = job
        .range
        .as_deref()
        .map(str::parse::<A1Span>)
        .transpose()
        .map_err(|error| OperationError::invalid_argument("range", error.to_string()))?;
    services.sheets.clear(sheet, range)?;
    Ok(())
}

/// Brings `tab` to the front of the spreadsheet.
///
/// # Errors
///
/// Returns store failures verbatim, including a missing tab.
pub fn go_to_tab(services: &mut Services, tab: &str) -> Result<(), OperationError> {
    services.sheets.go_to_tab(tab)?;
    Ok(())
}
