//! Appending sub-job logs to the log sheet.

use serde_json::Value;
use sidebar_types::Job;
use tracing::debug;

use super::{OperationError, Services};
use crate::a1::A1Range;
use crate::collaborators::StoreError;
use crate::dispatch::DISPATCH_TARGET;

/// Moves every pending log row from `job.jobs` onto the log sheet.
///
/// Rows are written in sub-job order to columns `A:B`, starting on the row
/// after `job.offset`, and `job.offset` advances by the number of rows
/// written. An offset of zero starts a fresh log, so the sheet is cleared
/// first. Once the rows are on the sheet every sub-job's `logs` is left
/// empty, which makes a second call with the returned job a no-op. When
/// there is nothing to write the sheet is not touched at all.
///
/// On failure the sub-job logs are left in place, so the failure envelope
/// still carries every row that was not written.
///
/// # Errors
///
/// Returns [`OperationError::OffsetOverflow`] if the rows would land past the
/// last addressable row, and store failures verbatim.
pub fn write_logs(services: &mut Services, job: &mut Job) -> Result<(), OperationError> {
    let offset = job.offset.unwrap_or(0);
    let values: Vec<Vec<Value>> = job
        .jobs
        .iter()
        .flatten()
        .flat_map(|sub_job| sub_job.logs.iter().flatten())
        .map(|row| Vec::from(row.clone().into_cells()))
        .collect();

    if values.is_empty() {
        drain_sub_job_logs(job);
        job.offset = Some(offset);
        return Ok(());
    }

    let overflow = || OperationError::OffsetOverflow {
        offset,
        rows: values.len(),
    };
    let count = u64::try_from(values.len()).map_err(|_| overflow())?;
    let first_row = offset.checked_add(1).ok_or_else(overflow)?;
    let range = A1Range::two_column_rows(first_row, count).ok_or_else(overflow)?;
    let next_offset = offset.checked_add(count).ok_or_else(overflow)?;

    if offset == 0 {
        match services.sheets.clear(&services.log_sheet, None) {
            Ok(()) | Err(StoreError::MissingSheet { .. }) => {}
            Err(error) => return Err(error.into()),
        }
    }

    services
        .sheets
        .set_values(&services.log_sheet, range, &values)?;

    debug!(
        target: DISPATCH_TARGET,
        sheet = %services.log_sheet,
        %range,
        rows = count,
        "appended log rows"
    );
    drain_sub_job_logs(job);
    job.offset = Some(next_offset);
    Ok(())
}

/// Leaves every sub-job with an empty log list.
fn drain_sub_job_logs(job: &mut Job) {
    for sub_job in job.jobs.iter_mut().flatten() {
        sub_job.drain_logs();
    }
}
