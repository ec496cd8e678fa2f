use std::{path::Path, time::Duration};

use chrono::{DateTime, Local};
use tracing::info;

use crate::utils::time::{excel_date_serial, excel_day_fraction};

use super::{first_blank_row, open_workbook, require_sheet_mut, save_workbook, WorkbookError, TIMESHEET_SHEET};

/// Display format for the date column.
pub const DATE_FORMAT: &str = "dd.mm.yyyy";
/// Display format for the duration column. `[h]` keeps hours unbounded
/// instead of wrapping at 24.
pub const DURATION_FORMAT: &str = "[h]:mm:ss";

/// Date, project, work type, duration.
const TRACKED_COLUMNS: u32 = 4;

/// Books a finished stopwatch run as a row on the timesheet sheet and saves
/// the workbook in place. Fractional seconds are truncated. Any I/O error
/// propagates as-is, there is no retry here.
pub fn append_time_entry(
    path: &Path,
    project: &str,
    work_type: &str,
    elapsed: Duration,
    finished_at: DateTime<Local>,
) -> Result<(), WorkbookError> {
    let mut book = open_workbook(path)?;
    let sheet = require_sheet_mut(&mut book, TIMESHEET_SHEET)?;

    let row = first_blank_row(sheet, TRACKED_COLUMNS);

    let date_cell = sheet.get_cell_mut((1u32, row));
    date_cell.set_value_number(excel_date_serial(finished_at.date_naive()));
    date_cell
        .get_style_mut()
        .get_number_format_mut()
        .set_format_code(DATE_FORMAT);

    sheet.get_cell_mut((2u32, row)).set_value(project);
    sheet.get_cell_mut((3u32, row)).set_value(work_type);

    let duration_cell = sheet.get_cell_mut((4u32, row));
    duration_cell.set_value_number(excel_day_fraction(elapsed.as_secs()));
    duration_cell
        .get_style_mut()
        .get_number_format_mut()
        .set_format_code(DURATION_FORMAT);

    save_workbook(&book, path)?;
    info!("Booked {elapsed:?} of '{work_type}' on '{project}' into row {row} of {path:?}");
    Ok(())
}
