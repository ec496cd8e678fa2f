//! Everything that touches the xlsx workbook: the reference lookup lists,
//! the timesheet rows, and the optional workday sheet. Sheet names and column
//! order are fixed contracts shared with the spreadsheet users edit by hand.

pub mod reference;
pub mod timesheet;
pub mod workday;

use std::path::{Path, PathBuf};

use thiserror::Error;
use umya_spreadsheet::{Spreadsheet, Worksheet};

/// Sheet holding the project and work type lookup columns.
pub const REFERENCE_SHEET: &str = "Справочник";
/// Sheet that finished stopwatch runs are appended to.
pub const TIMESHEET_SHEET: &str = "Учет времени";
/// Optional sheet tracking day start and end marks.
pub const WORKDAY_SHEET: &str = "Рабочий день";

#[derive(Debug, Error)]
pub enum WorkbookError {
    #[error("Excel file not found: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("workbook must contain sheet '{sheet}'. Found: {}", present.join(", "))]
    MissingSheet { sheet: String, present: Vec<String> },
    #[error("sheet '{REFERENCE_SHEET}' must fill both the project and the work type columns")]
    EmptyReference,
    #[error("no day start recorded for {0} yet")]
    DayNotStarted(chrono::NaiveDate),
    #[error("failed to read workbook: {0}")]
    Read(String),
    #[error("failed to save workbook: {0}")]
    Write(String),
}

/// Whether an optional sheet is part of the workbook. Explicit check instead
/// of probing the sheet and recovering from the lookup failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetPresence {
    Present,
    Absent,
}

pub fn sheet_presence(book: &Spreadsheet, name: &str) -> SheetPresence {
    if book.get_sheet_by_name(name).is_some() {
        SheetPresence::Present
    } else {
        SheetPresence::Absent
    }
}

pub fn sheet_names(book: &Spreadsheet) -> Vec<String> {
    book.get_sheet_collection()
        .iter()
        .map(|sheet| sheet.get_name().to_string())
        .collect()
}

pub(crate) fn open_workbook(path: &Path) -> Result<Spreadsheet, WorkbookError> {
    if !path.exists() {
        return Err(WorkbookError::FileNotFound(path.to_owned()));
    }
    umya_spreadsheet::reader::xlsx::read(path).map_err(|e| WorkbookError::Read(format!("{e:?}")))
}

/// Overwrites the workbook in place. No atomic replace, a crash mid-save can
/// corrupt the file.
pub(crate) fn save_workbook(book: &Spreadsheet, path: &Path) -> Result<(), WorkbookError> {
    umya_spreadsheet::writer::xlsx::write(book, path)
        .map_err(|e| WorkbookError::Write(format!("{e:?}")))
}

pub(crate) fn require_sheet<'a>(
    book: &'a Spreadsheet,
    name: &str,
) -> Result<&'a Worksheet, WorkbookError> {
    let present = sheet_names(book);
    book.get_sheet_by_name(name)
        .ok_or(WorkbookError::MissingSheet {
            sheet: name.to_string(),
            present,
        })
}

pub(crate) fn require_sheet_mut<'a>(
    book: &'a mut Spreadsheet,
    name: &str,
) -> Result<&'a mut Worksheet, WorkbookError> {
    let present = sheet_names(book);
    book.get_sheet_by_name_mut(name)
        .ok_or(WorkbookError::MissingSheet {
            sheet: name.to_string(),
            present,
        })
}

/// First row at or after row 2 whose tracked columns are all blank, or one
/// past the highest used row when there is none. Reusing cleared rows keeps
/// the table gapless and avoids inheriting stray formatting from rows below
/// the data region.
pub(crate) fn first_blank_row(sheet: &Worksheet, tracked_columns: u32) -> u32 {
    // Row 1 is reserved for headers.
    let highest = sheet.get_highest_row().max(1);
    for row in 2..=highest {
        if (1..=tracked_columns).all(|col| sheet.get_value((col, row)).trim().is_empty()) {
            return row;
        }
    }
    highest + 1
}
