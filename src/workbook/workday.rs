use std::path::Path;

use chrono::{DateTime, Local, Timelike};
use tracing::info;

use crate::utils::time::{excel_date_serial, excel_day_fraction};

use super::{
    first_blank_row, open_workbook, require_sheet_mut, save_workbook, sheet_presence,
    timesheet::{DATE_FORMAT, DURATION_FORMAT},
    SheetPresence, WorkbookError, WORKDAY_SHEET,
};

/// Display format for the start and end time-of-day cells.
const TIME_FORMAT: &str = "hh:mm:ss";

/// Date, day start, day end, total.
const TRACKED_COLUMNS: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayEvent {
    Start,
    End,
}

/// Outcome of a day mark. The workday sheet is optional, so its absence is
/// reported back to the caller rather than treated as a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayMark {
    Recorded { row: u32 },
    SheetAbsent,
}

/// Marks the start or the end of the working day on today's row of the
/// workday sheet. `Start` reuses today's row when one exists, otherwise it
/// takes the first blank row. `End` requires a prior `Start` on the same
/// date and also fills the start-to-end total.
pub fn mark_day(path: &Path, event: DayEvent, at: DateTime<Local>) -> Result<DayMark, WorkbookError> {
    let mut book = open_workbook(path)?;
    if sheet_presence(&book, WORKDAY_SHEET) == SheetPresence::Absent {
        return Ok(DayMark::SheetAbsent);
    }
    let sheet = require_sheet_mut(&mut book, WORKDAY_SHEET)?;

    let date_serial = excel_date_serial(at.date_naive());
    let time_fraction = excel_day_fraction(at.num_seconds_from_midnight() as u64);
    let today_row = row_for_date(sheet, date_serial);

    let row = match event {
        DayEvent::Start => {
            let row = today_row.unwrap_or_else(|| first_blank_row(sheet, TRACKED_COLUMNS));
            let date_cell = sheet.get_cell_mut((1u32, row));
            date_cell.set_value_number(date_serial);
            date_cell
                .get_style_mut()
                .get_number_format_mut()
                .set_format_code(DATE_FORMAT);
            let start_cell = sheet.get_cell_mut((2u32, row));
            start_cell.set_value_number(time_fraction);
            start_cell
                .get_style_mut()
                .get_number_format_mut()
                .set_format_code(TIME_FORMAT);
            row
        }
        DayEvent::End => {
            let Some(row) = today_row else {
                return Err(WorkbookError::DayNotStarted(at.date_naive()));
            };
            let start: f64 = sheet
                .get_value((2u32, row))
                .trim()
                .parse()
                .map_err(|_| WorkbookError::DayNotStarted(at.date_naive()))?;
            let end_cell = sheet.get_cell_mut((3u32, row));
            end_cell.set_value_number(time_fraction);
            end_cell
                .get_style_mut()
                .get_number_format_mut()
                .set_format_code(TIME_FORMAT);
            let total_cell = sheet.get_cell_mut((4u32, row));
            total_cell.set_value_number((time_fraction - start).max(0.0));
            total_cell
                .get_style_mut()
                .get_number_format_mut()
                .set_format_code(DURATION_FORMAT);
            row
        }
    };

    save_workbook(&book, path)?;
    info!("Marked day {event:?} at {at} in row {row} of {path:?}");
    Ok(DayMark::Recorded { row })
}

fn row_for_date(sheet: &umya_spreadsheet::Worksheet, date_serial: f64) -> Option<u32> {
    (2..=sheet.get_highest_row()).find(|&row| {
        sheet
            .get_value((1u32, row))
            .trim()
            .parse::<f64>()
            .map(|v| v == date_serial)
            .unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use anyhow::Result;
    use chrono::{DateTime, Local, TimeZone};
    use tempfile::tempdir;

    use crate::workbook::{WorkbookError, WORKDAY_SHEET};

    use super::{mark_day, DayEvent, DayMark};

    fn write_fixture(dir: &Path, with_workday_sheet: bool) -> Result<PathBuf> {
        let mut book = umya_spreadsheet::new_file();
        let sheet = book.get_sheet_by_name_mut("Sheet1").unwrap();
        sheet.set_name("Учет времени");
        if with_workday_sheet {
            let workday = book.new_sheet(WORKDAY_SHEET).unwrap();
            workday.get_cell_mut((1u32, 1u32)).set_value("Дата");
            workday.get_cell_mut((2u32, 1u32)).set_value("Начало");
            workday.get_cell_mut((3u32, 1u32)).set_value("Конец");
            workday.get_cell_mut((4u32, 1u32)).set_value("Итого");
        }
        let path = dir.join("book.xlsx");
        umya_spreadsheet::writer::xlsx::write(&book, &path).unwrap();
        Ok(path)
    }

    fn at(hour: u32, minute: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 3, 15, hour, minute, 0).unwrap()
    }

    #[test]
    fn absent_sheet_is_reported_not_failed() -> Result<()> {
        let dir = tempdir()?;
        let path = write_fixture(dir.path(), false)?;

        assert_eq!(
            mark_day(&path, DayEvent::Start, at(9, 0))?,
            DayMark::SheetAbsent
        );
        Ok(())
    }

    #[test]
    fn start_then_end_fill_one_row() -> Result<()> {
        let dir = tempdir()?;
        let path = write_fixture(dir.path(), true)?;

        assert_eq!(
            mark_day(&path, DayEvent::Start, at(9, 0))?,
            DayMark::Recorded { row: 2 }
        );
        assert_eq!(
            mark_day(&path, DayEvent::End, at(17, 30))?,
            DayMark::Recorded { row: 2 }
        );

        let book = umya_spreadsheet::reader::xlsx::read(&path).unwrap();
        let sheet = book.get_sheet_by_name(WORKDAY_SHEET).unwrap();
        let start: f64 = sheet.get_value((2u32, 2u32)).parse()?;
        let end: f64 = sheet.get_value((3u32, 2u32)).parse()?;
        let total: f64 = sheet.get_value((4u32, 2u32)).parse()?;
        assert!((start - 9.0 / 24.0).abs() < 1e-12);
        assert!((end - 17.5 / 24.0).abs() < 1e-12);
        assert!((total - 8.5 / 24.0).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn restarting_reuses_todays_row() -> Result<()> {
        let dir = tempdir()?;
        let path = write_fixture(dir.path(), true)?;

        mark_day(&path, DayEvent::Start, at(9, 0))?;
        assert_eq!(
            mark_day(&path, DayEvent::Start, at(10, 0))?,
            DayMark::Recorded { row: 2 }
        );
        Ok(())
    }

    #[test]
    fn end_without_start_is_an_error() -> Result<()> {
        let dir = tempdir()?;
        let path = write_fixture(dir.path(), true)?;

        let err = mark_day(&path, DayEvent::End, at(17, 0)).unwrap_err();
        assert!(matches!(err, WorkbookError::DayNotStarted(_)));
        Ok(())
    }
}
