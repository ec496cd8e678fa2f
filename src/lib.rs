//! Terminal stopwatch for booking worked time into an Excel workbook.
//! Pick a project and a work type from the workbook's reference sheet, run
//! the stopwatch, and every stopped run lands as a row on the timesheet
//! sheet.
//!

pub mod cli;
pub mod config;
pub mod timer;
pub mod utils;
pub mod workbook;
