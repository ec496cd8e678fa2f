use std::path::Path;

use tracing::debug;

use super::{open_workbook, require_sheet, WorkbookError, REFERENCE_SHEET};

/// The project and work type lookup lists. Both are deduplicated and keep
/// their first-seen sheet order; after normalization they need not be the
/// same length or row-aligned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceData {
    pub projects: Vec<String>,
    pub work_types: Vec<String>,
}

impl ReferenceData {
    /// Both columns must yield at least one usable value, otherwise the
    /// workbook is treated as structurally broken.
    pub fn ensure_usable(&self) -> Result<(), WorkbookError> {
        if self.projects.is_empty() || self.work_types.is_empty() {
            return Err(WorkbookError::EmptyReference);
        }
        Ok(())
    }
}

/// Reads the lookup lists from the reference sheet. Read-only, no side
/// effects on the workbook.
pub fn load_reference(path: &Path) -> Result<ReferenceData, WorkbookError> {
    let book = open_workbook(path)?;
    let sheet = require_sheet(&book, REFERENCE_SHEET)?;

    let mut projects = Vec::new();
    let mut work_types = Vec::new();
    // Row 1 holds the headers.
    for row in 2..=sheet.get_highest_row() {
        push_normalized(&mut projects, &sheet.get_value((1, row)));
        push_normalized(&mut work_types, &sheet.get_value((2, row)));
    }

    debug!(
        "Loaded {} projects and {} work types from {path:?}",
        projects.len(),
        work_types.len()
    );

    Ok(ReferenceData {
        projects,
        work_types,
    })
}

/// Trim, drop blanks, keep the first occurrence only.
fn push_normalized(items: &mut Vec<String>, value: &str) {
    let text = value.trim();
    if !text.is_empty() && !items.iter().any(|v| v == text) {
        items.push(text.to_string());
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use anyhow::Result;
    use tempfile::tempdir;

    use crate::workbook::{WorkbookError, REFERENCE_SHEET};

    use super::{load_reference, ReferenceData};

    fn write_fixture(dir: &Path, sheet_name: &str, rows: &[(&str, &str)]) -> Result<PathBuf> {
        let mut book = umya_spreadsheet::new_file();
        let sheet = book.get_sheet_by_name_mut("Sheet1").unwrap();
        sheet.set_name(sheet_name);
        sheet.get_cell_mut((1u32, 1u32)).set_value("Проект");
        sheet.get_cell_mut((2u32, 1u32)).set_value("Вид работы");
        for (offset, (project, work_type)) in rows.iter().enumerate() {
            let row = offset as u32 + 2;
            sheet.get_cell_mut((1u32, row)).set_value(*project);
            sheet.get_cell_mut((2u32, row)).set_value(*work_type);
        }
        let path = dir.join("book.xlsx");
        umya_spreadsheet::writer::xlsx::write(&book, &path).unwrap();
        Ok(path)
    }

    #[test]
    fn normalizes_both_columns_independently() -> Result<()> {
        let dir = tempdir()?;
        let path = write_fixture(
            dir.path(),
            REFERENCE_SHEET,
            &[
                ("A", "review"),
                ("", "  review  "),
                ("B", ""),
                ("A", "meeting"),
            ],
        )?;

        let data = load_reference(&path)?;

        assert_eq!(
            data,
            ReferenceData {
                projects: vec!["A".into(), "B".into()],
                work_types: vec!["review".into(), "meeting".into()],
            }
        );
        Ok(())
    }

    #[test]
    fn skips_the_header_row() -> Result<()> {
        let dir = tempdir()?;
        let path = write_fixture(dir.path(), REFERENCE_SHEET, &[("A", "review")])?;

        let data = load_reference(&path)?;

        assert!(!data.projects.contains(&"Проект".to_string()));
        assert_eq!(data.projects, vec!["A".to_string()]);
        Ok(())
    }

    #[test]
    fn missing_file_is_reported() {
        let err = load_reference(Path::new("/nonexistent/book.xlsx")).unwrap_err();
        assert!(matches!(err, WorkbookError::FileNotFound(_)));
    }

    #[test]
    fn missing_sheet_names_the_present_ones() -> Result<()> {
        let dir = tempdir()?;
        let path = write_fixture(dir.path(), "Другое", &[("A", "review")])?;

        let err = load_reference(&path).unwrap_err();

        match err {
            WorkbookError::MissingSheet { sheet, present } => {
                assert_eq!(sheet, REFERENCE_SHEET);
                assert_eq!(present, vec!["Другое".to_string()]);
            }
            other => panic!("expected MissingSheet, got {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn empty_columns_fail_the_usability_check() -> Result<()> {
        let dir = tempdir()?;
        let path = write_fixture(dir.path(), REFERENCE_SHEET, &[("A", "")])?;

        let data = load_reference(&path)?;

        assert!(matches!(
            data.ensure_usable(),
            Err(WorkbookError::EmptyReference)
        ));
        Ok(())
    }
}
