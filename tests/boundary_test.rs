//! Boundary Tests for xlsxbatch
//!
//! Edge cases of the table shape and cell types: empty sheets, header-only
//! sheets, non-text headers, text inside StartTime columns, and unusual
//! millisecond values.

use calamine::{open_workbook, Data, Reader, Xlsx};
use rust_xlsxwriter::*;
use std::path::Path;
use tempfile::TempDir;
use xlsxbatch::{BatchProcessorBuilder, LogLevel, MemorySink, RunReport, INVALID_TIME};

// Helper module for generating boundary test fixtures
mod fixtures {
    use super::*;

    /// Workbook with one sheet and no cells
    pub fn write_empty_sheet(path: &Path) -> Result<(), XlsxError> {
        let mut workbook = Workbook::new();
        let _worksheet = workbook.add_worksheet();
        workbook.save(path)
    }

    /// StartTime header without any data rows
    pub fn write_header_only(path: &Path) -> Result<(), XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write_string(0, 0, "StartTime")?;
        workbook.save(path)
    }

    /// Numeric header next to a text StartTime header
    pub fn write_numeric_header(path: &Path) -> Result<(), XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write_number(0, 0, 2024)?;
        worksheet.write_string(0, 1, "trial_STARTTIME")?;
        worksheet.write_number(1, 0, 7)?;
        worksheet.write_number(1, 1, 120)?;
        workbook.save(path)
    }

    /// StartTime column containing a text cell
    pub fn write_text_in_start_time(path: &Path) -> Result<(), XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write_string(0, 0, "StartTime")?;
        worksheet.write_number(1, 0, 40)?;
        worksheet.write_string(2, 0, "n/a")?;
        worksheet.write_string(3, 0, " 2000 ")?;
        workbook.save(path)
    }

    /// StartTime column with negative, fractional and multi-day values
    pub fn write_unusual_times(path: &Path) -> Result<(), XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write_string(0, 0, "StartTime")?;
        worksheet.write_number(1, 0, -1)?;
        worksheet.write_number(2, 0, 1500.7)?;
        worksheet.write_number(3, 0, 90_000_000)?;
        worksheet.write_number(4, 0, -40)?;
        workbook.save(path)
    }

    /// Sheet whose first row has more cells than some data rows
    pub fn write_ragged_rows(path: &Path) -> Result<(), XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write_string(0, 0, "StartTime")?;
        worksheet.write_string(0, 1, "note")?;
        worksheet.write_number(1, 0, 40)?;
        worksheet.write_number(2, 0, 80)?;
        worksheet.write_string(2, 1, "late")?;
        workbook.save(path)
    }
}

fn read_rows(path: &Path) -> Vec<Vec<Data>> {
    let mut workbook: Xlsx<_> = open_workbook(path).unwrap();
    let range = workbook.worksheet_range("Sheet1").unwrap();
    range.rows().map(|row| row.to_vec()).collect()
}

fn run(root: &Path, check: bool, convert: bool) -> (RunReport, MemorySink) {
    let processor = BatchProcessorBuilder::new()
        .check_divisible(check)
        .convert_time(convert)
        .build()
        .unwrap();
    let sink = MemorySink::new();
    let report = processor.run(root, &sink).unwrap();
    (report, sink)
}

/// TC-B-001: Empty Sheet
#[test]
fn test_empty_sheet_is_skipped() {
    let dir = TempDir::new().unwrap();
    fixtures::write_empty_sheet(&dir.path().join("empty.xlsx")).unwrap();

    let (report, sink) = run(dir.path(), true, true);

    assert_eq!(report.files_skipped_no_match, 1);
    assert_eq!(report.files_failed, 0);
    assert!(sink
        .messages()
        .iter()
        .any(|m| m.starts_with("No column containing 'starttime' found in empty.xlsx")));
}

/// TC-B-002: Header Only
#[test]
fn test_header_only_sheet_writes_derived_headers() {
    let dir = TempDir::new().unwrap();
    fixtures::write_header_only(&dir.path().join("h.xlsx")).unwrap();

    let (report, _) = run(dir.path(), true, true);
    assert_eq!(report.outputs.len(), 1);

    let rows = read_rows(&dir.path().join("_processed").join("h_已处理.xlsx"));
    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows[0],
        vec![
            Data::String("StartTime".to_string()),
            Data::String("StartTime_is_divisible_by_40".to_string()),
            Data::String("StartTime_time_format".to_string()),
        ]
    );
}

/// TC-B-003: Non-text Header
#[test]
fn test_numeric_headers_are_not_matched_but_kept() {
    let dir = TempDir::new().unwrap();
    fixtures::write_numeric_header(&dir.path().join("n.xlsx")).unwrap();

    let (_, sink) = run(dir.path(), true, false);
    assert!(sink
        .messages()
        .contains(&"Found starttime columns: trial_STARTTIME".to_string()));

    let rows = read_rows(&dir.path().join("_processed").join("n_已处理.xlsx"));
    assert_eq!(rows[0][0], Data::Float(2024.0));
    assert_eq!(
        rows[0][2],
        Data::String("trial_STARTTIME_is_divisible_by_40".to_string())
    );
    assert_eq!(rows[1][2], Data::Bool(true));
}

/// TC-B-004: Text in a Checked Column
#[test]
fn test_text_cell_fails_divisibility_check() {
    let dir = TempDir::new().unwrap();
    fixtures::write_text_in_start_time(&dir.path().join("t.xlsx")).unwrap();

    let (report, sink) = run(dir.path(), true, false);

    assert_eq!(report.files_failed, 1);
    assert!(report.outputs.is_empty());
    let error = sink
        .lines()
        .into_iter()
        .find(|l| l.level == LogLevel::Error)
        .unwrap();
    assert!(error.message.contains("non-numeric value 'n/a'"));
}

/// TC-B-005: Text in a Time Column
#[test]
fn test_text_cell_becomes_invalid_time() {
    let dir = TempDir::new().unwrap();
    fixtures::write_text_in_start_time(&dir.path().join("t.xlsx")).unwrap();

    let (report, _) = run(dir.path(), false, true);
    assert_eq!(report.files_failed, 0);

    let rows = read_rows(&dir.path().join("_processed").join("t_已处理.xlsx"));
    assert_eq!(rows[1][1], Data::String("00:00:00:040".to_string()));
    assert_eq!(rows[2][1], Data::String(INVALID_TIME.to_string()));
    assert_eq!(rows[3][1], Data::String("00:00:02:000".to_string()));
}

/// TC-B-006: Unusual Millisecond Values
#[test]
fn test_unusual_time_values() {
    let dir = TempDir::new().unwrap();
    fixtures::write_unusual_times(&dir.path().join("u.xlsx")).unwrap();

    run(dir.path(), true, true);

    let rows = read_rows(&dir.path().join("_processed").join("FALSE_u_已处理.xlsx"));
    let flags: Vec<Data> = rows[1..].iter().map(|r| r[1].clone()).collect();
    let times: Vec<Data> = rows[1..].iter().map(|r| r[2].clone()).collect();

    assert_eq!(
        flags,
        vec![
            Data::Bool(false),
            Data::Bool(false),
            Data::Bool(true),
            Data::Bool(true)
        ]
    );
    assert_eq!(
        times,
        vec![
            Data::String("-1:59:59:999".to_string()),
            Data::String("00:00:01:500".to_string()),
            Data::String("25:00:00:000".to_string()),
            Data::String("-1:59:59:960".to_string()),
        ]
    );
}

/// TC-B-007: Ragged Rows
#[test]
fn test_short_rows_are_padded() {
    let dir = TempDir::new().unwrap();
    fixtures::write_ragged_rows(&dir.path().join("r.xlsx")).unwrap();

    run(dir.path(), true, false);

    let rows = read_rows(&dir.path().join("_processed").join("r_已处理.xlsx"));
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1][1], Data::Empty);
    assert_eq!(rows[2][1], Data::String("late".to_string()));
    assert_eq!(rows[1][2], Data::Bool(true));
    assert_eq!(rows[2][2], Data::Bool(true));
}
