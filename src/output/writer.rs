//! XLSX Writer
//!
//! rust_xlsxwriterを使用してテーブルを単一ワークシートのXLSXファイルとして書き出します。

use rust_xlsxwriter::{DocProperties, ExcelDateTime, Format, Workbook, Worksheet, XlsxError};
use std::path::Path;

use crate::error::BatchError;
use crate::output::TableWriter;
use crate::types::{CellValue, Table};

/// 出力ワークシート名
pub(crate) const SHEET_NAME: &str = "Sheet1";

/// 日付セルの表示形式
const DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// rust_xlsxwriterによるXLSXテーブルライター
///
/// ドキュメントプロパティの作成日時を固定値にするため、
/// 同じテーブルからは常に同一バイト列のファイルが生成されます。
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxTableWriter;

impl XlsxTableWriter {
    pub fn new() -> Self {
        Self
    }

    /// テーブルをXLSXのバイト列に変換する
    pub fn to_buffer(&self, table: &Table) -> Result<Vec<u8>, BatchError> {
        let mut workbook = build_workbook(table)?;
        Ok(workbook.save_to_buffer()?)
    }
}

impl TableWriter for XlsxTableWriter {
    fn write_table(&self, table: &Table, path: &Path) -> Result<(), BatchError> {
        let mut workbook = build_workbook(table)?;
        workbook.save(path)?;
        Ok(())
    }
}

fn build_workbook(table: &Table) -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();

    let creation_date = ExcelDateTime::from_ymd(2000, 1, 1)?;
    let properties = DocProperties::new().set_creation_datetime(&creation_date);
    workbook.set_properties(&properties);

    let date_format = Format::new().set_num_format(DATETIME_FORMAT);

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col_idx, column) in table.columns().iter().enumerate() {
        let col = u16::try_from(col_idx).map_err(|_| XlsxError::RowColumnLimitError)?;

        write_cell(worksheet, 0, col, column.header(), &date_format)?;

        for (row_idx, cell) in column.cells().iter().enumerate() {
            let row = u32::try_from(row_idx + 1).map_err(|_| XlsxError::RowColumnLimitError)?;
            write_cell(worksheet, row, col, cell, &date_format)?;
        }
    }

    Ok(workbook)
}

/// セル値の型を保ったまま書き込む（空セルは書き込まない）
fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &CellValue,
    date_format: &Format,
) -> Result<(), XlsxError> {
    match value {
        CellValue::Number(n) => {
            worksheet.write_number(row, col, *n)?;
        }
        CellValue::String(s) => {
            worksheet.write_string(row, col, s)?;
        }
        CellValue::Bool(b) => {
            worksheet.write_boolean(row, col, *b)?;
        }
        CellValue::DateTime(serial) => {
            worksheet.write_number_with_format(row, col, *serial, date_format)?;
        }
        CellValue::Empty => {}
    }
    Ok(())
}
