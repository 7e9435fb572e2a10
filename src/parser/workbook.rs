//! XLSX Reader
//!
//! calamineのラッパーとして、XLSXファイルの最初のワークシートを読み込みます。

use calamine::{open_workbook_auto_from_rs, Data, Reader, Sheets};
use std::io::Cursor;
use std::path::Path;

use crate::error::BatchError;
use crate::parser::TableReader;
use crate::security::SecurityConfig;
use crate::types::{CellValue, Table};

/// calamineによるXLSXテーブルリーダー
///
/// XLSX形式のみサポートします。ファイル全体をメモリに読み込むため、
/// 入力サイズは`SecurityConfig`の上限で制限されます。
#[derive(Debug, Clone, Default)]
pub struct XlsxTableReader {
    security: SecurityConfig,
}

impl XlsxTableReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// 入力ファイルサイズの上限（バイト）を指定して生成
    pub fn with_max_input_size(max_input_file_size: u64) -> Self {
        Self {
            security: SecurityConfig {
                max_input_file_size,
            },
        }
    }

    /// バイト列からテーブルを読み込む
    pub fn read_bytes(&self, buffer: Vec<u8>, path: &Path) -> Result<Table, BatchError> {
        self.security.check_input_size(buffer.len() as u64)?;

        let mut workbook = match open_workbook_auto_from_rs(Cursor::new(buffer))? {
            Sheets::Xlsx(workbook) => workbook,
            _ => {
                return Err(BatchError::UnsupportedFormat(
                    "Only XLSX format is supported".to_string(),
                ))
            }
        };

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| BatchError::EmptyWorkbook(path.to_path_buf()))?;

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| BatchError::Read(e.into()))?;

        // 使用範囲がA列から始まらない場合、先頭の空列を補う
        let leading_cols = range.start().map(|(_, col)| col as usize).unwrap_or(0);

        let mut rows = range.rows().map(|row| {
            std::iter::repeat(CellValue::Empty)
                .take(leading_cols)
                .chain(row.iter().map(convert_cell))
                .collect::<Vec<_>>()
        });

        let header = rows.next().unwrap_or_default();
        Ok(Table::from_rows(header, rows.collect()))
    }
}

impl TableReader for XlsxTableReader {
    fn read_table(&self, path: &Path) -> Result<Table, BatchError> {
        let size = std::fs::metadata(path)?.len();
        self.security.check_input_size(size)?;

        let buffer = std::fs::read(path)?;
        self.read_bytes(buffer, path)
    }
}

/// calamineのセル値を変換
///
/// 日付はシリアル値のまま保持します。ISO形式の日付文字列やエラー値は表示文字列になります。
fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::String(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::DateTime(dt.as_f64()),
        Data::Empty => CellValue::Empty,
        other => CellValue::String(other.to_string()),
    }
}
