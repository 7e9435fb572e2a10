//! Output Module
//!
//! 処理済みテーブルをファイルへ書き出すライターを提供するモジュール。

mod writer;

use std::path::Path;

use crate::error::BatchError;
use crate::types::Table;

pub use writer::XlsxTableWriter;

/// テーブルをファイルへ書き出すライター
///
/// ヘッダー行を先頭に、行順と列順を保ったまま書き出します。
pub trait TableWriter: Send + Sync {
    fn write_table(&self, table: &Table, path: &Path) -> Result<(), BatchError>;
}
