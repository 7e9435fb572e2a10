//! Parser Module
//!
//! calamineを使用したExcelファイル読み込みの実装。
//! ワークブックの最初のワークシートを`Table`として取り出します。

mod workbook;

use std::path::Path;

use crate::error::BatchError;
use crate::types::Table;

pub use workbook::XlsxTableReader;

/// ファイルからテーブルを読み込むリーダー
///
/// 最初の行をヘッダーとして扱い、以降の行をデータ行とします。
pub trait TableReader: Send + Sync {
    fn read_table(&self, path: &Path) -> Result<Table, BatchError>;
}
