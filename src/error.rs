//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use std::path::PathBuf;

use thiserror::Error;

/// xlsxbatchクレート全体で使用するエラー型
///
/// ファイル単位のエラー（読み込み・検証・書き込み）と、実行全体を中断する
/// エラー（ルートフォルダが存在しない等）の両方をこの型で表現します。
/// ファイル単位のエラーは`FileProcessor`内で捕捉されログに出力されるため、
/// `BatchProcessor::run`の呼び出し元に返るのは実行全体のエラーのみです。
///
/// # エラーの種類
///
/// - `Io`: I/O操作中に発生したエラー
/// - `Read`: Excelファイルの解析エラー（calamine由来）
/// - `Write`: Excelファイルの書き込みエラー（rust_xlsxwriter由来）
/// - `NonNumericCell`: 検証対象の列に数値以外のセルが含まれる
/// - `Config`: 設定の検証に失敗した
/// - `FolderMissing` / `FolderUnreadable`: ルートフォルダが無効
#[derive(Error, Debug)]
pub enum BatchError {
    /// I/O操作中に発生したエラー
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Excelファイルの解析中に発生したエラー
    ///
    /// ファイル形式が不正、破損したファイルなどが原因となります。
    #[error("Failed to read Excel file: {0}")]
    Read(#[from] calamine::Error),

    /// Excelファイルの書き込み中に発生したエラー
    #[error("Failed to write Excel file: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),

    /// XLSX以外の形式が検出された
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// ワークシートが1枚も存在しない
    #[error("Workbook has no worksheets: {}", .0.display())]
    EmptyWorkbook(PathBuf),

    /// 検証対象の列に数値として扱えないセルが存在する
    ///
    /// `row`はヘッダー行を除いた0始まりのデータ行番号です。
    #[error("Column '{column}' has a non-numeric value '{value}' at data row {row}")]
    NonNumericCell {
        /// 列名
        column: String,
        /// データ行番号（0始まり）
        row: usize,
        /// セルの内容
        value: String,
    },

    /// 追加しようとした列の行数がテーブルと一致しない
    #[error("Column '{column}' has {actual} rows, expected {expected}")]
    ColumnLength {
        /// 列名
        column: String,
        /// テーブルの行数
        expected: usize,
        /// 追加しようとした列の行数
        actual: usize,
    },

    /// 設定の検証に失敗したエラー
    ///
    /// `BatchProcessorBuilder::build()`時に設定を検証し、無効な設定が検出された
    /// 場合に発生します。
    ///
    /// # 例
    ///
    /// ```rust
    /// use xlsxbatch::{BatchError, BatchProcessorBuilder};
    ///
    /// let result = BatchProcessorBuilder::new().with_divisor(0.0).build();
    /// assert!(matches!(result, Err(BatchError::Config(_))));
    /// ```
    #[error("Configuration error: {0}")]
    Config(String),

    /// セキュリティ制限に違反したエラー（入力ファイルサイズ上限など）
    #[error("Security violation: {0}")]
    SecurityViolation(String),

    /// ルートフォルダが存在しない、またはディレクトリではない
    #[error("Folder not found: {}", .0.display())]
    FolderMissing(PathBuf),

    /// ルートフォルダを走査できない
    #[error("Folder unreadable: {}: {source}", .path.display())]
    FolderUnreadable {
        /// 走査に失敗したパス
        path: PathBuf,
        /// 下位のI/Oエラー
        #[source]
        source: std::io::Error,
    },
}

impl BatchError {
    /// 実行全体を中断すべきエラーかどうか
    pub fn is_run_fatal(&self) -> bool {
        matches!(
            self,
            BatchError::FolderMissing(_) | BatchError::FolderUnreadable { .. }
        )
    }
}
