//! Builder Module
//!
//! Fluent Builder APIを提供し、`BatchProcessor`インスタンスを段階的に構築する。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::columns::DEFAULT_MARKER;
use crate::error::BatchError;
use crate::log::LogSink;
use crate::naming::DEFAULT_SUFFIX;
use crate::output::{TableWriter, XlsxTableWriter};
use crate::parser::{TableReader, XlsxTableReader};
use crate::processor::{FileOutcome, FileProcessor};
use crate::validator::DEFAULT_DIVISOR;
use crate::walker::{FolderWalker, RunReport};

/// カスタムサフィックスの最大数
pub const MAX_CUSTOM_SUFFIXES: usize = 10;

/// 出力フォルダ名の既定値
pub const DEFAULT_OUTPUT_DIR: &str = "_processed";

/// 1回の実行に適用される処理設定
///
/// 実行中は読み取り専用で、すべてのファイルで共有されます。
/// JSONなどから読み込めるよう`serde`に対応しています（省略した項目は既定値）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// 除数の整数倍かどうかの判定列を追加する
    pub check_divisible: bool,

    /// 時刻コード列を追加する
    pub convert_time: bool,

    /// 出力ファイル名のサフィックス（0〜10個）
    pub custom_suffixes: Vec<String>,

    /// 割り切り判定の除数
    pub divisor: f64,

    /// 対象列を検出するマーカー文字列
    pub marker: String,

    /// 出力フォルダ名（各入力ファイルと同じ階層に作成）
    pub output_dir_name: String,

    /// カスタムサフィックスがない場合のサフィックス
    pub default_suffix: String,

    /// 出力フォルダと同名のディレクトリを走査対象から除外する
    pub skip_output_dirs: bool,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            check_divisible: false,
            convert_time: false,
            custom_suffixes: Vec::new(),
            divisor: DEFAULT_DIVISOR,
            marker: DEFAULT_MARKER.to_string(),
            output_dir_name: DEFAULT_OUTPUT_DIR.to_string(),
            default_suffix: DEFAULT_SUFFIX.to_string(),
            skip_output_dirs: true,
        }
    }
}

impl ProcessingConfig {
    /// 設定値を検証する
    ///
    /// # 発生し得るエラー
    ///
    /// * `BatchError::Config(String)`:
    ///   * カスタムサフィックスが10個を超える
    ///   * サフィックスにパス区切り文字が含まれる
    ///   * 除数が0、または有限値でない
    ///   * マーカー・出力フォルダ名・既定サフィックスが空
    pub fn validate(&self) -> Result<(), BatchError> {
        if self.custom_suffixes.len() > MAX_CUSTOM_SUFFIXES {
            return Err(BatchError::Config(format!(
                "Too many custom suffixes: {} (max: {})",
                self.custom_suffixes.len(),
                MAX_CUSTOM_SUFFIXES
            )));
        }

        let suffixes = self
            .custom_suffixes
            .iter()
            .chain(std::iter::once(&self.default_suffix));
        for suffix in suffixes {
            if suffix.contains(['/', '\\']) {
                return Err(BatchError::Config(format!(
                    "Suffix must not contain a path separator: '{}'",
                    suffix
                )));
            }
        }

        if !self.divisor.is_finite() || self.divisor == 0.0 {
            return Err(BatchError::Config(format!(
                "Invalid divisor: {}",
                self.divisor
            )));
        }

        if self.marker.is_empty() {
            return Err(BatchError::Config("Column marker must not be empty".to_string()));
        }

        if self.output_dir_name.trim().is_empty() || self.output_dir_name.contains(['/', '\\']) {
            return Err(BatchError::Config(format!(
                "Invalid output directory name: '{}'",
                self.output_dir_name
            )));
        }

        if self.default_suffix.is_empty() {
            return Err(BatchError::Config("Default suffix must not be empty".to_string()));
        }

        Ok(())
    }
}

/// Fluent Builder APIを提供する構造体
///
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみをオーバーライドできます。
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsxbatch::{BatchProcessorBuilder, MemorySink};
///
/// # fn main() -> Result<(), xlsxbatch::BatchError> {
/// let processor = BatchProcessorBuilder::new()
///     .check_divisible(true)
///     .convert_time(true)
///     .with_custom_suffixes(["Q1", "Q2"])
///     .build()?;
///
/// let sink = MemorySink::new();
/// let report = processor.run("data", &sink)?;
/// println!("{}", report.summary());
/// # Ok(())
/// # }
/// ```
pub struct BatchProcessorBuilder {
    /// 内部設定（構築中）
    config: ProcessingConfig,

    /// 入力ファイルサイズの上限
    max_input_file_size: Option<u64>,

    reader: Option<Box<dyn TableReader>>,
    writer: Option<Box<dyn TableWriter>>,
}

impl Default for BatchProcessorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BatchProcessorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchProcessorBuilder")
            .field("config", &self.config)
            .field("max_input_file_size", &self.max_input_file_size)
            .field("custom_reader", &self.reader.is_some())
            .field("custom_writer", &self.writer.is_some())
            .finish()
    }
}

impl BatchProcessorBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - 割り切り判定: しない（除数40）
    /// - 時刻コード変換: しない
    /// - カスタムサフィックス: なし（`已处理`）
    /// - マーカー: `starttime`
    /// - 出力フォルダ: `_processed`
    pub fn new() -> Self {
        Self {
            config: ProcessingConfig::default(),
            max_input_file_size: None,
            reader: None,
            writer: None,
        }
    }

    /// 既存の設定から開始する
    ///
    /// JSONファイルなどから読み込んだ設定に、個別のオーバーライドを重ねる場合に使用します。
    pub fn from_config(config: ProcessingConfig) -> Self {
        Self {
            config,
            ..Self::new()
        }
    }

    /// 割り切り判定列を追加するか
    pub fn check_divisible(mut self, enabled: bool) -> Self {
        self.config.check_divisible = enabled;
        self
    }

    /// 時刻コード列を追加するか
    pub fn convert_time(mut self, enabled: bool) -> Self {
        self.config.convert_time = enabled;
        self
    }

    /// 出力ファイル名のカスタムサフィックスを指定する
    ///
    /// 空白のみのサフィックスは無視されます。それ以外は入力どおりに使われます。
    ///
    /// # 使用例
    ///
    /// ```rust
    /// use xlsxbatch::BatchProcessorBuilder;
    ///
    /// let processor = BatchProcessorBuilder::new()
    ///     .with_custom_suffixes([" A ", "  ", "B"])
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(processor.config().custom_suffixes, vec![" A ", "B"]);
    /// ```
    pub fn with_custom_suffixes<I, S>(mut self, suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.config.custom_suffixes = suffixes
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .filter(|s| !s.trim().is_empty())
            .collect();
        self
    }

    /// 割り切り判定の除数を指定する
    ///
    /// 0や有限値でない除数は`build()`時に`BatchError::Config`になります。
    pub fn with_divisor(mut self, divisor: f64) -> Self {
        self.config.divisor = divisor;
        self
    }

    /// 対象列を検出するマーカー文字列を指定する
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.config.marker = marker.into();
        self
    }

    /// 出力フォルダ名を指定する
    pub fn with_output_dir_name(mut self, name: impl Into<String>) -> Self {
        self.config.output_dir_name = name.into();
        self
    }

    /// カスタムサフィックスがない場合のサフィックスを指定する
    pub fn with_default_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.config.default_suffix = suffix.into();
        self
    }

    /// 出力フォルダと同名のディレクトリを走査から除外するか
    pub fn skip_output_dirs(mut self, skip: bool) -> Self {
        self.config.skip_output_dirs = skip;
        self
    }

    /// 入力ファイルサイズの上限（バイト）を指定する
    ///
    /// 既定は2GBです。カスタムリーダーを指定した場合は無視されます。
    pub fn with_max_input_file_size(mut self, bytes: u64) -> Self {
        self.max_input_file_size = Some(bytes);
        self
    }

    /// テーブルリーダーを差し替える
    pub fn with_reader(mut self, reader: impl TableReader + 'static) -> Self {
        self.reader = Some(Box::new(reader));
        self
    }

    /// テーブルライターを差し替える
    pub fn with_writer(mut self, writer: impl TableWriter + 'static) -> Self {
        self.writer = Some(Box::new(writer));
        self
    }

    /// 設定を検証し、`BatchProcessor`インスタンスを生成する
    ///
    /// # 戻り値
    ///
    /// * `Ok(BatchProcessor)`: 設定が有効な場合
    /// * `Err(BatchError::Config)`: 設定が無効な場合（[`ProcessingConfig::validate`]を参照）
    pub fn build(self) -> Result<BatchProcessor, BatchError> {
        self.config.validate()?;

        if self.max_input_file_size == Some(0) {
            return Err(BatchError::Config(
                "Maximum input file size must be greater than 0".to_string(),
            ));
        }

        let reader: Box<dyn TableReader> = match self.reader {
            Some(reader) => reader,
            None => Box::new(match self.max_input_file_size {
                Some(bytes) => XlsxTableReader::with_max_input_size(bytes),
                None => XlsxTableReader::new(),
            }),
        };
        let writer: Box<dyn TableWriter> = match self.writer {
            Some(writer) => writer,
            None => Box::new(XlsxTableWriter::new()),
        };

        Ok(BatchProcessor {
            config: self.config,
            reader,
            writer,
        })
    }
}

/// バッチ処理のファサード
///
/// `BatchProcessorBuilder`で構築された設定に基づいて、フォルダの走査と
/// ファイルごとの処理を実行します。`Send + Sync`なので、ワーカースレッドから実行できます。
pub struct BatchProcessor {
    config: ProcessingConfig,
    reader: Box<dyn TableReader>,
    writer: Box<dyn TableWriter>,
}

impl fmt::Debug for BatchProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchProcessor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl BatchProcessor {
    /// 処理設定
    pub fn config(&self) -> &ProcessingConfig {
        &self.config
    }

    /// ルートフォルダ以下のすべてのXLSXファイルを処理する
    ///
    /// ファイル単位のエラーはログに出力され、走査は継続します。
    /// `Err`が返るのはルートフォルダが無効な場合のみです。
    pub fn run(&self, root: impl AsRef<Path>, sink: &dyn LogSink) -> Result<RunReport, BatchError> {
        FolderWalker::new(&self.config, self.file_processor()).run(root.as_ref(), sink)
    }

    /// 1ファイルを処理し、結果を`output_folder`に書き出す
    ///
    /// エラーは呼び出し元に伝播せず、ファイル名とともにログに出力されます。
    pub fn process_file(&self, file: &Path, output_folder: &Path, sink: &dyn LogSink) -> FileOutcome {
        self.file_processor().process_file(file, output_folder, sink)
    }

    fn file_processor(&self) -> FileProcessor<'_> {
        FileProcessor::new(&self.config, self.reader.as_ref(), self.writer.as_ref())
    }
}
