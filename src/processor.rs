//! File Processor Module
//!
//! 1ファイル分の処理（読み込み → 列検出 → 派生列の追加 → 出力名の決定 → 書き込み）を行うモジュール。

use std::path::{Path, PathBuf};

use crate::builder::ProcessingConfig;
use crate::columns::ColumnMatcher;
use crate::error::BatchError;
use crate::log::{LogLine, LogSink};
use crate::naming::OutputName;
use crate::output::TableWriter;
use crate::parser::TableReader;
use crate::timecode::time_code;
use crate::types::{Column, Table};
use crate::validator::{any_invalid, check_divisible};

/// 出力名の導出に使うファイル番号（常に0）
const FILE_INDEX: usize = 0;

/// 1ファイルの処理結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// 処理済みテーブルを書き出した
    Written {
        /// 書き出したファイルのパス
        output: PathBuf,
        /// 除数の整数倍でない値が見つかった
        has_invalid: bool,
    },
    /// 対象列がないため出力しなかった
    NoMatch,
    /// エラーが発生した（ログ出力済み）
    Failed,
}

/// 判定列の列名
pub fn divisibility_column_name(column: &str, divisor: f64) -> String {
    format!("{}_is_divisible_by_{}", column, divisor)
}

/// 時刻コード列の列名
pub fn time_column_name(column: &str) -> String {
    format!("{}_time_format", column)
}

/// 対象列ごとに派生列をテーブル末尾へ追加する
///
/// 同名の列が既にある場合はその位置で置き換えます。
///
/// 戻り値は、いずれかの対象列に除数の整数倍でない値が含まれていたかどうかです。
pub fn annotate_table(
    table: &mut Table,
    matched: &[String],
    config: &ProcessingConfig,
    sink: &dyn LogSink,
) -> Result<bool, BatchError> {
    let mut has_invalid = false;

    for name in matched {
        let values = match table.column(name) {
            Some(column) => column.cells().to_vec(),
            None => continue,
        };

        if config.check_divisible {
            let flags = check_divisible(name, &values, config.divisor)?;
            if any_invalid(&flags) {
                has_invalid = true;
                sink.emit(LogLine::warning(format!(
                    "Column {} contains values that are not multiples of {}",
                    name, config.divisor
                )));
            }
            table.set_column(Column::new(
                divisibility_column_name(name, config.divisor),
                flags.into_iter().map(|f| f.to_cell()).collect(),
            ))?;
        }

        if config.convert_time {
            table.set_column(Column::new(
                time_column_name(name),
                values.iter().map(|v| time_code(v).to_cell()).collect(),
            ))?;
        }
    }

    Ok(has_invalid)
}

/// 1ファイル分の処理を行うプロセッサ
pub(crate) struct FileProcessor<'a> {
    config: &'a ProcessingConfig,
    matcher: ColumnMatcher,
    reader: &'a dyn TableReader,
    writer: &'a dyn TableWriter,
}

impl<'a> FileProcessor<'a> {
    pub fn new(
        config: &'a ProcessingConfig,
        reader: &'a dyn TableReader,
        writer: &'a dyn TableWriter,
    ) -> Self {
        Self {
            config,
            matcher: ColumnMatcher::new(&config.marker),
            reader,
            writer,
        }
    }

    /// 1ファイルを処理する
    ///
    /// エラーはファイル名とともにログに出力され、`FileOutcome::Failed`として返ります。
    pub fn process_file(&self, file: &Path, output_folder: &Path, sink: &dyn LogSink) -> FileOutcome {
        let _span = tracing::debug_span!("process_file", file = %file.display()).entered();

        match self.process(file, output_folder, sink) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::debug!(error = ?e, "file processing failed");
                sink.emit(LogLine::error(format!(
                    "Failed to process {}: {}",
                    display_name(file),
                    e
                )));
                FileOutcome::Failed
            }
        }
    }

    fn process(
        &self,
        file: &Path,
        output_folder: &Path,
        sink: &dyn LogSink,
    ) -> Result<FileOutcome, BatchError> {
        let file_name = display_name(file);
        sink.emit(LogLine::info(format!("Processing file: {}", file_name)));

        let mut table = self.reader.read_table(file)?;
        tracing::debug!(rows = table.height(), columns = table.width(), "table loaded");

        let matched = self.matcher.find_matches(table.headers());
        if matched.is_empty() {
            sink.emit(LogLine::info(format!(
                "No column containing '{}' found in {}, skipping",
                self.config.marker, file_name
            )));
            return Ok(FileOutcome::NoMatch);
        }

        sink.emit(LogLine::info(format!(
            "Found {} columns: {}",
            self.config.marker,
            matched.join(", ")
        )));

        let has_invalid = annotate_table(&mut table, &matched, self.config, sink)?;

        let (stem, extension) = split_file_name(file);
        let output_name = OutputName {
            stem: &stem,
            extension: &extension,
            file_index: FILE_INDEX,
            custom_suffixes: &self.config.custom_suffixes,
            failed: has_invalid,
            check_requested: self.config.check_divisible,
        }
        .derive_with_default(&self.config.default_suffix);

        let output = output_folder.join(&output_name);
        self.writer.write_table(&table, &output)?;
        sink.emit(LogLine::info(format!("Saved: {}", output_name)));

        Ok(FileOutcome::Written {
            output,
            has_invalid,
        })
    }
}

fn display_name(file: &Path) -> String {
    file.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string())
}

/// ファイル名を語幹と拡張子（先頭のドットを含む）に分ける
fn split_file_name(file: &Path) -> (String, String) {
    let stem = file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = file
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    (stem, extension)
}
