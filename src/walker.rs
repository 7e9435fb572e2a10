//! Folder Walker Module
//!
//! ルートフォルダ以下のXLSXファイルを列挙し、ファイルごとに処理を振り分けるモジュール。
//! 実行の集計結果は`RunReport`として返します。

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::builder::{BatchProcessorBuilder, ProcessingConfig};
use crate::error::BatchError;
use crate::log::{LogLine, LogSink};
use crate::processor::{FileOutcome, FileProcessor};

/// 処理対象の拡張子
const XLSX_EXTENSION: &str = "xlsx";

/// Office製品が作成するロックファイルの接頭辞
const LOCK_FILE_PREFIX: &str = "~$";

/// 1回の実行の集計結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// 見つかったファイル数
    pub files_found: usize,

    /// 処理を試みたファイル数（失敗したファイルも含む）
    pub files_processed: usize,

    /// 処理中にエラーが発生したファイル数
    pub files_failed: usize,

    /// 対象列がなく出力しなかったファイル数
    pub files_skipped_no_match: usize,

    /// 書き出したファイル
    pub outputs: Vec<PathBuf>,
}

impl RunReport {
    /// 集計上のスキップ数（`files_found - files_processed`）
    pub fn files_skipped(&self) -> usize {
        self.files_found.saturating_sub(self.files_processed)
    }

    /// 実行終了時のサマリー
    pub fn summary(&self) -> String {
        if self.files_found == 0 {
            "No Excel files found.".to_string()
        } else {
            format!(
                "Done! Processed {} files, skipped {} files.",
                self.files_processed,
                self.files_skipped()
            )
        }
    }

    fn record(&mut self, outcome: FileOutcome) {
        match outcome {
            FileOutcome::Written { output, .. } => self.outputs.push(output),
            FileOutcome::NoMatch => self.files_skipped_no_match += 1,
            FileOutcome::Failed => self.files_failed += 1,
        }
    }
}

/// フォルダ走査
pub(crate) struct FolderWalker<'a> {
    config: &'a ProcessingConfig,
    processor: FileProcessor<'a>,
}

impl<'a> FolderWalker<'a> {
    pub fn new(config: &'a ProcessingConfig, processor: FileProcessor<'a>) -> Self {
        Self { config, processor }
    }

    /// ルートフォルダ以下を走査して全ファイルを処理する
    ///
    /// ルートフォルダが無効な場合のみ`Err`を返します（エラーは1回だけログに出力されます）。
    pub fn run(&self, root: &Path, sink: &dyn LogSink) -> Result<RunReport, BatchError> {
        let _span = tracing::info_span!("run", root = %root.display()).entered();

        if let Err(e) = check_root(root) {
            sink.emit(LogLine::error(e.to_string()));
            return Err(e);
        }

        sink.emit(LogLine::info(format!(
            "Start processing folder: {}",
            root.display()
        )));

        // 走査中に書き出した出力を拾わないよう、先に一覧を確定させる
        let files = self.collect_files(root);
        tracing::debug!(count = files.len(), "files collected");

        let mut report = RunReport::default();
        for file in &files {
            report.files_found += 1;

            let parent = file.parent().unwrap_or(root);
            let output_folder = parent.join(&self.config.output_dir_name);
            let outcome = match std::fs::create_dir_all(&output_folder) {
                Ok(()) => self.processor.process_file(file, &output_folder, sink),
                Err(e) => {
                    sink.emit(LogLine::error(format!(
                        "Failed to create output folder {}: {}",
                        output_folder.display(),
                        e
                    )));
                    FileOutcome::Failed
                }
            };
            report.record(outcome);

            report.files_processed += 1;
        }

        if report.files_found == 0 {
            sink.emit(LogLine::warning(report.summary()));
        } else {
            sink.emit(LogLine::info(report.summary()));
        }

        tracing::info!(
            found = report.files_found,
            failed = report.files_failed,
            no_match = report.files_skipped_no_match,
            "run finished"
        );
        Ok(report)
    }

    /// 処理対象ファイルの一覧（ディレクトリごとにファイル名順）
    fn collect_files(&self, root: &Path) -> Vec<PathBuf> {
        WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || self.should_descend(entry))
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable entry");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file() && is_xlsx(entry.path()))
            .map(DirEntry::into_path)
            .collect()
    }

    fn should_descend(&self, entry: &DirEntry) -> bool {
        let name = entry.file_name().to_string_lossy();
        if name.starts_with(LOCK_FILE_PREFIX) {
            return false;
        }
        !(self.config.skip_output_dirs
            && entry.file_type().is_dir()
            && name == self.config.output_dir_name.as_str())
    }
}

/// 拡張子の大文字・小文字は区別しない
fn is_xlsx(path: &Path) -> bool {
    path.extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case(XLSX_EXTENSION))
}

fn check_root(root: &Path) -> Result<(), BatchError> {
    match std::fs::metadata(root) {
        Ok(metadata) if metadata.is_dir() => {}
        Ok(_) => return Err(BatchError::FolderMissing(root.to_path_buf())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(BatchError::FolderMissing(root.to_path_buf()))
        }
        Err(source) => {
            return Err(BatchError::FolderUnreadable {
                path: root.to_path_buf(),
                source,
            })
        }
    }

    std::fs::read_dir(root).map_err(|source| BatchError::FolderUnreadable {
        path: root.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// 既定設定でバッチ処理を実行する
///
/// 呼び出し側（フォームやCLI）からの単一の実行要求に対応します。
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsxbatch::{run_batch, TracingSink};
///
/// # fn main() -> Result<(), xlsxbatch::BatchError> {
/// let report = run_batch("data", true, true, &["Q1".to_string()], &TracingSink)?;
/// assert_eq!(report.files_found, report.files_processed);
/// # Ok(())
/// # }
/// ```
pub fn run_batch(
    root: impl AsRef<Path>,
    check_divisible: bool,
    convert_time: bool,
    custom_suffixes: &[String],
    sink: &dyn LogSink,
) -> Result<RunReport, BatchError> {
    let processor = match BatchProcessorBuilder::new()
        .check_divisible(check_divisible)
        .convert_time(convert_time)
        .with_custom_suffixes(custom_suffixes)
        .build()
    {
        Ok(processor) => processor,
        Err(e) => {
            sink.emit(LogLine::error(e.to_string()));
            return Err(e);
        }
    };
    processor.run(root, sink)
}
