//! xlsxbatch - Batch annotation of Excel workbooks
//!
//! This crate walks a folder tree, finds the columns of each XLSX workbook whose
//! header contains a marker token (`starttime` by default), and writes an
//! annotated copy of every workbook into a `_processed` folder next to it.
//! For each matched column it can append:
//!
//! - `{column}_is_divisible_by_40`: whether each value is a multiple of 40
//! - `{column}_time_format`: the value (milliseconds) as `HH:MM:SS:mmm`
//!
//! Workbooks containing values that fail the divisibility check are written
//! with a `FALSE_` prefix. Progress is reported as a stream of log lines
//! through an injected [`LogSink`].
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use xlsxbatch::{BatchProcessorBuilder, MemorySink};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let processor = BatchProcessorBuilder::new()
//!         .check_divisible(true)
//!         .convert_time(true)
//!         .build()?;
//!
//!     let sink = MemorySink::new();
//!     let report = processor.run("recordings", &sink)?;
//!
//!     for line in sink.lines() {
//!         println!("{}", line);
//!     }
//!     println!("{} files written", report.outputs.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Running on a Worker Thread
//!
//! ```rust,no_run
//! use std::sync::mpsc;
//! use xlsxbatch::{run_batch, ChannelSink};
//!
//! let (tx, rx) = mpsc::channel();
//! let worker = std::thread::spawn(move || {
//!     let sink = ChannelSink::new(tx);
//!     let _ = run_batch("recordings", true, false, &[], &sink);
//! });
//!
//! for line in rx {
//!     println!("{}", line);
//! }
//! let _ = worker.join();
//! ```
//!
//! # Pure Building Blocks
//!
//! ```rust
//! use xlsxbatch::{derive_name, format_millis};
//!
//! assert_eq!(format_millis(61_001.0), "00:01:01:001");
//! assert_eq!(
//!     derive_name("run1", ".xlsx", 0, &["A".to_string()], true, true),
//!     "FALSE_run1_A.xlsx"
//! );
//! ```

mod builder;
mod columns;
mod error;
mod log;
mod naming;
mod output;
mod parser;
mod processor;
mod security;
mod timecode;
mod types;
mod validator;
mod walker;

// 公開API
pub use builder::{
    BatchProcessor, BatchProcessorBuilder, ProcessingConfig, DEFAULT_OUTPUT_DIR,
    MAX_CUSTOM_SUFFIXES,
};
pub use columns::{ColumnMatcher, DEFAULT_MARKER};
pub use error::BatchError;
pub use log::{ChannelSink, LogLevel, LogLine, LogSink, MemorySink, TracingSink};
pub use naming::{derive_name, OutputName, DEFAULT_SUFFIX, FAIL_PREFIX};
pub use output::{TableWriter, XlsxTableWriter};
pub use parser::{TableReader, XlsxTableReader};
pub use processor::{annotate_table, divisibility_column_name, time_column_name, FileOutcome};
pub use timecode::{format_millis, time_code, INVALID_TIME};
pub use types::{CellValue, Column, DivisibilityFlag, Table, TimeCode};
pub use validator::{any_invalid, check_divisible, DEFAULT_DIVISOR};
pub use walker::{run_batch, RunReport};
