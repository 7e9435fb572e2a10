//! Log Stream Module
//!
//! 処理の進捗をユーザー向けのログ行として呼び出し元へ通知するモジュール。
//! ログの出力先は`LogSink`トレイトで抽象化され、呼び出し元が注入します。

use std::fmt;
use std::sync::mpsc::Sender;
use std::sync::Mutex;

/// ログレベル
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        };
        f.write_str(s)
    }
}

/// ログ1行分
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub level: LogLevel,
    pub message: String,
}

impl LogLine {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Error, message)
    }
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level, self.message)
    }
}

/// ログ行の出力先
///
/// 1回の実行中、ログ行は発生順に`emit`されます。
/// ワーカースレッドから呼び出せるよう`Send + Sync`を要求します。
pub trait LogSink: Send + Sync {
    fn emit(&self, line: LogLine);
}

/// クロージャをそのままシンクとして使用できます。
///
/// ```rust
/// use xlsxbatch::{LogLine, LogSink};
///
/// let sink = |line: &LogLine| eprintln!("{}", line);
/// sink.emit(LogLine::info("hello"));
/// ```
impl<F> LogSink for F
where
    F: Fn(&LogLine) + Send + Sync,
{
    fn emit(&self, line: LogLine) {
        self(&line)
    }
}

/// ログ行をメモリに蓄積するシンク
///
/// テストや、実行後にまとめてログを表示する呼び出し元向けです。
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<LogLine>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// 蓄積されたログ行のコピー
    pub fn lines(&self) -> Vec<LogLine> {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// 蓄積されたメッセージ本文のみ
    pub fn messages(&self) -> Vec<String> {
        self.lines().into_iter().map(|l| l.message).collect()
    }
}

impl LogSink for MemorySink {
    fn emit(&self, line: LogLine) {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(line);
    }
}

/// ログ行をチャネルへ送るシンク
///
/// 処理をワーカースレッドで実行し、受信側（UIループなど）でログを取り出す場合に使用します。
/// 受信側が破棄された後のログ行は黙って捨てられます。
#[derive(Debug)]
pub struct ChannelSink {
    sender: Mutex<Sender<LogLine>>,
}

impl ChannelSink {
    pub fn new(sender: Sender<LogLine>) -> Self {
        Self {
            sender: Mutex::new(sender),
        }
    }
}

impl LogSink for ChannelSink {
    fn emit(&self, line: LogLine) {
        if let Ok(sender) = self.sender.lock() {
            let _ = sender.send(line);
        }
    }
}

/// ログ行を`tracing`イベントとして出力するシンク
///
/// CLIはこのシンクを使用し、診断ログと同じsubscriberで出力します。
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn emit(&self, line: LogLine) {
        match line.level {
            LogLevel::Info => tracing::info!("{}", line.message),
            LogLevel::Warning => tracing::warn!("{}", line.message),
            LogLevel::Error => tracing::error!("{}", line.message),
        }
    }
}
