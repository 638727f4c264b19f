//! File-backed logger matching the engine's fixed on-disk record format.
//!
//! Grounded on `original_source/.../Utils/Logger.h`: a severity enum with bit
//! flags for selective enabling, and a four-line-per-entry disk format. The
//! mutex-guarded string cache and background flush mirror section 5's
//! "swap with an upload buffer and a background task writes it to disk".

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use bitflags::bitflags;
use parking_lot::Mutex;

use crate::threading::ThreadPool;

/// Warning levels from spec section 6.5.
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Optimization,
    Low,
    Medium,
    High,
    Assert,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Optimization => "OPTIMIZATION",
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Assert => "ASSERT",
        }
    }

    fn to_log_level(self) -> log::Level {
        match self {
            Severity::Info => log::Level::Info,
            Severity::Optimization | Severity::Low => log::Level::Debug,
            Severity::Medium => log::Level::Warn,
            Severity::High | Severity::Assert => log::Level::Error,
        }
    }

    fn from_log_level(level: log::Level) -> Severity {
        match level {
            log::Level::Error => Severity::High,
            log::Level::Warn => Severity::Medium,
            log::Level::Info => Severity::Info,
            log::Level::Debug | log::Level::Trace => Severity::Low,
        }
    }
}

bitflags! {
    /// Selective-enabling mask for log sinks ("bit flags for selective enabling").
    #[derive(Copy, Clone, Debug, Eq, PartialEq)]
    pub struct SeverityMask: u32 {
        const INFO         = 1 << 0;
        const OPTIMIZATION = 1 << 1;
        const LOW          = 1 << 2;
        const MEDIUM       = 1 << 3;
        const HIGH         = 1 << 4;
        const ASSERT       = 1 << 5;
        const ALL = Self::INFO.bits() | Self::OPTIMIZATION.bits() | Self::LOW.bits()
            | Self::MEDIUM.bits() | Self::HIGH.bits() | Self::ASSERT.bits();
    }
}

impl SeverityMask {
    fn contains_severity(self, s: Severity) -> bool {
        let bit = match s {
            Severity::Info => Self::INFO,
            Severity::Optimization => Self::OPTIMIZATION,
            Severity::Low => Self::LOW,
            Severity::Medium => Self::MEDIUM,
            Severity::High => Self::HIGH,
            Severity::Assert => Self::ASSERT,
        };
        self.contains(bit)
    }
}

const FLUSH_WATERMARK: usize = 32 * 1024;

struct LoggerInner {
    path: PathBuf,
    mask: SeverityMask,
    buffer: Mutex<String>,
    pool: Option<Arc<ThreadPool>>,
}

/// The engine's `log::Log` implementation. Installed once via `init`.
pub struct EngineLogger {
    inner: Arc<LoggerInner>,
}

impl EngineLogger {
    /// Formats one record per spec section 6.5 and appends it to the in-memory
    /// cache, flushing to disk on a background task once the watermark is hit.
    pub fn record(&self, severity: Severity, file: &str, line: u32, message: &str) {
        if !self.inner.mask.contains_severity(severity) {
            return;
        }
        let entry = format!(
            "Severity: {}\nFile: {}\nLine Number: {}\nThe Message: {}\n\n",
            severity.as_str(),
            file,
            line,
            message
        );

        let to_flush = {
            let mut buf = self.inner.buffer.lock();
            buf.push_str(&entry);
            if buf.len() >= FLUSH_WATERMARK {
                Some(std::mem::take(&mut *buf))
            } else {
                None
            }
        };

        if let Some(contents) = to_flush {
            self.spawn_flush(contents);
        }
    }

    /// Forces the current buffer to disk regardless of the watermark; used at
    /// shutdown so no entries are lost.
    pub fn flush(&self) {
        let contents = std::mem::take(&mut *self.inner.buffer.lock());
        if !contents.is_empty() {
            self.spawn_flush(contents);
        }
    }

    fn spawn_flush(&self, contents: String) {
        let path = self.inner.path.clone();
        let write = move || {
            if let Ok(mut f) = open_append(&path) {
                let _ = f.write_all(contents.as_bytes());
            }
        };
        match &self.inner.pool {
            Some(pool) => {
                pool.start_task("log-flush", write);
            }
            None => write(),
        }
    }
}

fn open_append(path: &PathBuf) -> std::io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

impl log::Log for EngineLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.inner
            .mask
            .contains_severity(Severity::from_log_level(metadata.level()))
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let severity = Severity::from_log_level(record.level());
        let file = record.file().unwrap_or("<unknown>");
        let line = record.line().unwrap_or(0);
        self.record(severity, file, line, &record.args().to_string());
    }

    fn flush(&self) {
        EngineLogger::flush(self);
    }
}

/// Installs the file-backed logger as the global `log` sink, and additionally
/// starts a `pretty_env_logger`-formatted console front end gated by
/// `RUST_LOG`, matching the teacher's `pretty_env_logger` dev-mode usage.
pub fn init(log_path: PathBuf, mask: SeverityMask, pool: Option<Arc<ThreadPool>>) {
    #[cfg(debug_assertions)]
    {
        let _ = pretty_env_logger::try_init();
    }

    let logger = EngineLogger {
        inner: Arc::new(LoggerInner {
            path: log_path,
            mask,
            buffer: Mutex::new(String::new()),
            pool,
        }),
    };
    // `set_boxed_logger` only succeeds once per process; subsequent calls
    // (e.g. re-init in tests) are tolerated silently.
    let _ = log::set_boxed_logger(Box::new(logger)).map(|_| log::set_max_level(log::LevelFilter::Trace));
}

/// Logs one line at the given severity using the global `log` facade, used by
/// call sites that want the exact file/line of the call (mirroring `BB_LOG`).
#[macro_export]
macro_rules! engine_log {
    ($severity:expr, $($arg:tt)*) => {{
        let level = match $severity {
            $crate::logger::Severity::Info => log::Level::Info,
            $crate::logger::Severity::Optimization | $crate::logger::Severity::Low => log::Level::Debug,
            $crate::logger::Severity::Medium => log::Level::Warn,
            $crate::logger::Severity::High | $crate::logger::Severity::Assert => log::Level::Error,
        };
        log::log!(level, $($arg)*);
    }};
}

impl fmt::Debug for EngineLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineLogger")
            .field("path", &self.inner.path)
            .finish()
    }
}
