//! File logger for roadmap diagnostics.
//!
//! Log levels:
//! - ERROR: failures of the CLI or configuration layer
//! - WARN: degraded layout results (cycles, dangling dependencies, rejected moves)
//! - INFO: committed moves and high-level command notifications
//! - DEBUG: per-call layout summaries
//! - TRACE: per-task column resolution
//!
//! Nothing is written until one of the `init*` functions has run, so library
//! callers that never initialise logging get a silent engine. Debug mode is
//! enabled with `--debug` or `ROADMAP_DEBUG=1`.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::OnceLock;

static LOG_PATH: OnceLock<PathBuf> = OnceLock::new();
static LOG_LEVEL: AtomicU8 = AtomicU8::new(LogLevel::Info as u8);

/// Log levels for filtering messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        }
    }

    fn from_u8(v: u8) -> Self {
        match v {
            0 => LogLevel::Error,
            1 => LogLevel::Warn,
            2 => LogLevel::Info,
            3 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }
}

/// Initialize logging to ~/.roadmap/roadmap.log
pub fn init() {
    init_with_debug(false);
}

/// Initialize logging to the default location with explicit debug mode.
pub fn init_with_debug(debug: bool) {
    if let Some(dir) = dirs::home_dir().map(|h| h.join(".roadmap")) {
        let _ = std::fs::create_dir_all(&dir);
        init_at(&dir.join("roadmap.log"), debug);
    } else {
        set_level(level_for(debug));
    }
}

/// Initialize logging to an explicit file, truncating it.
///
/// The path can only be set once per process; later calls only adjust the level.
pub fn init_at(path: &Path, debug: bool) {
    set_level(level_for(debug));
    if LOG_PATH.get().is_none() {
        let _ = std::fs::write(path, "");
        LOG_PATH.set(path.to_path_buf()).ok();
    }
}

fn level_for(debug: bool) -> LogLevel {
    let env_debug = std::env::var("ROADMAP_DEBUG")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    if debug || env_debug {
        LogLevel::Debug
    } else {
        LogLevel::Info
    }
}

/// Path of the active log file, if logging was initialised.
pub fn log_path() -> Option<&'static Path> {
    LOG_PATH.get().map(PathBuf::as_path)
}

/// Set the minimum log level for output.
pub fn set_level(level: LogLevel) {
    LOG_LEVEL.store(level as u8, Ordering::SeqCst);
}

/// Get the current log level.
pub fn get_level() -> LogLevel {
    LogLevel::from_u8(LOG_LEVEL.load(Ordering::Relaxed))
}

/// Log a message at the specified level.
pub fn log_at(level: LogLevel, msg: &str) {
    if level > get_level() {
        return;
    }

    if let Some(path) = LOG_PATH.get() {
        if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
            let timestamp = chrono::Local::now().format("%H:%M:%S%.3f");
            let _ = writeln!(file, "[{}] [{}] {}", timestamp, level.as_str(), msg);
        }
    }
}

pub fn error(msg: &str) {
    log_at(LogLevel::Error, msg);
}

pub fn warn(msg: &str) {
    log_at(LogLevel::Warn, msg);
}

pub fn info(msg: &str) {
    log_at(LogLevel::Info, msg);
}

pub fn debug(msg: &str) {
    log_at(LogLevel::Debug, msg);
}

pub fn trace(msg: &str) {
    log_at(LogLevel::Trace, msg);
}

/// Log at INFO level.
#[macro_export]
macro_rules! rlog {
    ($($arg:tt)*) => {
        $crate::log::info(&format!($($arg)*))
    };
}

#[macro_export]
macro_rules! rlog_error {
    ($($arg:tt)*) => {
        $crate::log::error(&format!($($arg)*))
    };
}

#[macro_export]
macro_rules! rlog_warn {
    ($($arg:tt)*) => {
        $crate::log::warn(&format!($($arg)*))
    };
}

/// Log at DEBUG level (only written in debug mode).
#[macro_export]
macro_rules! rlog_debug {
    ($($arg:tt)*) => {
        $crate::log::debug(&format!($($arg)*))
    };
}

#[macro_export]
macro_rules! rlog_trace {
    ($($arg:tt)*) => {
        $crate::log::trace(&format!($($arg)*))
    };
}
