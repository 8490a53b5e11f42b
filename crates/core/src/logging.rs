//! Line logger with an optional file sink.
//!
//! Lines look like `[warn] [Turn] reshuffle limit reached`. With no file
//! configured, warnings and errors fall back to stderr and everything else is
//! dropped, so the terminal front end stays clean.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

static VERBOSE: AtomicBool = AtomicBool::new(false);

static LOG_FILE: Mutex<Option<File>> = Mutex::new(None);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
        }
    }
}

/// Open (truncating) the log file. Later lines are appended to it.
pub fn init_log_file(path: impl AsRef<Path>) -> std::io::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;

    if let Ok(mut slot) = LOG_FILE.lock() {
        *slot = Some(file);
    }
    Ok(())
}

/// Close the file sink, if any.
pub fn close_log_file() {
    if let Ok(mut slot) = LOG_FILE.lock() {
        *slot = None;
    }
}

pub fn set_verbose(enabled: bool) {
    VERBOSE.store(enabled, Ordering::Relaxed);
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

pub fn format_line(level: Level, component: &str, message: &str) -> String {
    format!("[{}] [{}] {}", level.as_str(), component, message)
}

pub fn write_log(level: Level, component: &str, message: &str) {
    if level == Level::Debug && !is_verbose() {
        return;
    }
    let line = format_line(level, component, message);

    if let Ok(mut slot) = LOG_FILE.lock() {
        if let Some(file) = slot.as_mut() {
            let _ = writeln!(file, "{}", line);
            let _ = file.flush();
            return;
        }
    }

    if matches!(level, Level::Warn | Level::Error) {
        eprintln!("{}", line);
    }
}

#[macro_export]
macro_rules! log_debug {
    ($component:expr, $($arg:tt)*) => {
        if $crate::logging::is_verbose() {
            $crate::logging::write_log($crate::logging::Level::Debug, $component, &format!($($arg)*));
        }
    };
}

#[macro_export]
macro_rules! log_info {
    ($component:expr, $($arg:tt)*) => {
        $crate::logging::write_log($crate::logging::Level::Info, $component, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($component:expr, $($arg:tt)*) => {
        $crate::logging::write_log($crate::logging::Level::Warn, $component, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_error {
    ($component:expr, $($arg:tt)*) => {
        $crate::logging::write_log($crate::logging::Level::Error, $component, &format!($($arg)*))
    };
}
