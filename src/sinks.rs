//! Stock implementations of the [`LogSink`] and [`ProgressSink`] ports.

use std::{
    fs::OpenOptions,
    io::Write,
    mem,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use tracing::{debug, info};

use crate::traits::{LogSink, ProgressSink};

/// File name of the append-only error log.
pub const DEFAULT_ERROR_LOG: &str = "Error Log.txt";

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Appends one line to the error file at `path`. Failures are only traced.
fn append_error_line(path: &Path, text: &str) {
    let result = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .and_then(|mut file| writeln!(file, "{}", text));
    if let Err(e) = result {
        debug!(path = %path.display(), error = %e, "could not append to error log");
    }
}

/// Forwards log lines to `tracing` at info level (target `wav_log`) and keeps the
/// error file on disk.
#[derive(Debug)]
pub struct TracingLog {
    error_file: Option<PathBuf>,
    pending: Mutex<String>,
}

impl TracingLog {
    /// Log whose error file is [`DEFAULT_ERROR_LOG`] in the working directory.
    pub fn new() -> Self {
        Self::with_error_file(DEFAULT_ERROR_LOG)
    }

    pub fn with_error_file<P: Into<PathBuf>>(path: P) -> Self {
        TracingLog {
            error_file: Some(path.into()),
            pending: Mutex::new(String::new()),
        }
    }

    /// Log that never touches the file system.
    pub fn without_error_file() -> Self {
        TracingLog {
            error_file: None,
            pending: Mutex::new(String::new()),
        }
    }

    pub fn error_file(&self) -> Option<&Path> {
        self.error_file.as_deref()
    }
}

impl Default for TracingLog {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink for TracingLog {
    fn append_line(&self, text: &str) {
        let pending = mem::take(&mut *lock(&self.pending));
        info!(target: "wav_log", "{}{}", pending, text);
    }

    fn append_string(&self, text: &str) {
        lock(&self.pending).push_str(text);
    }

    fn append_to_error_file(&self, text: &str) {
        if let Some(path) = &self.error_file {
            append_error_line(path, text);
        }
    }
}

/// Keeps every line in memory.
///
/// Suited to hosts that render the log themselves.
#[derive(Debug, Default)]
pub struct MemoryLog {
    lines: Mutex<Vec<String>>,
    pending: Mutex<String>,
    errors: Mutex<Vec<String>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Completed lines, followed by the unterminated line if there is one.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = lock(&self.lines).clone();
        let pending = lock(&self.pending);
        if !pending.is_empty() {
            lines.push(pending.clone());
        }
        lines
    }

    pub fn error_lines(&self) -> Vec<String> {
        lock(&self.errors).clone()
    }

    /// True if any line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|line| line.contains(needle))
    }

    pub fn text(&self) -> String {
        self.lines().join("\n")
    }
}

impl LogSink for MemoryLog {
    fn append_line(&self, text: &str) {
        let pending = mem::take(&mut *lock(&self.pending));
        lock(&self.lines).push(pending + text);
    }

    fn append_string(&self, text: &str) {
        lock(&self.pending).push_str(text);
    }

    fn append_to_error_file(&self, text: &str) {
        lock(&self.errors).push(text.to_string());
    }
}

/// Discards every update.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn update(&self, _label: &str, _font_hint: Option<&str>, _text: &str) {}

    fn frames(&self, _done: u64, _total: u64) {}
}

/// Emits progress as `tracing` debug events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn update(&self, label: &str, font_hint: Option<&str>, text: &str) {
        debug!(label, font_hint, "{}", text);
    }

    fn frames(&self, done: u64, total: u64) {
        debug!(done, total, "frames rendered");
    }
}
