//! Logging pipeline for the tailoring editor.
//!
//! `LogCollector` is installed as the `log` crate's global logger. Every
//! record is timestamped, kept in a bounded in-memory ring for the UI's
//! diagnostics view and appended to disk:
//!
//! ```text
//! log::info!/warn!/...        log_history!
//!        |                         |
//!        +-----------+-------------+
//!                    v
//!              [LogCollector]
//!              |     |      \
//!              v     v       v
//!         recent   logs/full.log   logs/history.log
//!         (ring)                   (target "history" only)
//! ```
//!
//! Writes are synchronous; the editor runs on a single UI thread and log
//! volume is a handful of lines per user action.

use chrono::Local;
use log::{Log, Metadata, Record};
use std::collections::VecDeque;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Log target used for undo-history events
pub const HISTORY_TARGET: &str = "history";

/// Lines kept in memory by default
pub const DEFAULT_RING_CAPACITY: usize = 512;

/// Log an undo-history event (push, merge, undo, redo).
#[macro_export]
macro_rules! log_history {
    ($($arg:tt)*) => {{
        let msg = format!($($arg)*);
        log::info!(target: "history", "{}", msg);
    }}
}

/// Get the global logs path relative to the current working directory: ./logs
pub fn get_global_logs_path() -> Result<PathBuf, String> {
    let cwd = std::env::current_dir()
        .map_err(|e| format!("Failed to get current working directory: {}", e))?;
    Ok(cwd.join("logs"))
}

/// Ensure the global logs directory exists
pub fn ensure_logs_dir_exists(log_dir: &Path) -> Result<(), String> {
    std::fs::create_dir_all(log_dir)
        .map_err(|e| format!("Failed to create logs directory: {}", e))?;
    Ok(())
}

/// A formatted log line
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogLine {
    pub timestamp: String,
    pub level: log::Level,
    pub target: String,
    pub message: String,
}

impl LogLine {
    pub fn new(level: log::Level, target: &str, message: String) -> Self {
        LogLine {
            timestamp: Local::now().format("%H:%M:%S%.3f").to_string(),
            level,
            target: target.to_string(),
            message,
        }
    }

    pub fn is_history(&self) -> bool {
        self.target == HISTORY_TARGET
    }

    /// `[HH:MM:SS.mmm] [LEVEL] message`
    pub fn render(&self) -> String {
        format!("[{}] [{}] {}", self.timestamp, self.level, self.message)
    }
}

/// Logger writing to the ring buffer and the log files.
#[derive(Clone)]
pub struct LogCollector {
    log_dir: Option<PathBuf>,
    recent: Arc<Mutex<VecDeque<LogLine>>>,
    capacity: usize,
    max_level: log::LevelFilter,
}

impl LogCollector {
    /// Collector persisting to `log_dir` (created if missing).
    pub fn new(log_dir: PathBuf, max_level: log::LevelFilter) -> Result<Self, String> {
        ensure_logs_dir_exists(&log_dir)?;
        Ok(LogCollector {
            log_dir: Some(log_dir),
            recent: Arc::new(Mutex::new(VecDeque::new())),
            capacity: DEFAULT_RING_CAPACITY,
            max_level,
        })
    }

    /// Collector that only keeps lines in memory.
    pub fn in_memory(max_level: log::LevelFilter) -> Self {
        LogCollector {
            log_dir: None,
            recent: Arc::new(Mutex::new(VecDeque::new())),
            capacity: DEFAULT_RING_CAPACITY,
            max_level,
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    pub fn max_level(&self) -> log::LevelFilter {
        self.max_level
    }

    /// Install as the global logger. Fails if one is already set.
    pub fn install(&self) -> Result<(), log::SetLoggerError> {
        log::set_boxed_logger(Box::new(self.clone()))?;
        log::set_max_level(self.max_level);
        Ok(())
    }

    pub fn full_log_path(&self) -> Option<PathBuf> {
        self.log_dir.as_ref().map(|d| d.join("full.log"))
    }

    pub fn history_log_path(&self) -> Option<PathBuf> {
        self.log_dir.as_ref().map(|d| d.join("history.log"))
    }

    /// Snapshot of the in-memory ring, oldest first
    pub fn recent_lines(&self) -> Vec<LogLine> {
        match self.recent.lock() {
            Ok(ring) => ring.iter().cloned().collect(),
            Err(poisoned) => poisoned.into_inner().iter().cloned().collect(),
        }
    }

    pub fn push(&self, line: LogLine) {
        self.persist(&line);

        let mut ring = match self.recent.lock() {
            Ok(ring) => ring,
            Err(poisoned) => poisoned.into_inner(),
        };
        while ring.len() >= self.capacity {
            ring.pop_front();
        }
        ring.push_back(line);
    }

    fn persist(&self, line: &LogLine) {
        let Some(full) = self.full_log_path() else {
            return;
        };
        let rendered = line.render();
        if let Err(e) = append_line(&full, &rendered) {
            eprintln!("[LogCollector] Failed to write {}: {}", full.display(), e);
        }
        if line.is_history() {
            if let Some(history) = self.history_log_path() {
                if let Err(e) = append_line(&history, &rendered) {
                    eprintln!("[LogCollector] Failed to write {}: {}", history.display(), e);
                }
            }
        }
    }
}

impl Log for LogCollector {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.push(LogLine::new(
                record.level(),
                record.target(),
                record.args().to_string(),
            ));
        }
    }

    fn flush(&self) {
        // every line is written through on push
    }
}

fn append_line(path: &Path, line: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_history_lines_go_to_both_files() {
        let temp_dir = TempDir::new().unwrap();
        let collector =
            LogCollector::new(temp_dir.path().join("logs"), log::LevelFilter::Info).unwrap();

        collector.push(LogLine::new(log::Level::Info, "xccdf_tailor", "opened".to_string()));
        collector.push(LogLine::new(
            log::Level::Info,
            HISTORY_TARGET,
            "push: select 'rule_x'".to_string(),
        ));

        let full = std::fs::read_to_string(collector.full_log_path().unwrap()).unwrap();
        let history = std::fs::read_to_string(collector.history_log_path().unwrap()).unwrap();
        assert_eq!(full.lines().count(), 2);
        assert_eq!(history.lines().count(), 1);
        assert!(history.contains("select 'rule_x'"));
    }

    #[test]
    fn test_ring_is_bounded() {
        let collector = LogCollector::in_memory(log::LevelFilter::Debug).with_capacity(3);
        for i in 0..5 {
            collector.push(LogLine::new(log::Level::Info, "t", format!("line {}", i)));
        }
        let lines = collector.recent_lines();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].message, "line 2");
        assert_eq!(lines[2].message, "line 4");
    }

    #[test]
    fn test_level_filter() {
        let collector = LogCollector::in_memory(log::LevelFilter::Info);
        let debug = Metadata::builder().level(log::Level::Debug).build();
        let warn = Metadata::builder().level(log::Level::Warn).build();
        assert!(!collector.enabled(&debug));
        assert!(collector.enabled(&warn));
    }
}
