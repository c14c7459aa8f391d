//! Per-run event log.
//!
//! Alongside `tracing` output, each run keeps an ordered list of user-facing
//! events (skipped files and the like) that can be dumped to a file.

use chrono::{DateTime, Local};
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Timestamp format of a log line.
pub const EVENT_TIME_FORMAT: &str = "%Y-%m-%d-%H:%M:%S";

/// Timestamp format in dump file names (minute granularity).
pub const DUMP_TIME_FORMAT: &str = "%Y-%m-%d-%H%M";

/// One timestamped message.
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub timestamp: DateTime<Local>,
    pub message: String,
}

impl fmt::Display for LogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.timestamp.format(EVENT_TIME_FORMAT), self.message)
    }
}

/// Ordered events of one run.
#[derive(Debug, Clone)]
pub struct RunLog {
    started_at: DateTime<Local>,
    events: Vec<LogEvent>,
}

impl Default for RunLog {
    fn default() -> Self {
        Self::new()
    }
}

impl RunLog {
    /// Start an empty log stamped with the current time.
    pub fn new() -> Self {
        Self {
            started_at: Local::now(),
            events: Vec::new(),
        }
    }

    /// Append a message timestamped now.
    pub fn push(&mut self, message: impl Into<String>) {
        self.events.push(LogEvent {
            timestamp: Local::now(),
            message: message.into(),
        });
    }

    /// When the run started.
    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    pub fn events(&self) -> &[LogEvent] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Rendered `<timestamp>: <message>` lines.
    pub fn lines(&self) -> Vec<String> {
        self.events.iter().map(ToString::to_string).collect()
    }

    /// Path of the dump file for this run inside `dir`.
    pub fn dump_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!(
            "thumbgen_{}.log",
            self.started_at.format(DUMP_TIME_FORMAT)
        ))
    }

    /// Append every line to this run's dump file in `dir`.
    ///
    /// Runs started in the same minute share a file.
    pub fn dump(&self, dir: &Path) -> std::io::Result<PathBuf> {
        let path = self.dump_path(dir);
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        for line in self.lines() {
            writeln!(file, "{line}")?;
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_event_line_format() {
        let event = LogEvent {
            timestamp: Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap(),
            message: "Not an image /tmp/a.txt".to_string(),
        };
        assert_eq!(event.to_string(), "2024-03-09-07:05:01: Not an image /tmp/a.txt");
    }

    #[test]
    fn test_push_keeps_order() {
        let mut log = RunLog::new();
        assert!(log.is_empty());
        log.push("first");
        log.push(String::from("second"));
        assert_eq!(log.len(), 2);
        assert_eq!(log.events()[0].message, "first");
        assert!(log.lines()[1].ends_with(": second"));
    }

    #[test]
    fn test_dump_writes_lines() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = RunLog::new();
        log.push("one");
        log.push("two");

        let path = log.dump(dir.path()).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("thumbgen_"));
        assert!(name.ends_with(".log"));

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(": one"));

        // Same run dumped again appends
        log.dump(dir.path()).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap().lines().count(), 4);
    }
}
