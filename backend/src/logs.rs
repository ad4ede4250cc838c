//! Import progress logging.
//!
//! Every entry is printed to stderr and broadcast to subscribers. A host
//! embedding the pipeline subscribes before an import and [`drain`]s the
//! receiver afterwards; the CLI does this for `--log-json`.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::{self, error::TryRecvError, Receiver, Sender};

/// Entries kept for a subscriber that has not drained yet.
const CHANNEL_CAPACITY: usize = 1024;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl LogLevel {
    fn marker(self) -> &'static str {
        match self {
            LogLevel::Info => "",
            LogLevel::Success => "✓ ",
            LogLevel::Warning => "⚠️  ",
            LogLevel::Error => "❌ ",
        }
    }
}

/// One progress line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    /// Nesting depth under the previous stage line
    #[serde(default)]
    pub indent: u8,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            indent: 0,
        }
    }

    pub fn indented(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }

    /// Text form printed to stderr.
    pub fn render(&self) -> String {
        format!(
            "{}   {}{}",
            "   ".repeat(self.indent as usize),
            self.level.marker(),
            self.message
        )
    }
}

/// Process-wide progress log
pub static LOG_BROADCASTER: Lazy<LogBroadcaster> = Lazy::new(LogBroadcaster::new);

pub struct LogBroadcaster {
    sender: Sender<LogEntry>,
}

impl LogBroadcaster {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn log(&self, entry: LogEntry) {
        eprintln!("{}", entry.render());
        // Sending fails only when nobody subscribed
        let _ = self.sender.send(entry);
    }

    pub fn subscribe(&self) -> Receiver<LogEntry> {
        self.sender.subscribe()
    }
}

impl Default for LogBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

/// Take every entry queued on `receiver` without blocking.
///
/// Entries lost to an overflowing channel are replaced by one warning
/// saying how many were skipped.
pub fn drain(receiver: &mut Receiver<LogEntry>) -> Vec<LogEntry> {
    let mut entries = Vec::new();
    loop {
        match receiver.try_recv() {
            Ok(entry) => entries.push(entry),
            Err(TryRecvError::Lagged(skipped)) => entries.push(LogEntry::new(
                LogLevel::Warning,
                format!("{} log entries skipped", skipped),
            )),
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
        }
    }
    entries
}

fn emit(level: LogLevel, message: impl Into<String>, indent: u8) {
    LOG_BROADCASTER.log(LogEntry::new(level, message).indented(indent));
}

pub fn log_info(msg: impl Into<String>) {
    emit(LogLevel::Info, msg, 0);
}

pub fn log_success(msg: impl Into<String>) {
    emit(LogLevel::Success, msg, 0);
}

pub fn log_warning(msg: impl Into<String>) {
    emit(LogLevel::Warning, msg, 0);
}

pub fn log_error(msg: impl Into<String>) {
    emit(LogLevel::Error, msg, 0);
}

pub fn log_info_indent(msg: impl Into<String>, indent: u8) {
    emit(LogLevel::Info, msg, indent);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_returns_entries_in_order() {
        let broadcaster = LogBroadcaster::new();
        let mut rx = broadcaster.subscribe();

        broadcaster.log(LogEntry::new(LogLevel::Info, "Validating rows..."));
        broadcaster.log(LogEntry::new(LogLevel::Warning, "3 rows rejected").indented(1));

        let entries = drain(&mut rx);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].message, "Validating rows...");
        assert_eq!(entries[1].level, LogLevel::Warning);
        assert_eq!(entries[1].indent, 1);
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn test_drain_reports_overflow() {
        let broadcaster = LogBroadcaster::new();
        let mut rx = broadcaster.subscribe();

        for i in 0..CHANNEL_CAPACITY + 5 {
            broadcaster.log(LogEntry::new(LogLevel::Info, format!("row {}", i)));
        }

        let entries = drain(&mut rx);
        assert_eq!(entries[0].level, LogLevel::Warning);
        assert_eq!(entries[0].message, "5 log entries skipped");
        assert_eq!(entries.len(), CHANNEL_CAPACITY + 1);
    }

    #[test]
    fn test_log_without_subscribers() {
        LogBroadcaster::default().log(LogEntry::new(LogLevel::Info, "nobody listening"));
    }

    #[test]
    fn test_render_and_json_shape() {
        let entry = LogEntry::new(LogLevel::Success, "done").indented(1);
        assert_eq!(entry.render(), "      ✓ done");

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["level"], "success");
        assert_eq!(json["message"], "done");
        assert_eq!(json["indent"], 1);
    }
}
