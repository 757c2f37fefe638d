//! Structured Logging with Sensitive Data Redaction
//!
//! Leveled, field-tagged log lines for wallet operations. Secret
//! material never reaches this module; callers log entity ids and
//! redacted addresses only. Debug output is off unless explicitly
//! enabled.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

/// Global flag to enable/disable debug logging
static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

pub fn enable_debug() {
    DEBUG_ENABLED.store(true, Ordering::SeqCst);
}

pub fn disable_debug() {
    DEBUG_ENABLED.store(false, Ordering::SeqCst);
}

pub fn is_debug_enabled() -> bool {
    DEBUG_ENABLED.load(Ordering::SeqCst)
}

/// Log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

/// Structured log entry
pub struct LogEntry {
    pub level: LogLevel,
    pub module: &'static str,
    pub message: String,
    pub fields: Vec<(&'static str, String)>,
}

impl LogEntry {
    pub fn new(level: LogLevel, module: &'static str, message: impl Into<String>) -> Self {
        Self {
            level,
            module,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, key: &'static str, value: impl fmt::Display) -> Self {
        self.fields.push((key, value.to_string()));
        self
    }

    pub fn emit(self) {
        if self.level == LogLevel::Debug && !is_debug_enabled() {
            return;
        }

        let mut line = format!("[{}] {}: {}", self.level, self.module, self.message);
        for (key, value) in &self.fields {
            line.push_str(&format!(" {}={}", key, value));
        }
        eprintln!("{}", line);
    }
}

/// Log at debug level (suppressed unless enabled)
pub fn debug(module: &'static str, message: impl Into<String>) -> LogEntry {
    LogEntry::new(LogLevel::Debug, module, message)
}

/// Log at info level
pub fn info(module: &'static str, message: impl Into<String>) -> LogEntry {
    LogEntry::new(LogLevel::Info, module, message)
}

/// Log at warn level
pub fn warn(module: &'static str, message: impl Into<String>) -> LogEntry {
    LogEntry::new(LogLevel::Warn, module, message)
}

/// Redact a string for logging, keeping four characters on each end
pub fn redact(data: &str) -> String {
    if data.len() <= 8 {
        return "****".to_string();
    }

    let prefix: String = data.chars().take(4).collect();
    let suffix: String = data
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();

    format!("{}...{}", prefix, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_short_input() {
        assert_eq!(redact("short"), "****");
        assert_eq!(redact(""), "****");
    }

    #[test]
    fn test_redact_keeps_ends() {
        assert_eq!(redact("0x9858EfFD232B4033"), "0x98...4033");
    }

    #[test]
    fn test_debug_toggle() {
        disable_debug();
        assert!(!is_debug_enabled());
        enable_debug();
        assert!(is_debug_enabled());
        disable_debug();
    }

    #[test]
    fn test_entry_fields() {
        let entry = info("wallet", "account created")
            .field("id", "file_ab")
            .field("coin", "ETH");
        assert_eq!(entry.fields.len(), 2);
        entry.emit();
    }
}
