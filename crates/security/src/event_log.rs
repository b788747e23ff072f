use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use serde_json::{json, Value};
use smol_str::{format_smolstr, SmolStr};
use timestamp::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub timestamp: Timestamp,
    pub severity: Severity,
    pub message: SmolStr,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
}

struct Shared {
    capacity: usize,
    entries: Mutex<VecDeque<LogEntry>>,
}

/// Bounded in-memory record of security-relevant events, oldest evicted
/// first. Never persisted; a diagnostic window, not an audit trail.
///
/// Entries are mirrored to the `tracing` subscriber under the `security`
/// target at the matching level.
#[derive(Clone)]
pub struct SecurityLog(Arc<Shared>);

impl Default for SecurityLog {
    fn default() -> Self {
        Self::new()
    }
}

impl SecurityLog {
    pub const DEFAULT_CAPACITY: usize = 100;

    pub fn new() -> SecurityLog {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> SecurityLog {
        SecurityLog(Arc::new(Shared {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
        }))
    }

    pub fn log(&self, severity: Severity, message: impl Into<SmolStr>, detail: Option<Value>) {
        let message = message.into();

        match severity {
            Severity::Info => log::info!(target: "security", "{message}"),
            Severity::Warn => log::warn!(target: "security", "{message}"),
            Severity::Error => log::error!(target: "security", "{message}"),
        }

        let mut entries = self.0.entries.lock();

        entries.push_back(LogEntry {
            timestamp: Timestamp::now_utc(),
            severity,
            message,
            detail,
        });

        while entries.len() > self.0.capacity {
            entries.pop_front();
        }
    }

    /// Records a noteworthy event (failed login, rate-limit trip, …) at
    /// warning severity.
    pub fn security_event(&self, event: &str, detail: Option<Value>) {
        self.log(Severity::Warn, format_smolstr!("Security event: {event}"), detail);
    }

    /// Records an unexpected error with the context it occurred in.
    pub fn error(&self, error: &dyn fmt::Display, context: &str) {
        self.log(
            Severity::Error,
            format_smolstr!("Security error in {context}: {error}"),
            Some(json!({ "context": context })),
        );
    }

    /// Copies out the current entries, oldest first. The copy is detached;
    /// mutating it cannot touch the live buffer.
    pub fn snapshot(&self) -> Vec<LogEntry> {
        self.0.entries.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.0.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.entries.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_eviction() {
        let log = SecurityLog::new();

        for i in 0..105 {
            log.log(Severity::Info, format_smolstr!("entry {i}"), None);
        }

        let entries = log.snapshot();

        assert_eq!(entries.len(), 100);
        assert_eq!(entries[0].message, "entry 5");
        assert_eq!(entries[99].message, "entry 104");
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let log = SecurityLog::new();
        log.log(Severity::Info, "only", None);

        let mut first = log.snapshot();
        first.clear();

        assert_eq!(log.snapshot().len(), 1);
    }

    #[test]
    fn test_wrappers() {
        let log = SecurityLog::new();

        log.security_event("Failed login attempt", Some(json!({ "email": "a@b.co" })));
        log.error(&"boom", "sign_in");

        let entries = log.snapshot();

        assert_eq!(entries[0].severity, Severity::Warn);
        assert_eq!(entries[0].message, "Security event: Failed login attempt");
        assert_eq!(entries[0].detail, Some(json!({ "email": "a@b.co" })));

        assert_eq!(entries[1].severity, Severity::Error);
        assert_eq!(entries[1].message, "Security error in sign_in: boom");
    }

    #[test]
    fn test_shared_handles() {
        let log = SecurityLog::new();
        let clone = log.clone();

        clone.log(Severity::Warn, "via clone", None);

        assert_eq!(log.len(), 1);
    }
}
