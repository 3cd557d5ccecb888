//! Port for the structured log sink.
//!
//! Recording is fire-and-forget: implementations swallow their own failures
//! so callers never block or fail because logging did.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

/// Severity attached to a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
}

/// One structured log record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    pub severity: Severity,
    pub fields: Map<String, Value>,
    pub timestamp: DateTime<Utc>,
}

impl LogEntry {
    /// Start an entry with no fields.
    pub fn new(severity: Severity, timestamp: DateTime<Utc>) -> Self {
        Self {
            severity,
            fields: Map::new(),
            timestamp,
        }
    }

    /// Add a field, replacing any previous value under `key`.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }
}

/// Structured log sink.
pub trait AuditLog: Send + Sync {
    /// Record `entry`. Never fails outward.
    fn record(&self, entry: LogEntry);
}
