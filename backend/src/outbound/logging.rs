//! [`AuditLog`] adapter that forwards entries to `tracing`.

use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::domain::ports::{AuditLog, LogEntry, Severity};

/// Writes audit entries as `tracing` events under the `audit` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditLog;

impl AuditLog for TracingAuditLog {
    fn record(&self, entry: LogEntry) {
        let timestamp = entry.timestamp.to_rfc3339();
        let fields = Value::Object(entry.fields);
        match entry.severity {
            Severity::Debug => debug!(target: "audit", %timestamp, %fields),
            Severity::Info => info!(target: "audit", %timestamp, %fields),
            Severity::Warning => warn!(target: "audit", %timestamp, %fields),
            Severity::Error => error!(target: "audit", %timestamp, %fields),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::rstest;

    #[rstest]
    #[case(Severity::Debug)]
    #[case(Severity::Info)]
    #[case(Severity::Warning)]
    #[case(Severity::Error)]
    fn recording_never_fails(#[case] severity: Severity) {
        TracingAuditLog.record(LogEntry::new(severity, Utc::now()).with_field("operation", "test"));
    }
}
