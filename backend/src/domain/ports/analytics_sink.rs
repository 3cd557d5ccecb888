//! Port for the append-only analytics sink.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use super::define_port_error;

define_port_error! {
    /// Analytics sink failures.
    pub enum AnalyticsError {
        /// The sink rejected or could not store the event.
        Write { message: String } => "analytics write failed: {message}",
        /// The sink could not answer a query.
        Query { message: String } => "analytics query failed: {message}",
        /// Range start was after its end.
        InvalidRange => "analytics range start must not be after its end",
    }
}

/// A named event with free-form properties.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsEvent {
    pub name: String,
    pub properties: Map<String, Value>,
    pub occurred_at: DateTime<Utc>,
}

impl AnalyticsEvent {
    /// Event with no properties.
    pub fn new(name: impl Into<String>, occurred_at: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            properties: Map::new(),
            occurred_at,
        }
    }

    /// Add a property.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

/// Half-open time window `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeRange {
    /// Build a range, rejecting `start > end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, AnalyticsError> {
        if start > end {
            return Err(AnalyticsError::invalid_range());
        }
        Ok(Self { start, end })
    }

    /// Whether `instant` falls inside the range.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

#[async_trait]
pub trait AnalyticsSink: Send + Sync {
    /// Append an event.
    async fn record_event(&self, event: AnalyticsEvent) -> Result<(), AnalyticsError>;

    /// Events that occurred inside `range`, in recording order.
    async fn query(&self, range: &TimeRange) -> Result<Vec<AnalyticsEvent>, AnalyticsError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use rstest::rstest;

    #[rstest]
    fn range_is_half_open() {
        let start = Utc::now();
        let end = start + TimeDelta::minutes(5);
        let range = TimeRange::new(start, end).expect("valid range");
        assert!(range.contains(start));
        assert!(range.contains(end - TimeDelta::seconds(1)));
        assert!(!range.contains(end));
        assert!(!range.contains(start - TimeDelta::seconds(1)));
    }

    #[rstest]
    fn inverted_range_is_rejected() {
        let end = Utc::now();
        let start = end + TimeDelta::seconds(1);
        assert_eq!(TimeRange::new(start, end), Err(AnalyticsError::InvalidRange));
    }
}
