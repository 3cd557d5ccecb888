//! Append-only analytics sink held in process memory.

use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::domain::ports::{AnalyticsError, AnalyticsEvent, AnalyticsSink, TimeRange};

/// [`AnalyticsSink`] that keeps every event in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryAnalyticsSink {
    events: RwLock<Vec<AnalyticsEvent>>,
}

impl InMemoryAnalyticsSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every recorded event, oldest first.
    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.events
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl AnalyticsSink for InMemoryAnalyticsSink {
    async fn record_event(&self, event: AnalyticsEvent) -> Result<(), AnalyticsError> {
        self.events
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
        Ok(())
    }

    async fn query(&self, range: &TimeRange) -> Result<Vec<AnalyticsEvent>, AnalyticsError> {
        Ok(self
            .events
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|event| range.contains(event.occurred_at))
            .cloned()
            .collect())
    }
}
