use async_trait::async_trait;
use dashmap::DashMap;

use crate::{CallEvent, CallerIdentity, EventStore, StorageError, Timestamp};

/// In-process event store.
///
/// Keeps each caller's events in a timestamp-ordered `Vec` inside a
/// [`DashMap`], so different callers never contend on the same lock.
///
/// # Semantics & Limitations
///
/// - **Not durable:** everything is lost when the process exits
/// - **Out-of-order tolerant:** an event older than the newest one is
///   inserted at its sorted position rather than appended
/// - **Unbounded:** events are never pruned
#[derive(Debug, Default)]
pub struct MemoryEventStore {
    events: DashMap<CallerIdentity, Vec<CallEvent>>,
}

impl MemoryEventStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of events recorded for `caller`.
    pub fn len_for(&self, caller: &CallerIdentity) -> usize {
        self.events.get(caller).map_or(0, |events| events.len())
    }

    /// Copy of every event recorded for `caller`, oldest first.
    pub fn audit_log(&self, caller: &CallerIdentity) -> Vec<CallEvent> {
        self.events
            .get(caller)
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn record(&self, event: &CallEvent) -> Result<(), StorageError> {
        let mut events = self.events.entry(event.caller.clone()).or_default();

        let at = events.partition_point(|existing| existing.timestamp <= event.timestamp);
        events.insert(at, event.clone());

        Ok(())
    }

    async fn events_since(
        &self,
        caller: &CallerIdentity,
        cutoff: Timestamp,
    ) -> Result<Vec<Timestamp>, StorageError> {
        let Some(events) = self.events.get(caller) else {
            return Ok(Vec::new());
        };

        let from = events.partition_point(|event| event.timestamp <= cutoff);

        Ok(events[from..].iter().map(|event| event.timestamp).collect())
    }
}
