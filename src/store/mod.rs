//! Durable, append-only ledger of dispatched calls.
//!
//! Every successful external call becomes one [`CallEvent`]. The rate limiter
//! reads these back through [`EventStore::events_since`]; it keeps no counters
//! of its own, so the store is the only source of truth for window counts.
//!
//! # Backends
//!
//! - [`SqliteEventStore`]: file-backed, survives restarts (production default)
//! - [`MemoryEventStore`]: process-scoped, for tests and dry runs
//! - `RedisEventStore`: shared Redis instance (requires the `redis` feature)

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Local, Utc};

use crate::{CallerIdentity, StorageError, Timestamp};

mod memory_event_store;
pub use memory_event_store::*;

mod sqlite_event_store;
pub use sqlite_event_store::*;

#[cfg(feature = "redis")]
mod redis_event_store;
#[cfg(feature = "redis")]
#[cfg_attr(docsrs, doc(cfg(feature = "redis")))]
pub use redis_event_store::*;

/// One successfully dispatched external call.
///
/// Only `timestamp` and `caller` matter for rate limiting; the rest is audit
/// data.
#[derive(Debug, Clone, PartialEq)]
pub struct CallEvent {
    /// When the call was dispatched.
    pub timestamp: Timestamp,
    /// Who made it.
    pub caller: CallerIdentity,
    /// Local-time RFC 3339 rendering, e.g. `2025-01-28T08:53:17+07:00`.
    pub iso_timestamp: String,
    /// Local-time rendering for people, e.g. `28 Jan 2025 08:53:17 +0700`.
    pub human_timestamp: String,
    /// Raw response body, if kept.
    pub payload: Option<String>,
}

impl CallEvent {
    /// Event for `caller` at `timestamp`, without a payload.
    pub fn new(caller: CallerIdentity, timestamp: Timestamp) -> Self {
        let (iso_timestamp, human_timestamp) = render_local(timestamp);

        Self {
            timestamp,
            caller,
            iso_timestamp,
            human_timestamp,
            payload: None,
        }
    }

    /// Attach the raw response body.
    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = Some(payload.into());
        self
    }
}

fn render_local(timestamp: Timestamp) -> (String, String) {
    let secs = timestamp.floor();
    let nanos = ((*timestamp - secs) * 1e9) as u32;

    let local = DateTime::<Utc>::from_timestamp(secs as i64, nanos)
        .unwrap_or_default()
        .with_timezone(&Local);

    (
        local.to_rfc3339(),
        local.format("%d %b %Y %H:%M:%S %z").to_string(),
    )
}

/// Append-only storage of [`CallEvent`]s.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Durably append `event`.
    ///
    /// Either the whole event becomes visible to later reads or none of it
    /// does.
    async fn record(&self, event: &CallEvent) -> Result<(), StorageError>;

    /// Timestamps of `caller`'s events strictly after `cutoff`, oldest first.
    ///
    /// Reflects every `record` that has completed before this call.
    async fn events_since(
        &self,
        caller: &CallerIdentity,
        cutoff: Timestamp,
    ) -> Result<Vec<Timestamp>, StorageError>;

    /// Release the backing resources.
    async fn close(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

#[async_trait]
impl<S> EventStore for Arc<S>
where
    S: EventStore + ?Sized,
{
    async fn record(&self, event: &CallEvent) -> Result<(), StorageError> {
        (**self).record(event).await
    }

    async fn events_since(
        &self,
        caller: &CallerIdentity,
        cutoff: Timestamp,
    ) -> Result<Vec<Timestamp>, StorageError> {
        (**self).events_since(caller, cutoff).await
    }

    async fn close(&self) -> Result<(), StorageError> {
        (**self).close().await
    }
}
