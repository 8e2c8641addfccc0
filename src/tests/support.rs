use std::{
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use async_trait::async_trait;

use crate::{
    CallEvent, CallerIdentity, EventStore, ExternalError, MemoryEventStore, NameRequest,
    NameResponse, NameSource, RateWindow, StorageError, Timestamp,
};

pub(super) const NAMES_BODY: &str = r#"{"names":["Giulia","Marco"]}"#;

pub(super) fn caller(secret: &str) -> CallerIdentity {
    CallerIdentity::from_secret(secret)
}

pub(super) fn ts(secs: f64) -> Timestamp {
    Timestamp::from_secs_f64(secs)
}

pub(super) fn window(seconds: u64, max_count: u64) -> RateWindow {
    RateWindow::new(seconds, max_count).unwrap()
}

pub(super) async fn seed(store: &impl EventStore, caller: &CallerIdentity, timestamps: &[f64]) {
    for &secs in timestamps {
        store
            .record(&CallEvent::new(caller.clone(), ts(secs)))
            .await
            .unwrap();
    }
}

#[derive(Debug, Clone, Copy)]
pub(super) enum Behavior {
    Succeed,
    SucceedAfter(Duration),
    FailStatus,
    Hang,
}

/// Name source with a fixed behaviour that counts how often it is called.
#[derive(Debug)]
pub(super) struct StubSource {
    behavior: Behavior,
    calls: AtomicUsize,
}

impl StubSource {
    pub(super) fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NameSource for StubSource {
    async fn fetch(&self, _request: &NameRequest) -> Result<NameResponse, ExternalError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            Behavior::Succeed => NameResponse::parse(NAMES_BODY),
            Behavior::SucceedAfter(delay) => {
                tokio::time::sleep(delay).await;
                NameResponse::parse(NAMES_BODY)
            }
            Behavior::FailStatus => Err(ExternalError::Status {
                status: 503,
                body: "unavailable".to_string(),
            }),
            Behavior::Hang => std::future::pending().await,
        }
    }
}

/// Memory store whose reads or writes can be made to fail.
#[derive(Debug, Default)]
pub(super) struct FaultyStore {
    pub inner: MemoryEventStore,
    pub fail_reads: bool,
    pub fail_writes: bool,
}

#[async_trait]
impl EventStore for FaultyStore {
    async fn record(&self, event: &CallEvent) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Corrupt("disk full".to_string()));
        }

        self.inner.record(event).await
    }

    async fn events_since(
        &self,
        caller: &CallerIdentity,
        cutoff: Timestamp,
    ) -> Result<Vec<Timestamp>, StorageError> {
        if self.fail_reads {
            return Err(StorageError::Corrupt("unreadable page".to_string()));
        }

        self.inner.events_since(caller, cutoff).await
    }
}
