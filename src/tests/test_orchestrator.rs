use std::{sync::Arc, time::Duration};

use super::support::{Behavior, FaultyStore, NAMES_BODY, StubSource, caller, seed, ts, window};
use crate::{
    EventStore, ExternalError, MemoryEventStore, NameRequest, NamegateError, Outcome,
    RateLimitDecision, RateWindow, RequestOrchestrator, RequestOrchestratorOptions, Strictness,
    clock::MockClock,
};

const START: f64 = 1_000_000.0;

fn orchestrator<S: EventStore>(
    store: S,
    source: Arc<StubSource>,
    windows: Vec<RateWindow>,
    strictness: Strictness,
    clock: &MockClock,
) -> RequestOrchestrator<S, Arc<StubSource>> {
    RequestOrchestrator::with_clock(
        store,
        source,
        RequestOrchestratorOptions {
            windows,
            strictness,
            ..Default::default()
        },
        Arc::new(clock.clone()),
    )
}

#[tokio::test]
async fn success_records_exactly_one_event_at_response_time() {
    let clock = MockClock::new(ts(START));
    let store = Arc::new(MemoryEventStore::new());
    let source = Arc::new(StubSource::new(Behavior::Succeed));
    let k = caller("key");

    let orch = orchestrator(
        store.clone(),
        source.clone(),
        RateWindow::defaults(),
        Strictness::Relaxed,
        &clock,
    );

    let outcome = orch.attempt(&k, &NameRequest::default()).await.unwrap();

    let record = match outcome {
        Outcome::Success(record) => record,
        other => panic!("expected success, got {other:?}"),
    };
    assert_eq!(record.names.names, vec!["Giulia", "Marco"]);
    assert_eq!(record.raw, NAMES_BODY);
    assert_eq!(record.timestamp, ts(START));
    assert_eq!(record.request, NameRequest::default());

    assert_eq!(source.calls(), 1);
    assert_eq!(
        store
            .events_since(&k, ts(START).minus(Duration::from_secs(1)))
            .await
            .unwrap(),
        vec![ts(START)]
    );

    let audit = store.audit_log(&k);
    assert_eq!(audit.len(), 1);
    assert_eq!(audit[0].payload.as_deref(), Some(NAMES_BODY));
    assert_eq!(audit[0].iso_timestamp, record.iso_timestamp);
}

#[tokio::test]
async fn denied_attempt_neither_dispatches_nor_records() {
    let clock = MockClock::new(ts(START));
    let store = Arc::new(MemoryEventStore::new());
    let source = Arc::new(StubSource::new(Behavior::Succeed));
    let k = caller("key");
    seed(&*store, &k, &[START - 0.1, START - 0.1]).await;

    let orch = orchestrator(
        store.clone(),
        source.clone(),
        vec![window(1, 2)],
        Strictness::Relaxed,
        &clock,
    );

    let outcome = orch.attempt(&k, &NameRequest::default()).await.unwrap();

    let decision = match outcome {
        Outcome::Denied(decision) => decision,
        other => panic!("expected denial, got {other:?}"),
    };
    assert_eq!(
        decision,
        RateLimitDecision::Rejected {
            window_size_seconds: 1,
            retry_after_ms: 900,
            remaining_after_waiting: 1,
        }
    );
    assert_eq!(decision.retry_after(), Duration::from_millis(900));
    assert_eq!(source.calls(), 0);
    assert_eq!(store.len_for(&k), 2);
}

#[tokio::test]
async fn external_failure_records_nothing() {
    let clock = MockClock::new(ts(START));
    let store = Arc::new(MemoryEventStore::new());
    let source = Arc::new(StubSource::new(Behavior::FailStatus));
    let k = caller("key");

    let orch = orchestrator(
        store.clone(),
        source.clone(),
        RateWindow::defaults(),
        Strictness::Relaxed,
        &clock,
    );

    let outcome = orch.attempt(&k, &NameRequest::default()).await.unwrap();

    assert!(
        matches!(
            outcome,
            Outcome::ExternalFailure(ExternalError::Status { status: 503, .. })
        ),
        "got {outcome:?}"
    );
    assert_eq!(source.calls(), 1);
    assert_eq!(store.len_for(&k), 0);
}

#[tokio::test(start_paused = true)]
async fn hung_dispatch_times_out_without_recording() {
    let clock = MockClock::new(ts(START));
    let store = Arc::new(MemoryEventStore::new());
    let source = Arc::new(StubSource::new(Behavior::Hang));
    let k = caller("key");

    let orch = RequestOrchestrator::with_clock(
        store.clone(),
        source.clone(),
        RequestOrchestratorOptions {
            dispatch_timeout: Duration::from_secs(3),
            ..Default::default()
        },
        Arc::new(clock.clone()),
    );

    let outcome = orch.attempt(&k, &NameRequest::default()).await.unwrap();

    assert!(
        matches!(outcome, Outcome::ExternalFailure(ExternalError::Timeout(d)) if d == Duration::from_secs(3)),
        "got {outcome:?}"
    );
    assert_eq!(store.len_for(&k), 0);
}

#[tokio::test]
async fn failed_write_after_success_surfaces_unrecorded_call_with_names() {
    let clock = MockClock::new(ts(START));
    let store = Arc::new(FaultyStore {
        fail_writes: true,
        ..Default::default()
    });
    let source = Arc::new(StubSource::new(Behavior::Succeed));
    let k = caller("key");

    let orch = orchestrator(
        store.clone(),
        source.clone(),
        RateWindow::defaults(),
        Strictness::Relaxed,
        &clock,
    );

    let err = orch.attempt(&k, &NameRequest::default()).await.unwrap_err();

    let record = match err {
        NamegateError::UnrecordedCall { record, .. } => record,
        other => panic!("expected unrecorded call, got {other:?}"),
    };
    assert_eq!(record.names.names, vec!["Giulia", "Marco"]);
    assert_eq!(record.timestamp, ts(START));
    assert_eq!(source.calls(), 1);
    assert_eq!(store.inner.len_for(&k), 0);
}

#[tokio::test]
async fn failed_read_aborts_before_dispatch() {
    let clock = MockClock::new(ts(START));
    let store = Arc::new(FaultyStore {
        fail_reads: true,
        ..Default::default()
    });
    let source = Arc::new(StubSource::new(Behavior::Succeed));
    let k = caller("key");

    let orch = orchestrator(
        store.clone(),
        source.clone(),
        RateWindow::defaults(),
        Strictness::Relaxed,
        &clock,
    );

    let err = orch.attempt(&k, &NameRequest::default()).await.unwrap_err();

    assert!(matches!(err, NamegateError::Storage(_)), "got {err:?}");
    assert_eq!(source.calls(), 0);
    assert_eq!(store.inner.len_for(&k), 0);
}

#[tokio::test]
async fn admission_recovers_once_the_window_slides() {
    let clock = MockClock::new(ts(START));
    let store = Arc::new(MemoryEventStore::new());
    let source = Arc::new(StubSource::new(Behavior::Succeed));
    let k = caller("key");

    let orch = orchestrator(
        store.clone(),
        source.clone(),
        vec![window(1, 2)],
        Strictness::Relaxed,
        &clock,
    );

    for _ in 0..2 {
        let outcome = orch.attempt(&k, &NameRequest::default()).await.unwrap();
        assert!(matches!(outcome, Outcome::Success(_)), "got {outcome:?}");
    }

    let outcome = orch.attempt(&k, &NameRequest::default()).await.unwrap();
    let decision = match outcome {
        Outcome::Denied(decision) => decision,
        other => panic!("expected denial, got {other:?}"),
    };
    assert_eq!(decision.retry_after(), Duration::from_secs(1));
    assert_eq!(orch.check(&k).await.unwrap(), decision);

    clock.advance(Duration::from_secs(1));

    assert!(orch.check(&k).await.unwrap().is_allowed());
    let outcome = orch.attempt(&k, &NameRequest::default()).await.unwrap();
    assert!(matches!(outcome, Outcome::Success(_)), "got {outcome:?}");

    assert_eq!(source.calls(), 3);
    assert_eq!(store.len_for(&k), 3);
}

#[tokio::test]
async fn callers_are_limited_independently() {
    let clock = MockClock::new(ts(START));
    let store = Arc::new(MemoryEventStore::new());
    let source = Arc::new(StubSource::new(Behavior::Succeed));

    let orch = orchestrator(
        store.clone(),
        source.clone(),
        vec![window(60, 1)],
        Strictness::Relaxed,
        &clock,
    );

    let a = caller("a");
    let b = caller("b");

    assert!(matches!(
        orch.attempt(&a, &NameRequest::default()).await.unwrap(),
        Outcome::Success(_)
    ));
    assert!(matches!(
        orch.attempt(&a, &NameRequest::default()).await.unwrap(),
        Outcome::Denied(_)
    ));
    assert!(matches!(
        orch.attempt(&b, &NameRequest::default()).await.unwrap(),
        Outcome::Success(_)
    ));
}

async fn race(strictness: Strictness, racers: usize) -> (usize, usize) {
    let clock = MockClock::new(ts(START));
    let store = Arc::new(MemoryEventStore::new());
    let source = Arc::new(StubSource::new(Behavior::SucceedAfter(
        Duration::from_millis(20),
    )));
    let k = caller("shared");

    let orch = Arc::new(orchestrator(
        store.clone(),
        source.clone(),
        vec![window(60, 1)],
        strictness,
        &clock,
    ));

    let handles: Vec<_> = (0..racers)
        .map(|_| {
            let orch = orch.clone();
            let k = k.clone();
            tokio::spawn(async move { orch.attempt(&k, &NameRequest::default()).await })
        })
        .collect();

    let mut successes = 0;
    for handle in handles {
        if let Outcome::Success(_) = handle.await.unwrap().unwrap() {
            successes += 1;
        }
    }

    (successes, store.len_for(&k))
}

#[tokio::test]
async fn serialized_strictness_admits_exactly_the_window_limit() {
    let (successes, recorded) = race(Strictness::Serialized, 8).await;

    assert_eq!(successes, 1);
    assert_eq!(recorded, 1);
}

#[tokio::test]
async fn relaxed_strictness_can_overshoot_by_concurrent_racers() {
    let (successes, recorded) = race(Strictness::Relaxed, 8).await;

    assert!(successes > 1, "expected overshoot, got {successes}");
    assert!(successes <= 8);
    assert_eq!(recorded, successes);
}

#[tokio::test(start_paused = true)]
async fn cancelled_attempt_records_nothing() {
    let clock = MockClock::new(ts(START));
    let store = Arc::new(MemoryEventStore::new());
    let source = Arc::new(StubSource::new(Behavior::SucceedAfter(
        Duration::from_secs(1),
    )));
    let k = caller("key");

    let orch = orchestrator(
        store.clone(),
        source.clone(),
        RateWindow::defaults(),
        Strictness::Serialized,
        &clock,
    );

    let cancelled = tokio::time::timeout(
        Duration::from_millis(10),
        orch.attempt(&k, &NameRequest::default()),
    )
    .await;

    assert!(cancelled.is_err());
    assert_eq!(source.calls(), 1);
    assert_eq!(store.len_for(&k), 0);

    // The per-caller lock was released with the dropped future.
    let outcome = tokio::time::timeout(
        Duration::from_secs(5),
        orch.attempt(&k, &NameRequest::default()),
    )
    .await
    .unwrap()
    .unwrap();
    assert!(matches!(outcome, Outcome::Success(_)), "got {outcome:?}");
}

#[tokio::test]
async fn close_releases_the_store() {
    let clock = MockClock::new(ts(START));
    let orch = orchestrator(
        MemoryEventStore::new(),
        Arc::new(StubSource::new(Behavior::Succeed)),
        RateWindow::defaults(),
        Strictness::Relaxed,
        &clock,
    );

    assert_eq!(orch.limiter().windows().len(), 4);
    orch.close().await.unwrap();
}
