//! Check, dispatch, record.

use std::{sync::Arc, time::Duration};

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::{
    CallEvent, CallerIdentity, Clock, EventStore, ExternalError, GeneratedNames, NameRequest,
    NameSource, NamegateError, RateLimitDecision, RateWindow, StorageError, Strictness,
    SystemClock, Timestamp, WindowedRateLimiter,
};

/// Log target for calls that consumed remote quota without being recorded.
pub const AUDIT_TARGET: &str = "namegate::audit";

/// Configuration for [`RequestOrchestrator`].
#[derive(Clone, Debug)]
pub struct RequestOrchestratorOptions {
    /// Windows enforced before every dispatch.
    pub windows: Vec<RateWindow>,
    /// Upper bound on a single external call.
    pub dispatch_timeout: Duration,
    /// Whether check and record share a per-caller lock.
    pub strictness: Strictness,
}

impl Default for RequestOrchestratorOptions {
    fn default() -> Self {
        Self {
            windows: RateWindow::defaults(),
            dispatch_timeout: Duration::from_secs(12),
            strictness: Strictness::default(),
        }
    }
}

/// A successful generation, as shown to the user and written to the audit log.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRecord {
    /// The request that produced it.
    pub request: NameRequest,
    /// Parsed names.
    pub names: GeneratedNames,
    /// Raw response body.
    pub raw: String,
    /// When the call was recorded.
    pub timestamp: Timestamp,
    /// Local-time RFC 3339 rendering of `timestamp`.
    pub iso_timestamp: String,
    /// Local-time human rendering of `timestamp`.
    pub human_timestamp: String,
}

/// Result of one [`RequestOrchestrator::attempt`].
#[derive(Debug)]
pub enum Outcome {
    /// The call was admitted, succeeded and was recorded.
    Success(GenerationRecord),
    /// A window is full; nothing was dispatched or recorded.
    Denied(RateLimitDecision),
    /// The call was dispatched but failed; nothing was recorded.
    ExternalFailure(ExternalError),
}

/// Coordinates the limiter, the external call and the event store.
///
/// # Invariants
///
/// - A denied attempt never dispatches and never writes
/// - A failed, timed-out or cancelled dispatch never writes
/// - A successful dispatch writes exactly one [`CallEvent`], stamped with the
///   time the response arrived
///
/// # Concurrency
///
/// With [`Strictness::Relaxed`] the three steps are not one critical section;
/// see [`WindowedRateLimiter`] for the resulting overshoot bound. With
/// [`Strictness::Serialized`] a per-caller async mutex is held from the check
/// until the record completes, which makes admission exact for callers in
/// this process. Other processes sharing the store are still only loosely
/// coordinated.
pub struct RequestOrchestrator<S, N> {
    store: S,
    source: N,
    limiter: WindowedRateLimiter,
    clock: Arc<dyn Clock>,
    dispatch_timeout: Duration,
    strictness: Strictness,
    caller_locks: DashMap<CallerIdentity, Arc<Mutex<()>>>,
}

impl<S, N> RequestOrchestrator<S, N>
where
    S: EventStore,
    N: NameSource,
{
    /// Orchestrator reading time from the system clock.
    pub fn new(store: S, source: N, options: RequestOrchestratorOptions) -> Self {
        Self::with_clock(store, source, options, Arc::new(SystemClock))
    }

    /// Orchestrator reading time from `clock`.
    pub fn with_clock(
        store: S,
        source: N,
        options: RequestOrchestratorOptions,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            source,
            limiter: WindowedRateLimiter::new(options.windows),
            clock,
            dispatch_timeout: options.dispatch_timeout,
            strictness: options.strictness,
            caller_locks: DashMap::new(),
        }
    }

    /// The event store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The limiter.
    pub fn limiter(&self) -> &WindowedRateLimiter {
        &self.limiter
    }

    /// Admission preview for `caller` right now, without dispatching.
    pub async fn check(&self, caller: &CallerIdentity) -> Result<RateLimitDecision, StorageError> {
        self.limiter
            .check(&self.store, caller, self.clock.now())
            .await
    }

    /// Try to generate names for `caller`.
    ///
    /// Denials and external failures are ordinary [`Outcome`]s. Errors are
    /// reserved for the event store: a failed read while checking, or a
    /// failed write after the external call already succeeded
    /// ([`NamegateError::UnrecordedCall`]).
    pub async fn attempt(
        &self,
        caller: &CallerIdentity,
        request: &NameRequest,
    ) -> Result<Outcome, NamegateError> {
        let _guard = match self.strictness {
            Strictness::Relaxed => None,
            Strictness::Serialized => Some(self.caller_lock(caller).lock_owned().await),
        };

        let decision = self
            .limiter
            .check(&self.store, caller, self.clock.now())
            .await?;

        if !decision.is_allowed() {
            debug!(caller = caller.short(), ?decision, "attempt denied");
            return Ok(Outcome::Denied(decision));
        }

        let response =
            match tokio::time::timeout(self.dispatch_timeout, self.source.fetch(request)).await {
                Ok(Ok(response)) => response,
                Ok(Err(e)) => {
                    warn!(caller = caller.short(), error = %e, "external call failed");
                    return Ok(Outcome::ExternalFailure(e));
                }
                Err(_) => {
                    warn!(
                        caller = caller.short(),
                        timeout = ?self.dispatch_timeout,
                        "external call timed out"
                    );
                    return Ok(Outcome::ExternalFailure(ExternalError::Timeout(
                        self.dispatch_timeout,
                    )));
                }
            };

        let event =
            CallEvent::new(caller.clone(), self.clock.now()).with_payload(response.raw.clone());

        let record = GenerationRecord {
            request: request.clone(),
            names: response.names,
            raw: response.raw,
            timestamp: event.timestamp,
            iso_timestamp: event.iso_timestamp.clone(),
            human_timestamp: event.human_timestamp.clone(),
        };

        if let Err(source) = self.store.record(&event).await {
            error!(
                target: AUDIT_TARGET,
                caller = caller.short(),
                timestamp = *event.timestamp,
                error = %source,
                "external call consumed quota but was not recorded; windows now undercount this caller"
            );

            return Err(NamegateError::UnrecordedCall {
                source,
                record: Box::new(record),
            });
        }

        info!(caller = caller.short(), timestamp = *event.timestamp, "call recorded");

        Ok(Outcome::Success(record))
    }

    /// Release the event store.
    pub async fn close(self) -> Result<(), StorageError> {
        self.store.close().await
    }

    fn caller_lock(&self, caller: &CallerIdentity) -> Arc<Mutex<()>> {
        self.caller_locks.entry(caller.clone()).or_default().clone()
    }
}
