//! Multi-window sliding-log admission control.
//!
//! The limiter owns nothing but its window configuration. Every check reads
//! the caller's history back from an [`EventStore`], so two processes sharing
//! a store see each other's calls.

use tracing::debug;

use crate::{CallerIdentity, EventStore, RateLimitDecision, RateWindow, StorageError, Timestamp};

/// A violated window and how long it stays violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowViolation {
    /// Size of the violated window.
    pub window_size_seconds: u64,
    /// Milliseconds until the oldest event in the window ages out.
    pub retry_after_ms: u64,
    /// Events left in the window after that.
    pub remaining_after_waiting: u64,
}

/// Verdict for a single window given the caller's events inside it.
///
/// `events` must be the events newer than `now - window`, as returned by
/// [`EventStore::events_since`]. Returns `None` when the window still has
/// room.
pub fn window_verdict(
    window: &RateWindow,
    now: Timestamp,
    events: &[Timestamp],
) -> Option<WindowViolation> {
    let count = events.len() as u64;

    if count < *window.max_count {
        return None;
    }

    // Stores return ascending order; folding keeps a skewed clock from
    // picking a newer event as the oldest.
    let oldest = events
        .iter()
        .map(|timestamp| **timestamp)
        .fold(f64::INFINITY, f64::min);

    let wait_secs = (oldest + *window.window_size_seconds as f64 - *now).max(0.0);

    // Round to whole microseconds first so float noise cannot add a millisecond.
    let wait_micros = (wait_secs * 1_000_000.0).round() as u64;

    Some(WindowViolation {
        window_size_seconds: *window.window_size_seconds,
        retry_after_ms: wait_micros.div_ceil(1_000),
        remaining_after_waiting: count - 1,
    })
}

/// Fold per-window verdicts into one decision.
///
/// Windows are independent, so the caller has to wait for the slowest one:
/// the violation with the largest wait wins. On equal waits the earlier
/// window is kept.
pub fn combine_verdicts(
    verdicts: impl IntoIterator<Item = Option<WindowViolation>>,
) -> RateLimitDecision {
    let slowest = verdicts
        .into_iter()
        .flatten()
        .fold(None::<WindowViolation>, |slowest, violation| match slowest {
            Some(current) if current.retry_after_ms >= violation.retry_after_ms => Some(current),
            _ => Some(violation),
        });

    match slowest {
        None => RateLimitDecision::Allowed,
        Some(violation) => RateLimitDecision::Rejected {
            window_size_seconds: violation.window_size_seconds,
            retry_after_ms: violation.retry_after_ms,
            remaining_after_waiting: violation.remaining_after_waiting,
        },
    }
}

/// Sliding-window rate limiter over a fixed list of windows.
///
/// # Algorithm
///
/// For each window `(duration, max_count)`:
///
/// 1. Read the caller's events newer than `now - duration`
/// 2. The window is violated if there are `max_count` or more
/// 3. A violated window clears when its oldest event ages out, i.e. after
///    `oldest + duration - now`
///
/// The call is admitted only if no window is violated. Otherwise the wait is
/// the largest of the violated windows' waits. All windows are evaluated on
/// every check; a longer window's wait may exceed a shorter one's.
///
/// # Semantics & Limitations
///
/// **Best-effort concurrency:**
/// - `check` does not reserve anything
/// - Callers that check concurrently can all be admitted before any of them
///   records, overshooting by at most the number of racers
/// - Use [`Strictness::Serialized`](crate::Strictness::Serialized) on the
///   orchestrator for exact in-process admission
///
/// **Cost:** one store read per window per check.
#[derive(Debug, Clone, Default)]
pub struct WindowedRateLimiter {
    windows: Vec<RateWindow>,
}

impl WindowedRateLimiter {
    /// Limiter enforcing `windows`. An empty list admits everything.
    pub fn new(windows: Vec<RateWindow>) -> Self {
        Self { windows }
    }

    /// Configured windows, in evaluation order.
    pub fn windows(&self) -> &[RateWindow] {
        &self.windows
    }

    /// Decide whether `caller` may make a call at `now`.
    pub async fn check<S>(
        &self,
        store: &S,
        caller: &CallerIdentity,
        now: Timestamp,
    ) -> Result<RateLimitDecision, StorageError>
    where
        S: EventStore + ?Sized,
    {
        let mut verdicts = Vec::with_capacity(self.windows.len());

        for window in &self.windows {
            let cutoff = now.minus(window.window_size_seconds.as_duration());
            let events = store.events_since(caller, cutoff).await?;

            verdicts.push(window_verdict(window, now, &events));
        }

        let decision = combine_verdicts(verdicts);

        debug!(caller = caller.short(), ?decision, "admission checked");

        Ok(decision)
    }
}
