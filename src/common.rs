use std::{
    ops::Deref,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use crate::NamegateError;

/// Seconds since the Unix epoch, with sub-second precision.
///
/// This is the unit every event store persists and every window is measured in.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Timestamp(f64);

impl Timestamp {
    /// Wrap a raw number of seconds since the epoch.
    pub fn from_secs_f64(secs: f64) -> Self {
        Self(secs)
    }

    /// Current wall-clock time.
    pub fn now() -> Self {
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();

        Self(since_epoch.as_secs_f64())
    }

    /// Seconds since the epoch.
    pub fn as_secs_f64(&self) -> f64 {
        self.0
    }

    /// This instant moved back by `duration`.
    pub fn minus(&self, duration: Duration) -> Self {
        Self(self.0 - duration.as_secs_f64())
    }

    /// This instant moved forward by `duration`.
    pub fn plus(&self, duration: Duration) -> Self {
        Self(self.0 + duration.as_secs_f64())
    }
}

impl Deref for Timestamp {
    type Target = f64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Length of a sliding window, in whole seconds.
///
/// Must be at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowSizeSeconds(u64);

impl WindowSizeSeconds {
    /// The window length as a [`Duration`].
    pub fn as_duration(&self) -> Duration {
        Duration::from_secs(self.0)
    }
}

impl Deref for WindowSizeSeconds {
    type Target = u64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<u64> for WindowSizeSeconds {
    type Error = NamegateError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        if value < 1 {
            Err(NamegateError::InvalidWindowSize(
                "Window size must be at least 1".to_string(),
            ))
        } else {
            Ok(Self(value))
        }
    }
}

/// Maximum number of calls admitted inside one window.
///
/// Zero is rejected at construction: a window that can never admit anything
/// has no meaningful wait time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MaxCount(u64);

impl Deref for MaxCount {
    type Target = u64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<u64> for MaxCount {
    type Error = NamegateError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        if value == 0 {
            Err(NamegateError::InvalidMaxCount(
                "Max count must be greater than 0".to_string(),
            ))
        } else {
            Ok(Self(value))
        }
    }
}

/// "No more than `max_count` calls in the trailing `window_size_seconds`."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RateWindow {
    /// Trailing duration the window looks back over.
    pub window_size_seconds: WindowSizeSeconds,
    /// Calls allowed within that duration.
    pub max_count: MaxCount,
}

impl RateWindow {
    /// Build a window from raw values, validating both.
    pub fn new(window_size_seconds: u64, max_count: u64) -> Result<Self, NamegateError> {
        Ok(Self {
            window_size_seconds: WindowSizeSeconds::try_from(window_size_seconds)?,
            max_count: MaxCount::try_from(max_count)?,
        })
    }

    /// Windows enforced by the Behind the Name API for a single key:
    /// 2 per second, 400 per hour, 4,000 per day and about 400,000 per year.
    pub fn defaults() -> Vec<RateWindow> {
        [
            (1, 2),
            (3_600, 400),
            (86_400, 4_000),
            (365 * 86_400, 400_000),
        ]
        .into_iter()
        .map(|(window_size_seconds, max_count)| RateWindow {
            window_size_seconds: WindowSizeSeconds(window_size_seconds),
            max_count: MaxCount(max_count),
        })
        .collect()
    }
}

/// Outcome of an admission check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitDecision {
    /// The call may proceed.
    Allowed,
    /// The call must wait.
    ///
    /// Describes the slowest violated window, i.e. the one the caller has to
    /// wait longest for.
    Rejected {
        /// Size of the window that determines the wait.
        window_size_seconds: u64,
        /// Milliseconds until the oldest event in that window ages out.
        retry_after_ms: u64,
        /// Calls left in that window once the oldest one has aged out.
        remaining_after_waiting: u64,
    },
}

impl RateLimitDecision {
    /// `true` for [`RateLimitDecision::Allowed`].
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitDecision::Allowed)
    }

    /// Time to wait before the next call can be admitted; zero when allowed.
    pub fn retry_after(&self) -> Duration {
        match self {
            RateLimitDecision::Allowed => Duration::ZERO,
            RateLimitDecision::Rejected { retry_after_ms, .. } => {
                Duration::from_millis(*retry_after_ms)
            }
        }
    }
}

/// How tightly admission is coupled to recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    /// Check, dispatch and record run without a shared lock.
    ///
    /// Concurrent callers with the same identity can each pass the check
    /// before any of them records, overshooting a window by at most the
    /// number of racers.
    #[default]
    Relaxed,
    /// Check, dispatch and record run under one per-caller lock, so admission
    /// is exact within a process.
    Serialized,
}
