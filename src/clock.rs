//! Time sources.
//!
//! The orchestrator reads "now" through [`Clock`] so tests can drive window
//! expiry without sleeping.

use std::fmt::Debug;

use crate::Timestamp;

/// Source of the current wall-clock time.
pub trait Clock: Send + Sync + Debug {
    /// Current time.
    fn now(&self) -> Timestamp;
}

/// Clock backed by [`std::time::SystemTime`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

#[cfg(any(test, feature = "test-helpers"))]
pub use mock::MockClock;

#[cfg(any(test, feature = "test-helpers"))]
mod mock {
    use std::{
        sync::{Arc, Mutex},
        time::Duration,
    };

    use super::Clock;
    use crate::Timestamp;

    /// Manually driven clock.
    ///
    /// Clones share the same time, so advancing one advances all of them.
    #[derive(Debug, Clone)]
    pub struct MockClock {
        current: Arc<Mutex<Timestamp>>,
    }

    impl MockClock {
        /// Clock frozen at `start`.
        pub fn new(start: Timestamp) -> Self {
            Self {
                current: Arc::new(Mutex::new(start)),
            }
        }

        /// Move time forward.
        pub fn advance(&self, duration: Duration) {
            let mut current = self
                .current
                .lock()
                .expect("MockClock mutex poisoned - a test thread panicked while holding the lock");
            *current = current.plus(duration);
        }

        /// Jump to `timestamp`.
        pub fn set(&self, timestamp: Timestamp) {
            let mut current = self
                .current
                .lock()
                .expect("MockClock mutex poisoned - a test thread panicked while holding the lock");
            *current = timestamp;
        }
    }

    impl Clock for MockClock {
        fn now(&self) -> Timestamp {
            *self
                .current
                .lock()
                .expect("MockClock mutex poisoned - a test thread panicked while holding the lock")
        }
    }
}
