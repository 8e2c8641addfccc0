#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
pub use error::*;

mod common;
pub use common::{
    MaxCount, RateLimitDecision, RateWindow, Strictness, Timestamp, WindowSizeSeconds,
};

mod caller;
pub use caller::*;

pub mod clock;
pub use clock::{Clock, SystemClock};

pub mod store;
pub use store::{CallEvent, EventStore, MemoryEventStore, SqliteEventStore, SqliteEventStoreOptions};

mod rate_limiter;
pub use rate_limiter::*;

pub mod names;
pub use names::*;

mod orchestrator;
pub use orchestrator::*;

pub mod config;
pub use config::NamegateOptions;

pub mod cli;

pub mod report;

#[cfg(test)]
mod tests;
