use std::time::Duration;

use crate::GenerationRecord;

/// Error type for this crate.
#[derive(Debug, thiserror::Error)]
pub enum NamegateError {
    /// The event store could not be read while checking admission.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The external call succeeded but its event could not be recorded.
    ///
    /// The remote quota was consumed without a matching entry in the event
    /// store, so future windows undercount this caller. The generated names
    /// are carried along so they are not lost.
    #[error("call succeeded but was not recorded: {source}")]
    UnrecordedCall {
        /// Why the write failed.
        source: StorageError,
        /// The successful response that could not be recorded.
        record: Box<GenerationRecord>,
    },

    /// Invalid window size.
    #[error("invalid window size: {0}")]
    InvalidWindowSize(String),

    /// Invalid window max count.
    #[error("invalid max count: {0}")]
    InvalidMaxCount(String),

    /// Invalid number of names requested.
    #[error("invalid name count: {0}")]
    InvalidNameCount(String),

    /// Invalid gender code.
    #[error("invalid gender: {0}")]
    InvalidGender(String),

    /// Invalid Redis key.
    #[cfg(feature = "redis")]
    #[error("invalid redis key: {0}")]
    InvalidRedisKey(String),

    /// No API key was supplied on the command line or in the environment.
    #[error("API_KEY not found in --key or .env file")]
    MissingApiKey,

    /// The HTTP client could not be built.
    #[error("http client error: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Failure of the durable event store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// SQLite error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] sqlx::Error),

    /// Redis error.
    #[cfg(feature = "redis")]
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Filesystem error while preparing the store.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored row could not be interpreted.
    #[error("corrupt event: {0}")]
    Corrupt(String),
}

/// Failure of the wrapped name-generation API.
///
/// None of these consume quota: a call that ends here is never recorded.
#[derive(Debug, thiserror::Error)]
pub enum ExternalError {
    /// The call did not complete within the dispatch timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Network-level failure.
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// Non-success HTTP status.
    #[error("unexpected status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// The API answered with an application-level error object.
    #[error("api error {code}: {message}")]
    Api {
        /// `error_code` reported by the API.
        code: i64,
        /// `error` message reported by the API.
        message: String,
    },

    /// The response body was not the expected JSON.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}
