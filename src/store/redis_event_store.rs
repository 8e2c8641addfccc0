use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;
use dashmap::DashMap;
use redis::aio::ConnectionManager;

use crate::{CallEvent, CallerIdentity, EventStore, NamegateError, StorageError, Timestamp};

/// A validated newtype for Redis key prefixes.
///
/// This is a string with the following constraints:
/// - Must not be empty
/// - Must not be longer than 255 bytes
/// - Must not contain colons
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RedisKey(Arc<str>);

impl RedisKey {
    /// The prefix used when none is configured.
    pub fn default_prefix() -> Self {
        Self(Arc::from("namegate"))
    }
}

impl Deref for RedisKey {
    type Target = Arc<str>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<String> for RedisKey {
    type Error = NamegateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            Err(NamegateError::InvalidRedisKey(
                "Redis key must not be empty".to_string(),
            ))
        } else if value.len() > 255 {
            Err(NamegateError::InvalidRedisKey(
                "Redis key must not be longer than 255 characters".to_string(),
            ))
        } else if value.contains(':') {
            Err(NamegateError::InvalidRedisKey(
                "Redis key must not contain colons".to_string(),
            ))
        } else {
            Ok(Self(Arc::from(value)))
        }
    }
}

/// Configuration for [`RedisEventStore`].
///
/// # Requirements
///
/// - **Redis version:** >= 6.2.0 (`ZRANGE ... BYSCORE`)
#[derive(Clone)]
pub struct RedisEventStoreOptions {
    /// Connection manager from the `redis` crate.
    pub connection_manager: ConnectionManager,
    /// Prefix for every key. Defaults to `"namegate"`.
    ///
    /// Keys look like `<prefix>:<fingerprint>:e` (events) and
    /// `<prefix>:<fingerprint>:a` (audit).
    pub prefix: Option<RedisKey>,
}

#[derive(Debug)]
struct CallerKeys {
    events: Arc<str>,
    audit: Arc<str>,
    sequence: Arc<str>,
}

/// Event store backed by Redis.
///
/// Each caller owns a sorted set of event members scored by timestamp, a hash
/// of audit records keyed by the same members, and a sequence counter that
/// keeps members unique when two events share a timestamp. A single Lua
/// script writes all three, so a record is atomic.
///
/// Durability is whatever the Redis server is configured for (AOF or RDB).
pub struct RedisEventStore {
    connection_manager: ConnectionManager,
    prefix: RedisKey,
    keys: DashMap<CallerIdentity, Arc<CallerKeys>>,
}

impl RedisEventStore {
    /// Build a store from `options`.
    pub fn new(options: RedisEventStoreOptions) -> Self {
        Self {
            connection_manager: options.connection_manager,
            prefix: options.prefix.unwrap_or_else(RedisKey::default_prefix),
            keys: DashMap::new(),
        }
    }

    fn keys_for(&self, caller: &CallerIdentity) -> Arc<CallerKeys> {
        if let Some(keys) = self.keys.get(caller) {
            return keys.clone();
        }

        let key = |suffix: &str| -> Arc<str> {
            Arc::from(format!("{}:{}:{}", **self.prefix, &**caller, suffix))
        };

        self.keys
            .entry(caller.clone())
            .or_insert_with(|| {
                Arc::new(CallerKeys {
                    events: key("e"),
                    audit: key("a"),
                    sequence: key("s"),
                })
            })
            .clone()
    }
}

#[async_trait]
impl EventStore for RedisEventStore {
    async fn record(&self, event: &CallEvent) -> Result<(), StorageError> {
        let script = redis::Script::new(
            r#"
            local events_key = KEYS[1]
            local audit_key = KEYS[2]
            local sequence_key = KEYS[3]

            local timestamp = ARGV[1]
            local audit = ARGV[2]

            local sequence = redis.call("INCR", sequence_key)
            local member = timestamp .. ":" .. sequence

            redis.call("ZADD", events_key, timestamp, member)
            redis.call("HSET", audit_key, member, audit)

            return sequence
        "#,
        );

        let audit = serde_json::json!({
            "iso_timestamp": event.iso_timestamp,
            "human_timestamp": event.human_timestamp,
            "response_json": event.payload,
        })
        .to_string();

        let keys = self.keys_for(&event.caller);
        let mut connection_manager = self.connection_manager.clone();

        let _sequence: u64 = script
            .key(&*keys.events)
            .key(&*keys.audit)
            .key(&*keys.sequence)
            .arg((*event.timestamp).to_string())
            .arg(audit)
            .invoke_async(&mut connection_manager)
            .await?;

        Ok(())
    }

    async fn events_since(
        &self,
        caller: &CallerIdentity,
        cutoff: Timestamp,
    ) -> Result<Vec<Timestamp>, StorageError> {
        let keys = self.keys_for(caller);
        let mut connection_manager = self.connection_manager.clone();

        let entries: Vec<(String, f64)> = redis::cmd("ZRANGE")
            .arg(&*keys.events)
            .arg(format!("({}", *cutoff))
            .arg("+inf")
            .arg("BYSCORE")
            .arg("WITHSCORES")
            .query_async(&mut connection_manager)
            .await?;

        Ok(entries
            .into_iter()
            .map(|(_, score)| Timestamp::from_secs_f64(score))
            .collect())
    }
}
