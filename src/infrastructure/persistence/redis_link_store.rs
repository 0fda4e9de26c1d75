//! Redis implementation of the link store.

use std::collections::HashMap;

use async_trait::async_trait;
use redis::{AsyncCommands, Client, Script, aio::ConnectionManager};
use tracing::info;

use crate::domain::entities::Link;
use crate::domain::repositories::{InsertOutcome, LinkStore, StoreError};

/// Creates the hash only if the key is absent. With an expiry, the key also
/// gets `EXPIREAT` so Redis purges it eventually.
const INSERT_SCRIPT: &str = r#"
if redis.call('EXISTS', KEYS[1]) == 1 then
    return 0
end
redis.call('HSET', KEYS[1], 'long_url', ARGV[1], 'created_at', ARGV[2], 'hits', 0)
if ARGV[3] ~= '' then
    redis.call('HSET', KEYS[1], 'expires_at', ARGV[3])
    redis.call('EXPIREAT', KEYS[1], ARGV[3])
end
return 1
"#;

/// Bumps `hits` on existing links only, so a stray increment never leaves a
/// partial record behind.
const INCREMENT_SCRIPT: &str = r#"
if redis.call('EXISTS', KEYS[1]) == 0 then
    return 0
end
return redis.call('HINCRBY', KEYS[1], 'hits', 1)
"#;

/// Redis store keeping one hash per link under `link:{code}`.
///
/// Both writes run as Lua scripts, so each is atomic on the server regardless
/// of how many service instances share the database. `EXPIREAT` on expiring
/// links is advisory; [`Link::is_expired_at`] is still checked on read.
pub struct RedisLinkStore {
    conn: ConnectionManager,
    key_prefix: String,
    insert_script: Script,
    increment_script: Script,
}

impl RedisLinkStore {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the URL is invalid, the connection cannot be
    /// established, or the PING fails.
    pub async fn connect(redis_url: &str) -> Result<Self, StoreError> {
        info!("Connecting to Redis link store");

        let client = Client::open(redis_url)?;
        let manager = ConnectionManager::new(client).await?;

        let mut test_conn = manager.clone();
        test_conn.ping::<()>().await?;

        info!("Connected to Redis");

        Ok(Self {
            conn: manager,
            key_prefix: "link:".to_string(),
            insert_script: Script::new(INSERT_SCRIPT),
            increment_script: Script::new(INCREMENT_SCRIPT),
        })
    }

    fn build_key(&self, code: &str) -> String {
        format!("{}{}", self.key_prefix, code)
    }
}

impl From<redis::RedisError> for StoreError {
    fn from(e: redis::RedisError) -> Self {
        if e.is_timeout() || e.is_connection_dropped() || e.is_io_error() {
            StoreError::Transient(e.to_string())
        } else {
            StoreError::Backend(e.to_string())
        }
    }
}

/// Rebuilds a [`Link`] from its hash fields.
fn link_from_fields(code: &str, fields: &HashMap<String, String>) -> Result<Link, StoreError> {
    let corrupt = |reason: &str| StoreError::Corrupt {
        code: code.to_string(),
        reason: reason.to_string(),
    };

    let long_url = fields
        .get("long_url")
        .ok_or_else(|| corrupt("missing long_url"))?
        .clone();

    let created_at = fields
        .get("created_at")
        .ok_or_else(|| corrupt("missing created_at"))?
        .parse::<i64>()
        .map_err(|_| corrupt("created_at is not an integer"))?;

    let expires_at = fields
        .get("expires_at")
        .map(|v| v.parse::<i64>())
        .transpose()
        .map_err(|_| corrupt("expires_at is not an integer"))?;

    let hits = match fields.get("hits") {
        Some(v) => v
            .parse::<i64>()
            .map_err(|_| corrupt("hits is not an integer"))?,
        None => 0,
    };

    Ok(Link {
        code: code.to_string(),
        long_url,
        created_at,
        expires_at,
        hits,
    })
}

#[async_trait]
impl LinkStore for RedisLinkStore {
    async fn insert_if_absent(&self, link: &Link) -> Result<InsertOutcome, StoreError> {
        let key = self.build_key(&link.code);
        let mut conn = self.conn.clone();
        let expires_at = link.expires_at.map(|e| e.to_string()).unwrap_or_default();

        let created: i64 = self
            .insert_script
            .key(&key)
            .arg(&link.long_url)
            .arg(link.created_at)
            .arg(expires_at)
            .invoke_async(&mut conn)
            .await?;

        if created == 1 {
            Ok(InsertOutcome::Inserted)
        } else {
            Ok(InsertOutcome::AlreadyExists)
        }
    }

    async fn get(&self, code: &str) -> Result<Option<Link>, StoreError> {
        let key = self.build_key(code);
        let mut conn = self.conn.clone();

        let fields: HashMap<String, String> = conn.hgetall(&key).await?;
        if fields.is_empty() {
            return Ok(None);
        }

        link_from_fields(code, &fields).map(Some)
    }

    async fn increment_hits(&self, code: &str) -> Result<(), StoreError> {
        let key = self.build_key(code);
        let mut conn = self.conn.clone();

        let _: i64 = self
            .increment_script
            .key(&key)
            .invoke_async(&mut conn)
            .await?;

        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.conn.clone();
        conn.ping::<()>().await.is_ok()
    }
}
