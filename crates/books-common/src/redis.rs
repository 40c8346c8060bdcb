/// Redis key/value store that degrades to a no-op.
///
/// Reads return `Option<String>` and writes return `bool`. Any Redis fault is logged at
/// `warn` and reported as a miss, so callers always have a path that works without Redis.
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use tracing::warn;

use crate::error::CommonError;

pub struct RedisStore {
    client: Option<redis::Client>,
}

impl RedisStore {
    /// Build a store for `url`. `None`, or a URL the client rejects, gives a store that
    /// never hits.
    pub fn new(url: Option<&str>) -> Self {
        let client = url.and_then(|u| {
            redis::Client::open(u)
                .inspect_err(|e| warn!(error = %e, url = u, "invalid redis url, cache disabled"))
                .ok()
        });
        Self { client }
    }

    pub fn disabled() -> Self {
        Self { client: None }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    /// Send a PING. `false` when unconfigured or unreachable.
    pub async fn is_available(&self) -> bool {
        let Ok(Some(mut conn)) = self.connection().await else {
            return false;
        };
        let pong: Result<String, _> = redis::cmd("PING").query_async(&mut conn).await;
        pong.is_ok()
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        let mut conn = self
            .connection()
            .await
            .inspect_err(|e| warn!(error = %e, "redis connection failed"))
            .ok()??;
        conn.get::<_, Option<String>>(key)
            .await
            .inspect_err(|e| warn!(error = %e, key, "redis GET failed"))
            .ok()?
    }

    pub async fn put_with_ttl(&self, key: &str, value: &str, ttl_secs: u64) -> bool {
        let Ok(Some(mut conn)) = self
            .connection()
            .await
            .inspect_err(|e| warn!(error = %e, "redis connection failed"))
        else {
            return false;
        };
        conn.set_ex::<_, _, ()>(key, value, ttl_secs)
            .await
            .inspect_err(|e| warn!(error = %e, key, "redis SETEX failed"))
            .is_ok()
    }

    async fn connection(&self) -> Result<Option<MultiplexedConnection>, CommonError> {
        let Some(client) = &self.client else {
            return Ok(None);
        };
        Ok(Some(client.get_multiplexed_async_connection().await?))
    }
}
