/// Redis cache for Books API lookups.
///
/// Only successful lookups are stored; a miss or a failed call is retried on the next
/// request. Everything degrades to a cache miss when Redis is unavailable.
///
/// Key schema:
/// - `books:v1:volume:{sha256(title)}` : JSON-serialized VolumeSummary (TTL: 24h)
use sha2::{Digest, Sha256};
use tracing::warn;

use books_common::google_books::VolumeSummary;
use books_common::redis::RedisStore;

const KEY_PREFIX: &str = "books:v1:";
const VOLUME_TTL_SECS: u64 = 24 * 3600;

pub struct LookupCache {
    redis: RedisStore,
}

impl LookupCache {
    pub fn new(redis: RedisStore) -> Self {
        Self { redis }
    }

    pub async fn get_volume(&self, title: &str) -> Option<VolumeSummary> {
        let key = volume_key(title);
        let json = self.redis.get(&key).await?;
        serde_json::from_str(&json)
            .inspect_err(|e| warn!(error = %e, key, "cache deserialization failed"))
            .ok()
    }

    pub async fn set_volume(&self, title: &str, volume: &VolumeSummary) {
        let key = volume_key(title);
        if let Ok(json) = serde_json::to_string(volume) {
            self.redis.put_with_ttl(&key, &json, VOLUME_TTL_SECS).await;
        }
    }
}

/// Deterministic key for a lookup title. Raw user input never appears in a key.
fn volume_key(title: &str) -> String {
    let hash = Sha256::digest(title.as_bytes());
    format!("{KEY_PREFIX}volume:{hash:x}")
}
