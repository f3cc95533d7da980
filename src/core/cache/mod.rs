pub mod storage;

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};

/// Maximum age of a cached payload.
pub const CACHE_TTL: Duration = Duration::from_secs(15 * 60);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CachedPayload<T> {
    pub timestamp: i64,
    pub data: T,
}

/// Best-effort, time-boxed cache over a [`Storage`].
///
/// Reads treat every failure as a miss and writes swallow every failure, so a
/// broken or full storage never reaches the caller.
#[derive(Clone)]
pub struct SessionCache {
    storage: Arc<dyn Storage>,
    ttl_ms: i64,
}

impl SessionCache {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self::with_ttl(storage, CACHE_TTL)
    }

    pub fn with_ttl(storage: Arc<dyn Storage>, ttl: Duration) -> Self {
        Self {
            storage,
            ttl_ms: i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX),
        }
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get_at(key, now_millis())
    }

    pub fn get_at<T: DeserializeOwned>(&self, key: &str, now_ms: i64) -> Option<T> {
        let raw = match self.storage.get_item(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(error) => {
                tracing::debug!(key, "session cache read failed: {error}");
                return None;
            }
        };
        let payload = match serde_json::from_str::<CachedPayload<T>>(&raw) {
            Ok(payload) => payload,
            Err(error) => {
                tracing::debug!(key, "session cache entry is malformed: {error}");
                return None;
            }
        };
        if now_ms.saturating_sub(payload.timestamp) > self.ttl_ms {
            tracing::debug!(key, "session cache entry expired");
            return None;
        }
        Some(payload.data)
    }

    pub fn set<T: Serialize>(&self, key: &str, data: &T) {
        self.set_at(key, data, now_millis());
    }

    pub fn set_at<T: Serialize>(&self, key: &str, data: &T, now_ms: i64) {
        let payload = CachedPayload {
            timestamp: now_ms,
            data,
        };
        let serialized = match serde_json::to_string(&payload) {
            Ok(serialized) => serialized,
            Err(error) => {
                tracing::debug!(key, "session cache entry could not be serialized: {error}");
                return;
            }
        };
        if let Err(error) = self.storage.set_item(key, &serialized) {
            tracing::debug!(key, "session cache write dropped: {error}");
        }
    }
}

pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or_default()
}
