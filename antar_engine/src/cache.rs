//! A non-authoritative side store.
//!
//! The cache is an injected dependency with a deliberately small surface. Nothing in the engine is allowed to fail
//! because of it: reads degrade to a miss, writes are best-effort, and invalidation is a key-pattern scan followed
//! by a multi-key delete. The engine stays correct with [`NoCache`] wired in.
use std::{collections::HashMap, sync::Arc};

use log::trace;
use tokio::sync::RwLock;

/// Matches `pattern` against `key`, where a single trailing `*` matches any suffix.
fn key_matches(pattern: &str, key: &str) -> bool {
    match pattern.strip_suffix('*') {
        Some(prefix) => key.starts_with(prefix),
        None => key == pattern,
    }
}

#[allow(async_fn_in_trait)]
pub trait SideCache: Clone {
    /// Returns the cached value, or `None` for both a miss and any cache-side failure.
    async fn get(&self, key: &str) -> Option<String>;

    /// Best-effort write. Failures are logged by the implementation and swallowed.
    async fn set(&self, key: &str, value: String);

    /// Best-effort single-key delete.
    async fn delete(&self, key: &str);

    /// Deletes every key matching `pattern` (trailing-`*` wildcard). Implementations scan incrementally and must
    /// never block readers for the duration of the scan.
    async fn scan_delete(&self, pattern: &str);
}

//--------------------------------------      NoCache      -----------------------------------------------------------
/// The absent cache: every read is a miss, every write a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl SideCache for NoCache {
    async fn get(&self, _key: &str) -> Option<String> {
        None
    }

    async fn set(&self, _key: &str, _value: String) {}

    async fn delete(&self, _key: &str) {}

    async fn scan_delete(&self, _pattern: &str) {}
}

//--------------------------------------    MemoryCache    -----------------------------------------------------------
/// A process-local cache backed by a read-write-locked map. Suitable for a single instance; a networked store can
/// implement [`SideCache`] without the engine noticing.
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl SideCache for MemoryCache {
    async fn get(&self, key: &str) -> Option<String> {
        let hit = self.entries.read().await.get(key).cloned();
        trace!("🗂️ cache {} for {key}", if hit.is_some() { "hit" } else { "miss" });
        hit
    }

    async fn set(&self, key: &str, value: String) {
        self.entries.write().await.insert(key.to_string(), value);
    }

    async fn delete(&self, key: &str) {
        self.entries.write().await.remove(key);
    }

    async fn scan_delete(&self, pattern: &str) {
        // Scan under the read lock, then delete in one batch, so readers are never held up by the scan itself.
        let doomed: Vec<String> =
            self.entries.read().await.keys().filter(|k| key_matches(pattern, k)).cloned().collect();
        if doomed.is_empty() {
            return;
        }
        trace!("🗂️ cache scan_delete {pattern} removing {} keys", doomed.len());
        let mut entries = self.entries.write().await;
        for key in doomed {
            entries.remove(&key);
        }
    }
}
