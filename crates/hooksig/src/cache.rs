//! Process-lifetime public key cache.
//!
//! Entries are inserted at most once and never evicted, refreshed or
//! replaced. Two requests racing on the same unseen key id may both fetch;
//! the first insert wins and the second is a no-op.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

/// Shared cache of `key_id -> base64 raw public key`.
///
/// Cloning yields another handle to the same entries.
#[derive(Debug, Clone, Default)]
pub struct KeyCache {
    inner: Arc<RwLock<HashMap<String, String>>>,
}

impl KeyCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache pre-populated with known keys.
    pub fn with_keys<I, K, V>(keys: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let keys = keys
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            inner: Arc::new(RwLock::new(keys)),
        }
    }

    /// Look up a key.
    pub async fn get(&self, key_id: &str) -> Option<String> {
        self.inner.read().await.get(key_id).cloned()
    }

    /// Insert a key unless one is already cached under `key_id`.
    ///
    /// Returns the cached value, which is the existing one if present.
    pub async fn insert(&self, key_id: &str, public_key: &str) -> String {
        let mut inner = self.inner.write().await;
        inner
            .entry(key_id.to_string())
            .or_insert_with(|| public_key.to_string())
            .clone()
    }

    /// Insert every key not already cached. Returns how many were added.
    pub async fn extend<'a, I>(&self, keys: I) -> usize
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        let mut inner = self.inner.write().await;
        let mut added = 0;
        for (key_id, public_key) in keys {
            if !inner.contains_key(key_id) {
                inner.insert(key_id.clone(), public_key.clone());
                added += 1;
            }
        }
        added
    }

    /// Whether `key_id` is cached.
    pub async fn contains(&self, key_id: &str) -> bool {
        self.inner.read().await.contains_key(key_id)
    }

    /// Number of cached keys.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Cached key ids, sorted.
    pub async fn key_ids(&self) -> Vec<String> {
        let inner = self.inner.read().await;
        let mut ids: Vec<String> = inner.keys().cloned().collect();
        ids.sort();
        ids
    }
}
