//! Public key resolution.
//!
//! Keys are looked up in the [`KeyCache`] first; on a miss the whole registry
//! is fetched once, every listed key is cached, and the requested one is
//! returned. Cached keys are never refetched.

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::debug;

use crate::cache::KeyCache;
use crate::error::{RejectionReason, VerifyResult};

mod http;

pub use http::HttpKeySource;

/// Something that can list the registry's current keys.
#[async_trait]
pub trait KeySource: Send + Sync {
    /// Fetch the registry as `key_id -> base64 raw public key`.
    async fn fetch_keys(&self) -> VerifyResult<HashMap<String, String>>;
}

/// Resolves key ids through a cache backed by a [`KeySource`].
#[derive(Debug, Clone)]
pub struct KeyResolver<S> {
    source: S,
    cache: KeyCache,
}

impl<S: KeySource> KeyResolver<S> {
    pub fn new(source: S, cache: KeyCache) -> Self {
        Self { source, cache }
    }

    pub fn cache(&self) -> &KeyCache {
        &self.cache
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Return the base64 public key for `key_id`.
    pub async fn resolve(&self, key_id: &str) -> VerifyResult<String> {
        if let Some(key) = self.cache.get(key_id).await {
            debug!(key_id = %key_id, "public key cache hit");
            return Ok(key);
        }

        let keys = self.source.fetch_keys().await?;
        let added = self.cache.extend(&keys).await;
        debug!(
            key_id = %key_id,
            fetched = keys.len(),
            added,
            "public key cache miss, registry fetched"
        );

        match keys.get(key_id) {
            // Another task may have cached this id while we were fetching
            Some(public_key) => Ok(self.cache.insert(key_id, public_key).await),
            None => Err(RejectionReason::KeyNotFound {
                key_id: key_id.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug, Default, Clone)]
    struct CountingSource {
        keys: HashMap<String, String>,
        fetches: Arc<AtomicUsize>,
        fail_with: Option<u16>,
    }

    impl CountingSource {
        fn with_keys(keys: &[(&str, &str)]) -> Self {
            Self {
                keys: keys
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                ..Self::default()
            }
        }

        fn fetches(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl KeySource for CountingSource {
        async fn fetch_keys(&self) -> VerifyResult<HashMap<String, String>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if let Some(status) = self.fail_with {
                return Err(RejectionReason::KeyFetchFailed {
                    status: Some(status),
                    message: format!("HTTP {}", status),
                });
            }
            Ok(self.keys.clone())
        }
    }

    #[tokio::test]
    async fn test_resolve_fetches_once() {
        let source = CountingSource::with_keys(&[("k1", "KEY1")]);
        let resolver = KeyResolver::new(source.clone(), KeyCache::new());

        assert_eq!(resolver.resolve("k1").await.unwrap(), "KEY1");
        assert_eq!(resolver.resolve("k1").await.unwrap(), "KEY1");
        assert_eq!(source.fetches(), 1);
    }

    #[tokio::test]
    async fn test_resolve_caches_all_listed_keys() {
        let source = CountingSource::with_keys(&[("k1", "KEY1"), ("k2", "KEY2")]);
        let resolver = KeyResolver::new(source.clone(), KeyCache::new());

        resolver.resolve("k1").await.unwrap();
        assert_eq!(resolver.resolve("k2").await.unwrap(), "KEY2");
        assert_eq!(source.fetches(), 1);
    }

    #[tokio::test]
    async fn test_prepopulated_cache_skips_fetch() {
        let source = CountingSource::default();
        let resolver = KeyResolver::new(source.clone(), KeyCache::with_keys([("k1", "KEY1")]));

        assert_eq!(resolver.resolve("k1").await.unwrap(), "KEY1");
        assert_eq!(source.fetches(), 0);
    }

    #[tokio::test]
    async fn test_cached_key_not_replaced_by_rotation() {
        let source = CountingSource::with_keys(&[("k1", "ROTATED"), ("k2", "KEY2")]);
        let resolver = KeyResolver::new(source.clone(), KeyCache::with_keys([("k1", "ORIGINAL")]));

        // Fetch triggered by an unseen id must not overwrite k1
        resolver.resolve("k2").await.unwrap();
        assert_eq!(resolver.resolve("k1").await.unwrap(), "ORIGINAL");
    }

    #[tokio::test]
    async fn test_missing_key() {
        let source = CountingSource::with_keys(&[("k1", "KEY1")]);
        let resolver = KeyResolver::new(source.clone(), KeyCache::new());

        let result = resolver.resolve("unknown").await;
        assert_eq!(
            result,
            Err(RejectionReason::KeyNotFound {
                key_id: "unknown".to_string()
            })
        );

        // Misses are not cached: a later lookup fetches again
        let _ = resolver.resolve("unknown").await;
        assert_eq!(source.fetches(), 2);
    }

    #[tokio::test]
    async fn test_fetch_failure_propagates() {
        let source = CountingSource {
            fail_with: Some(503),
            ..CountingSource::default()
        };
        let resolver = KeyResolver::new(source, KeyCache::new());

        let result = resolver.resolve("k1").await;
        assert!(matches!(
            result,
            Err(RejectionReason::KeyFetchFailed {
                status: Some(503),
                ..
            })
        ));
        assert!(resolver.cache().is_empty().await);
    }
}
