//! Evaluation Cache - bounded LRU memoization of moderation outcomes.
//!
//! Evaluation is deterministic for a fixed `(image bytes, thresholds)` pair,
//! so outcomes are memoized keyed on the image content digest plus the exact
//! threshold bits. Bounded: once capacity is reached the least recently used
//! entry is evicted.

use std::collections::{HashMap, VecDeque};

use sha2::{Digest, Sha256};
use tokio::sync::Mutex;

use crate::domain::{ModerationOutcome, Thresholds};

/// Key identifying one evaluation: what was looked at, and with which
/// calibration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Hex SHA-256 digest of the image bytes.
    image_digest: String,
    /// Bit-exact threshold values.
    threshold_bits: [u64; 5],
}

impl CacheKey {
    pub fn new(image: &[u8], thresholds: &Thresholds) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(image);
        Self {
            image_digest: hex::encode(hasher.finalize()),
            threshold_bits: thresholds.cache_bits(),
        }
    }
}

struct CacheInner {
    entries: HashMap<CacheKey, ModerationOutcome>,
    /// Keys from least to most recently used.
    order: VecDeque<CacheKey>,
}

/// Bounded LRU cache of moderation outcomes.
///
/// A capacity of 0 disables caching entirely.
pub struct EvaluationCache {
    capacity: usize,
    inner: Mutex<CacheInner>,
}

impl EvaluationCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: Mutex::new(CacheInner {
                entries: HashMap::new(),
                order: VecDeque::new(),
            }),
        }
    }

    /// Look up a stored outcome, marking the entry as most recently used.
    pub async fn get(&self, key: &CacheKey) -> Option<ModerationOutcome> {
        let mut inner = self.inner.lock().await;
        let outcome = inner.entries.get(key).cloned()?;

        if let Some(position) = inner.order.iter().position(|k| k == key) {
            inner.order.remove(position);
        }
        inner.order.push_back(key.clone());

        Some(outcome)
    }

    /// Store an outcome, evicting the least recently used entry at capacity.
    pub async fn insert(&self, key: CacheKey, outcome: ModerationOutcome) {
        if self.capacity == 0 {
            return;
        }

        let mut inner = self.inner.lock().await;

        if inner.entries.contains_key(&key) {
            inner.entries.insert(key.clone(), outcome);
            if let Some(position) = inner.order.iter().position(|k| k == &key) {
                inner.order.remove(position);
            }
            inner.order.push_back(key);
            return;
        }

        if inner.entries.len() >= self.capacity {
            if let Some(evicted) = inner.order.pop_front() {
                inner.entries.remove(&evicted);
            }
        }

        inner.order.push_back(key.clone());
        inner.entries.insert(key, outcome);
    }

    /// Number of stored outcomes.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EvaluationResult;

    fn outcome(tag: &str) -> ModerationOutcome {
        ModerationOutcome {
            evaluation: EvaluationResult::approved(),
            report: serde_json::json!({ "tag": tag }),
        }
    }

    fn thresholds(adult: f64) -> Thresholds {
        Thresholds {
            adult,
            ..Thresholds::default()
        }
    }

    #[tokio::test]
    async fn test_miss_then_hit() {
        let cache = EvaluationCache::new(4);
        let key = CacheKey::new(b"image-bytes", &thresholds(0.8));

        assert!(cache.get(&key).await.is_none());

        cache.insert(key.clone(), outcome("a")).await;
        let stored = cache.get(&key).await.unwrap();
        assert_eq!(stored.report["tag"], "a");
    }

    #[tokio::test]
    async fn test_thresholds_are_part_of_the_key() {
        let cache = EvaluationCache::new(4);
        let loose = CacheKey::new(b"same-image", &thresholds(0.9));
        let strict = CacheKey::new(b"same-image", &thresholds(0.1));

        cache.insert(loose.clone(), outcome("loose")).await;

        assert!(cache.get(&strict).await.is_none());
        assert!(cache.get(&loose).await.is_some());
    }

    #[tokio::test]
    async fn test_evicts_least_recently_used() {
        let cache = EvaluationCache::new(2);
        let t = thresholds(0.5);
        let first = CacheKey::new(b"first", &t);
        let second = CacheKey::new(b"second", &t);
        let third = CacheKey::new(b"third", &t);

        cache.insert(first.clone(), outcome("1")).await;
        cache.insert(second.clone(), outcome("2")).await;

        // Touch `first` so `second` becomes the eviction candidate.
        cache.get(&first).await.unwrap();

        cache.insert(third.clone(), outcome("3")).await;

        assert_eq!(cache.len().await, 2);
        assert!(cache.get(&first).await.is_some());
        assert!(cache.get(&second).await.is_none());
        assert!(cache.get(&third).await.is_some());
    }

    #[tokio::test]
    async fn test_zero_capacity_disables_caching() {
        let cache = EvaluationCache::new(0);
        let key = CacheKey::new(b"image", &thresholds(0.5));

        cache.insert(key.clone(), outcome("a")).await;

        assert!(cache.is_empty().await);
        assert!(cache.get(&key).await.is_none());
    }

    #[tokio::test]
    async fn test_reinsert_replaces_value() {
        let cache = EvaluationCache::new(2);
        let key = CacheKey::new(b"image", &thresholds(0.5));

        cache.insert(key.clone(), outcome("old")).await;
        cache.insert(key.clone(), outcome("new")).await;

        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.get(&key).await.unwrap().report["tag"], "new");
    }
}
