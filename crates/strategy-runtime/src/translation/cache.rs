//! Bounded translation cache
//!
//! Owned by whoever builds the `TranslationService`; entries expire after a
//! TTL and the oldest entry is evicted once capacity is reached.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct CacheKey {
    source: String,
    target: String,
    text: String,
}

#[derive(Clone, Debug)]
struct CacheEntry {
    value: String,
    inserted: Instant,
}

#[derive(Debug)]
pub struct TranslationCache {
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
    ttl: Duration,
    capacity: usize,
}

impl Default for TranslationCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(3600), 1000)
    }
}

impl TranslationCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            capacity,
        }
    }

    fn key(text: &str, target: &str, source: &str) -> CacheKey {
        CacheKey {
            source: source.to_string(),
            target: target.to_string(),
            text: text.to_string(),
        }
    }

    pub async fn get(&self, text: &str, target: &str, source: &str) -> Option<String> {
        let key = Self::key(text, target, source);
        let mut entries = self.entries.lock().await;
        match entries.get(&key) {
            Some(entry) if entry.inserted.elapsed() < self.ttl => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(&key);
                None
            }
            None => None,
        }
    }

    pub async fn insert(&self, text: &str, target: &str, source: &str, value: String) {
        if self.capacity == 0 {
            return;
        }
        let mut entries = self.entries.lock().await;
        let ttl = self.ttl;
        entries.retain(|_, e| e.inserted.elapsed() < ttl);

        let key = Self::key(text, target, source);
        if entries.len() >= self.capacity && !entries.contains_key(&key) {
            let oldest = entries
                .iter()
                .min_by_key(|(_, e)| e.inserted)
                .map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                entries.remove(&oldest);
            }
        }
        entries.insert(
            key,
            CacheEntry {
                value,
                inserted: Instant::now(),
            },
        );
    }

    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hit_and_clear() {
        let cache = TranslationCache::default();
        cache.insert("hello", "es", "en", "hola".into()).await;
        assert_eq!(cache.get("hello", "es", "en").await.as_deref(), Some("hola"));
        assert!(cache.get("hello", "fr", "en").await.is_none());

        cache.clear().await;
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_expired_entries_are_dropped() {
        let cache = TranslationCache::new(Duration::ZERO, 10);
        cache.insert("hello", "es", "en", "hola".into()).await;
        assert!(cache.get("hello", "es", "en").await.is_none());
    }

    #[tokio::test]
    async fn test_capacity_evicts_oldest() {
        let cache = TranslationCache::new(Duration::from_secs(60), 2);
        cache.insert("one", "es", "en", "uno".into()).await;
        tokio::time::sleep(Duration::from_millis(2)).await;
        cache.insert("two", "es", "en", "dos".into()).await;
        tokio::time::sleep(Duration::from_millis(2)).await;
        cache.insert("three", "es", "en", "tres".into()).await;

        assert_eq!(cache.len().await, 2);
        assert!(cache.get("one", "es", "en").await.is_none());
        assert_eq!(cache.get("three", "es", "en").await.as_deref(), Some("tres"));
    }
}
