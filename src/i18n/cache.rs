use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::i18n::{Dictionary, Language};
use crate::storage::{Storage, StorageError};

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    /// Unix milliseconds at which the dictionary was stored.
    timestamp: i64,
    data: Dictionary,
}

/// Per-language dictionary copies kept in [`Storage`], consulted when a
/// fetch fails.
#[derive(Clone)]
pub struct DictionaryCache {
    storage: Arc<dyn Storage>,
    ttl: Duration,
}

impl DictionaryCache {
    pub fn new(storage: Arc<dyn Storage>, ttl: Duration) -> Self {
        Self { storage, ttl }
    }

    pub fn storage_key(language: Language) -> String {
        format!("translations_cache_{}", language.code())
    }

    pub fn store(&self, language: Language, dictionary: &Dictionary, now: DateTime<Utc>) {
        let entry = CacheEntry {
            timestamp: now.timestamp_millis(),
            data: dictionary.clone(),
        };
        let result = serde_json::to_string(&entry)
            .map_err(StorageError::from)
            .and_then(|json| self.storage.set(&Self::storage_key(language), &json));
        if let Err(e) = result {
            warn!(language = %language, "Failed to cache dictionary: {}", e);
        }
    }

    /// [`store`](Self::store) on the blocking pool, for callers on the runtime.
    pub async fn store_detached(&self, language: Language, dictionary: Dictionary, now: DateTime<Utc>) {
        let cache = self.clone();
        let task = tokio::task::spawn_blocking(move || cache.store(language, &dictionary, now));
        if let Err(e) = task.await {
            warn!(language = %language, "Dictionary cache write did not complete: {}", e);
        }
    }

    /// Cached dictionary for `language` if younger than the freshness window.
    pub fn load_fresh(&self, language: Language, now: DateTime<Utc>) -> Option<Dictionary> {
        let raw = self.storage.get(&Self::storage_key(language))?;
        let entry: CacheEntry = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(language = %language, "Discarding unreadable dictionary cache: {}", e);
                return None;
            }
        };

        let age_ms = now.timestamp_millis().saturating_sub(entry.timestamp);
        let ttl_ms = i64::try_from(self.ttl.as_millis()).unwrap_or(i64::MAX);
        if age_ms < 0 || age_ms >= ttl_ms {
            debug!(language = %language, age_ms, "Dictionary cache entry is stale");
            return None;
        }
        Some(entry.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use chrono::Duration as TimeDelta;
    use serde_json::json;

    fn cache() -> DictionaryCache {
        DictionaryCache::new(Arc::new(MemoryStorage::new()), Duration::from_secs(24 * 3600))
    }

    #[test]
    fn fresh_entries_are_returned() {
        let cache = cache();
        let now = Utc::now();
        let dictionary = Dictionary::new(json!({"nav": {"home": "Home"}}));
        cache.store(Language::English, &dictionary, now);

        let later = now + TimeDelta::hours(23);
        assert_eq!(cache.load_fresh(Language::English, later), Some(dictionary));
        assert_eq!(cache.load_fresh(Language::Lao, later), None);
    }

    #[test]
    fn entries_expire_after_a_day() {
        let cache = cache();
        let now = Utc::now();
        cache.store(Language::Lao, &Dictionary::new(json!({})), now);
        assert_eq!(cache.load_fresh(Language::Lao, now + TimeDelta::hours(24)), None);
    }

    #[tokio::test]
    async fn detached_store_is_visible_once_awaited() {
        let cache = cache();
        let now = Utc::now();
        let dictionary = Dictionary::new(json!({"nav": {"home": "ໜ້າຫຼັກ"}}));
        cache.store_detached(Language::Lao, dictionary.clone(), now).await;
        assert_eq!(cache.load_fresh(Language::Lao, now), Some(dictionary));
    }

    #[test]
    fn corrupt_entries_are_ignored() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .set(&DictionaryCache::storage_key(Language::English), "{oops")
            .unwrap();
        let cache = DictionaryCache::new(storage, Duration::from_secs(60));
        assert_eq!(cache.load_fresh(Language::English, Utc::now()), None);
    }
}
