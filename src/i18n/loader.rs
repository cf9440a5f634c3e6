use chrono::Utc;
use tracing::{info, warn};

use crate::fetch::{fetch_json_with_retry, Fetcher, RetryPolicy};
use crate::i18n::cache::DictionaryCache;
use crate::i18n::fallback::builtin_dictionary;
use crate::i18n::localizer::{DictionarySource, Localizer};
use crate::i18n::{Dictionary, Language};

/// Loads one dictionary per language, degrading instead of failing.
///
/// Fetch (with retry) first; on success the cache is refreshed. When the
/// fetch fails, a fresh cache entry is used, then the built-in dictionary.
pub struct DictionaryLoader<'a> {
    fetcher: &'a dyn Fetcher,
    cache: Option<&'a DictionaryCache>,
    retry: RetryPolicy,
}

impl<'a> DictionaryLoader<'a> {
    pub fn new(fetcher: &'a dyn Fetcher, retry: RetryPolicy) -> Self {
        Self {
            fetcher,
            cache: None,
            retry,
        }
    }

    pub fn with_cache(mut self, cache: &'a DictionaryCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn locale_path(language: Language) -> String {
        format!("locales/{}.json", language.code())
    }

    /// Load a single language.
    pub async fn load_language(&self, language: Language) -> (Dictionary, DictionarySource) {
        let path = Self::locale_path(language);
        match fetch_json_with_retry::<Dictionary>(self.fetcher, &path, &self.retry).await {
            Ok(dictionary) => {
                if let Some(cache) = self.cache {
                    cache
                        .store_detached(language, dictionary.clone(), Utc::now())
                        .await;
                }
                (dictionary, DictionarySource::Network)
            }
            Err(e) => {
                warn!(language = %language, "Failed to load dictionary: {}", e);
                if let Some(dictionary) = self
                    .cache
                    .and_then(|cache| cache.load_fresh(language, Utc::now()))
                {
                    return (dictionary, DictionarySource::Cache);
                }
                (builtin_dictionary(language), DictionarySource::BuiltIn)
            }
        }
    }

    /// Load every requested language into a [`Localizer`].
    pub async fn load(&self, languages: &[Language], default_language: Language) -> Localizer {
        let mut localizer = Localizer::new(default_language);
        let mut wanted = languages.to_vec();
        if !wanted.contains(&default_language) {
            wanted.push(default_language);
        }

        for language in wanted {
            let (dictionary, source) = self.load_language(language).await;
            info!(language = %language, source = %source, "Loaded dictionary");
            localizer.insert(language, dictionary, source);
        }
        localizer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MemoryFetcher;
    use crate::storage::MemoryStorage;
    use std::sync::Arc;
    use std::time::Duration;

    fn cache() -> DictionaryCache {
        DictionaryCache::new(Arc::new(MemoryStorage::new()), Duration::from_secs(24 * 3600))
    }

    #[tokio::test(start_paused = true)]
    async fn fetched_dictionaries_are_cached() {
        let fetcher = MemoryFetcher::new()
            .with("locales/en.json", r#"{"nav":{"home":"Home"}}"#)
            .with("locales/lo.json", r#"{"nav":{"home":"ໜ້າຫຼັກ"}}"#);
        let cache = cache();
        let loader = DictionaryLoader::new(&fetcher, RetryPolicy::default()).with_cache(&cache);

        let localizer = loader.load(Language::all(), Language::English).await;
        assert_eq!(localizer.source(Language::Lao), Some(DictionarySource::Network));
        assert_eq!(localizer.resolve(Language::Lao, "nav.home", None), "ໜ້າຫຼັກ");
        assert!(cache.load_fresh(Language::Lao, Utc::now()).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn failed_fetch_uses_fresh_cache() {
        let cache = cache();
        cache.store(
            Language::Lao,
            &Dictionary::from_json(r#"{"nav":{"home":"ຈາກແຄຊ"}}"#).unwrap(),
            Utc::now(),
        );
        let fetcher = MemoryFetcher::new().with("locales/en.json", r#"{"nav":{"home":"Home"}}"#);
        let loader = DictionaryLoader::new(&fetcher, RetryPolicy::default()).with_cache(&cache);

        let localizer = loader.load(Language::all(), Language::English).await;
        assert_eq!(localizer.source(Language::Lao), Some(DictionarySource::Cache));
        assert_eq!(localizer.resolve(Language::Lao, "nav.home", None), "ຈາກແຄຊ");
    }

    #[tokio::test(start_paused = true)]
    async fn unparseable_file_without_cache_uses_builtin() {
        let fetcher = MemoryFetcher::new()
            .with("locales/en.json", "{ broken")
            .with("locales/lo.json", r#"{"nav":{"home":"ໜ້າຫຼັກ"}}"#);
        let loader = DictionaryLoader::new(&fetcher, RetryPolicy::default());

        let localizer = loader.load(&[Language::Lao], Language::English).await;
        assert_eq!(localizer.source(Language::English), Some(DictionarySource::BuiltIn));
        assert_eq!(localizer.resolve(Language::English, "nav.projects", None), "Projects");
    }
}
