use std::sync::Arc;
use tracing::warn;

use crate::i18n::Language;
use crate::storage::{Storage, StorageError};

/// Storage key holding the preferred language code.
pub const LANGUAGE_KEY: &str = "language";

/// The persisted language choice.
#[derive(Clone)]
pub struct LanguagePreference {
    storage: Arc<dyn Storage>,
}

impl LanguagePreference {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// The stored language, if one was stored and is still supported.
    pub fn stored(&self) -> Option<Language> {
        let code = self.storage.get(LANGUAGE_KEY)?;
        match code.parse() {
            Ok(language) => Some(language),
            Err(e) => {
                warn!("Ignoring stored language preference: {}", e);
                None
            }
        }
    }

    /// Read at startup; a first visit gets (and persists) the default.
    pub fn load(&self) -> Language {
        if let Some(language) = self.stored() {
            return language;
        }
        let language = Language::default();
        if let Err(e) = self.store(language) {
            warn!("Failed to persist default language: {}", e);
        }
        language
    }

    pub fn store(&self, language: Language) -> Result<(), StorageError> {
        self.storage.set(LANGUAGE_KEY, language.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn first_visit_persists_english() {
        let storage = Arc::new(MemoryStorage::new());
        let preference = LanguagePreference::new(storage.clone());
        assert_eq!(preference.load(), Language::English);
        assert_eq!(storage.get(LANGUAGE_KEY).as_deref(), Some("en"));
    }

    #[test]
    fn stored_choice_is_read_back() {
        let storage = Arc::new(MemoryStorage::new());
        let preference = LanguagePreference::new(storage);
        preference.store(Language::Lao).unwrap();
        assert_eq!(preference.load(), Language::Lao);
    }

    #[test]
    fn unsupported_stored_code_is_ignored() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(LANGUAGE_KEY, "fr").unwrap();
        let preference = LanguagePreference::new(storage);
        assert_eq!(preference.stored(), None);
        assert_eq!(preference.load(), Language::English);
    }
}
