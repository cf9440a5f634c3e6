pub mod cache;
pub mod dictionary;
pub mod fallback;
pub mod helpers;
pub mod language;
pub mod loader;
pub mod localizer;
pub mod preference;

pub use cache::DictionaryCache;
pub use dictionary::Dictionary;
pub use helpers::I18n;
pub use language::{Language, UnsupportedLanguage};
pub use loader::DictionaryLoader;
pub use localizer::{DictionarySource, Localizer};
pub use preference::LanguagePreference;

use std::collections::BTreeMap;
use tracing::warn;

/// Resolve a set of keys for client-side usage
pub fn extract_translations_for_client(
    localizer: &Localizer,
    language: Language,
    keys: &[&str],
) -> BTreeMap<String, String> {
    keys.iter()
        .map(|key| (key.to_string(), localizer.resolve(language, key, None)))
        .collect()
}

/// Log keys the secondary languages are missing relative to the default.
pub fn report_missing_keys(localizer: &Localizer) -> usize {
    let mut total = 0;
    for language in localizer.supported_languages() {
        if *language == localizer.default_language() {
            continue;
        }
        let missing = localizer.missing_keys(*language);
        for key in &missing {
            warn!(language = %language, key = %key, "Translation key missing");
        }
        total += missing.len();
    }
    total
}
