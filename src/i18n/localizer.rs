use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

use crate::i18n::dictionary::{leaf_text, Dictionary};
use crate::i18n::language::Language;

/// Where a loaded dictionary came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DictionarySource {
    Network,
    Cache,
    BuiltIn,
}

impl fmt::Display for DictionarySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DictionarySource::Network => "network",
            DictionarySource::Cache => "cache",
            DictionarySource::BuiltIn => "built-in",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
struct LoadedDictionary {
    dictionary: Dictionary,
    source: DictionarySource,
}

/// Main localization interface
///
/// Holds one dictionary per language and resolves dotted keys with a
/// fallback chain: active language, default language, caller fallback text,
/// generated placeholder. Lookups never fail.
#[derive(Debug, Clone)]
pub struct Localizer {
    dictionaries: HashMap<Language, LoadedDictionary>,
    default_language: Language,
}

impl Localizer {
    pub fn new(default_language: Language) -> Self {
        Self {
            dictionaries: HashMap::new(),
            default_language,
        }
    }

    /// Installs (or replaces) the dictionary for a language.
    pub fn insert(&mut self, language: Language, dictionary: Dictionary, source: DictionarySource) {
        self.dictionaries
            .insert(language, LoadedDictionary { dictionary, source });
    }

    pub fn dictionary(&self, language: Language) -> Option<&Dictionary> {
        self.dictionaries.get(&language).map(|loaded| &loaded.dictionary)
    }

    pub fn source(&self, language: Language) -> Option<DictionarySource> {
        self.dictionaries.get(&language).map(|loaded| loaded.source)
    }

    /// Get all supported languages
    pub fn supported_languages(&self) -> &'static [Language] {
        Language::all()
    }

    pub fn default_language(&self) -> Language {
        self.default_language
    }

    fn text_in(&self, language: Language, key: &str) -> Option<String> {
        self.dictionary(language)
            .and_then(|dictionary| dictionary.lookup(key))
            .and_then(leaf_text)
    }

    /// Resolve `key` for `language`, never failing.
    pub fn resolve(&self, language: Language, key: &str, fallback_text: Option<&str>) -> String {
        if let Some(text) = self.text_in(language, key) {
            return text;
        }
        if language != self.default_language {
            if let Some(text) = self.text_in(self.default_language, key) {
                debug!(key, language = %language, "Translation missing, using default language");
                return text;
            }
        }
        if let Some(text) = fallback_text.filter(|text| !text.trim().is_empty()) {
            return text.to_string();
        }
        debug!(key, language = %language, "Translation missing in every language");
        missing_placeholder(key)
    }

    /// Resolve an array leaf into typed items, falling back to the default
    /// language when the active one is missing, empty, or undecodable.
    pub fn resolve_items<T: DeserializeOwned>(&self, language: Language, key: &str) -> Vec<T> {
        let mut candidates = vec![language];
        if language != self.default_language {
            candidates.push(self.default_language);
        }
        for candidate in candidates {
            let Some(Value::Array(items)) = self
                .dictionary(candidate)
                .and_then(|dictionary| dictionary.lookup(key))
            else {
                continue;
            };
            if items.is_empty() {
                continue;
            }
            match serde_json::from_value::<Vec<T>>(Value::Array(items.clone())) {
                Ok(decoded) => return decoded,
                Err(e) => debug!(key, language = %candidate, "Undecodable list translation: {}", e),
            }
        }
        Vec::new()
    }

    /// Check if a key has a usable value in the given language (no fallback).
    pub fn has_key(&self, language: Language, key: &str) -> bool {
        self.dictionary(language)
            .and_then(|dictionary| dictionary.lookup(key))
            .map(|value| match value {
                Value::Array(items) => !items.is_empty(),
                other => leaf_text(other).is_some(),
            })
            .unwrap_or(false)
    }

    /// Keys present in the default dictionary that `language` lacks.
    pub fn missing_keys(&self, language: Language) -> Vec<String> {
        let Some(reference) = self.dictionary(self.default_language) else {
            return Vec::new();
        };
        let mut missing: Vec<String> = reference
            .leaf_keys()
            .into_iter()
            .filter(|key| self.has_key(self.default_language, key) && !self.has_key(language, key))
            .collect();
        missing.sort();
        missing
    }
}

/// Placeholder shown for a key that has no value anywhere, e.g.
/// `[MISSING: contact.form.sendButton] Send Button`.
pub fn missing_placeholder(key: &str) -> String {
    let segment = key.rsplit('.').next().unwrap_or(key);
    let label = humanize(segment);
    if label.is_empty() {
        format!("[MISSING: {key}]")
    } else {
        format!("[MISSING: {key}] {label}")
    }
}

/// `send_button`, `send-button` and `sendButton` all become `Send Button`.
pub fn humanize(segment: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut previous_lower = false;

    for c in segment.chars() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            previous_lower = false;
            continue;
        }
        if c.is_uppercase() && previous_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        previous_lower = c.is_lowercase() || c.is_ascii_digit();
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
        .iter()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    fn localizer(en: Value, lo: Value) -> Localizer {
        let mut localizer = Localizer::new(Language::English);
        localizer.insert(Language::English, Dictionary::new(en), DictionarySource::Network);
        localizer.insert(Language::Lao, Dictionary::new(lo), DictionarySource::Network);
        localizer
    }

    #[test]
    fn empty_lao_value_falls_back_to_english() {
        let localizer = localizer(json!({"nav": {"home": "Home"}}), json!({"nav": {"home": ""}}));
        assert_eq!(localizer.resolve(Language::Lao, "nav.home", None), "Home");
    }

    #[test]
    fn null_and_missing_values_fall_back() {
        let localizer = localizer(
            json!({"nav": {"home": "Home", "about": "About"}}),
            json!({"nav": {"home": null}}),
        );
        assert_eq!(localizer.resolve(Language::Lao, "nav.home", None), "Home");
        assert_eq!(localizer.resolve(Language::Lao, "nav.about", None), "About");
    }

    #[test]
    fn active_language_wins_when_present() {
        let localizer = localizer(json!({"nav": {"home": "Home"}}), json!({"nav": {"home": "ໜ້າຫຼັກ"}}));
        assert_eq!(localizer.resolve(Language::Lao, "nav.home", None), "ໜ້າຫຼັກ");
    }

    #[test]
    fn fallback_text_precedes_placeholder() {
        let localizer = localizer(json!({}), json!({}));
        assert_eq!(
            localizer.resolve(Language::Lao, "hero.title", Some("Building Laos")),
            "Building Laos"
        );
        assert_eq!(
            localizer.resolve(Language::Lao, "hero.title", Some("")),
            "[MISSING: hero.title] Title"
        );
    }

    #[test]
    fn placeholder_contains_humanized_last_segment() {
        let localizer = localizer(json!({}), json!({}));
        let value = localizer.resolve(Language::English, "contact.form.send_button", None);
        assert_eq!(value, "[MISSING: contact.form.send_button] Send Button");
        assert!(value.contains("send_button"));
    }

    #[test]
    fn object_nodes_are_not_leaves() {
        let localizer = localizer(json!({"nav": {"home": "Home"}}), json!({}));
        assert_eq!(localizer.resolve(Language::English, "nav", None), "[MISSING: nav] Nav");
    }

    #[test]
    fn every_default_key_resolves_to_text() {
        let localizer = localizer(
            json!({"a": {"b": "B", "c": "C"}, "d": "D"}),
            json!({"a": {"b": "ບ"}}),
        );
        let keys = localizer.dictionary(Language::English).unwrap().leaf_keys();
        for key in keys {
            for language in Language::all() {
                assert!(!localizer.resolve(*language, &key, None).is_empty());
            }
        }
    }

    #[test]
    fn humanize_handles_snake_kebab_and_camel_case() {
        assert_eq!(humanize("send_button"), "Send Button");
        assert_eq!(humanize("hero-title"), "Hero Title");
        assert_eq!(humanize("sendButton"), "Send Button");
        assert_eq!(humanize("home"), "Home");
        assert_eq!(humanize("step2Title"), "Step2 Title");
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        title: String,
    }

    #[test]
    fn resolve_items_falls_back_on_empty_array() {
        let localizer = localizer(
            json!({"services": {"items": [{"title": "Design"}]}}),
            json!({"services": {"items": []}}),
        );
        assert_eq!(
            localizer.resolve_items::<Item>(Language::Lao, "services.items"),
            vec![Item { title: "Design".into() }]
        );
        assert!(localizer
            .resolve_items::<Item>(Language::Lao, "services.missing")
            .is_empty());
    }

    #[test]
    fn missing_keys_reports_parity_gaps() {
        let localizer = localizer(
            json!({"nav": {"home": "Home", "about": "About"}, "list": ["x"]}),
            json!({"nav": {"home": "ໜ້າຫຼັກ", "about": ""}}),
        );
        assert_eq!(localizer.missing_keys(Language::Lao), vec!["list", "nav.about"]);
        assert!(localizer.missing_keys(Language::English).is_empty());
    }
}
