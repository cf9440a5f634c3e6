use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "lo")]
    Lao,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported language: {0}")]
pub struct UnsupportedLanguage(pub String);

impl Language {
    /// Get all supported languages
    pub fn all() -> &'static [Language] {
        &[Language::English, Language::Lao]
    }

    /// Get the language code as a string
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Lao => "lo",
        }
    }

    /// Get the human-readable name, in the language itself
    pub fn name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Lao => "ລາວ",
        }
    }

    /// Locale tag used for `og:locale`
    pub fn locale(&self) -> &'static str {
        match self {
            Language::English => "en_US",
            Language::Lao => "lo_LA",
        }
    }

    /// Short label shown on the language switcher
    pub fn short_label(&self) -> &'static str {
        match self {
            Language::English => "EN",
            Language::Lao => "ລາວ",
        }
    }

    /// Parse from Accept-Language header
    pub fn from_accept_language(accept_language: &str) -> Option<Self> {
        accept_language
            .split(',')
            .filter_map(|part| part.trim().split(';').next())
            .find_map(|tag| tag.trim().parse::<Language>().ok())
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::English
    }
}

impl Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Language {
    type Err = UnsupportedLanguage;

    /// Accepts a bare code or a code with a region subtag (`lo-LA`, `en_US`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let primary = s
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match primary.as_str() {
            "en" => Ok(Language::English),
            "lo" => Ok(Language::Lao),
            _ => Err(UnsupportedLanguage(s.to_string())),
        }
    }
}
