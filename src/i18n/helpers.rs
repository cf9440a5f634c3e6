use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use std::sync::Arc;

use crate::app_state::AppState;
use crate::i18n::{Language, Localizer};

/// Extractor for getting localized messages in handlers
pub struct I18n {
    pub localizer: Arc<Localizer>,
    pub language: Language,
}

impl I18n {
    /// Get a localized message
    pub fn get(&self, key: &str) -> String {
        self.localizer.resolve(self.language, key, None)
    }

    /// Get the current language
    pub fn language(&self) -> Language {
        self.language
    }
}

impl FromRequestParts<AppState> for I18n {
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Set by the language middleware
        let language = parts
            .extensions
            .get::<Language>()
            .copied()
            .unwrap_or_else(|| state.localizer.default_language());

        Ok(I18n {
            localizer: state.localizer.clone(),
            language,
        })
    }
}
