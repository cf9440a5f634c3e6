use axum::{
    extract::{Query, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use crate::app_state::AppState;
use crate::i18n::{Language, LanguagePreference};
use crate::storage::CookieStorage;

pub const LANGUAGE_HEADER: &str = "X-Language";

#[derive(Debug, Deserialize)]
struct LanguageQuery {
    lang: Option<String>,
}

/// Resolve the request language and store it in the request extensions.
pub async fn language_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let query_language = Query::<LanguageQuery>::try_from_uri(request.uri())
        .ok()
        .and_then(|Query(query)| query.lang)
        .and_then(|code| code.parse::<Language>().ok());

    let language = query_language.unwrap_or_else(|| {
        detect_language_from_headers(request.headers(), state.localizer.default_language())
    });
    debug!(language = %language, "Resolved request language");

    request.extensions_mut().insert(language);
    next.run(request).await
}

/// Priority order after an explicit `?lang=`:
/// 1. `language` cookie (the stored preference)
/// 2. X-Language header
/// 3. Accept-Language header
pub fn detect_language_from_headers(headers: &HeaderMap, default: Language) -> Language {
    let preference = LanguagePreference::new(Arc::new(CookieStorage::from_headers(headers)));
    if let Some(language) = preference.stored() {
        return language;
    }

    if let Some(language) = headers
        .get(LANGUAGE_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<Language>().ok())
    {
        return language;
    }

    headers
        .get(axum::http::header::ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok())
        .and_then(Language::from_accept_language)
        .unwrap_or(default)
}
