use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, Uri},
    response::{IntoResponse, Json, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::app_state::AppState;
use crate::error::{AppError, AppResult};
use crate::i18n::{
    extract_translations_for_client, DictionarySource, I18n, Language, LanguagePreference,
};
use crate::storage::CookieStorage;

/// Keys returned when the client asks for translations without naming any.
const DEFAULT_CLIENT_KEYS: &[&str] = &[
    "site.name",
    "nav.home",
    "nav.about",
    "nav.projects",
    "nav.contact",
    "nav.menu",
    "errors.generic",
    "projects.error.load",
    "projects.error.retry",
    "projects.empty",
];

#[derive(Debug, Deserialize)]
pub struct TranslationQuery {
    pub keys: Option<String>, // Comma-separated list of keys
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LanguageInfo {
    pub code: String,
    pub name: String,
    pub locale: String,
    pub is_default: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<DictionarySource>,
}

#[derive(Debug, Serialize)]
pub struct SupportedLanguagesResponse {
    pub languages: Vec<LanguageInfo>,
    pub default_language: String,
}

#[derive(Debug, Serialize)]
pub struct TranslationsResponse {
    pub translations: BTreeMap<String, String>,
    pub language: String,
    pub requested_keys: Vec<String>,
}

fn language_info(state: &AppState, language: Language) -> LanguageInfo {
    LanguageInfo {
        code: language.code().to_string(),
        name: language.name().to_string(),
        locale: language.locale().to_string(),
        is_default: language == state.localizer.default_language(),
        source: state.localizer.source(language),
    }
}

/// Get all supported languages
pub async fn get_supported_languages(State(state): State<AppState>) -> Json<SupportedLanguagesResponse> {
    let languages = state
        .localizer
        .supported_languages()
        .iter()
        .map(|language| language_info(&state, *language))
        .collect();

    Json(SupportedLanguagesResponse {
        languages,
        default_language: state.localizer.default_language().code().to_string(),
    })
}

/// Get translations for specific keys
pub async fn get_translations(
    State(state): State<AppState>,
    i18n: I18n,
    Query(query): Query<TranslationQuery>,
) -> AppResult<Json<TranslationsResponse>> {
    let language = match query.language {
        Some(code) => code
            .parse::<Language>()
            .map_err(|e| AppError::BadRequest(e.to_string()))?,
        None => i18n.language(),
    };

    let keys: Vec<String> = match query.keys {
        Some(keys) => keys
            .split(',')
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string)
            .collect(),
        None => DEFAULT_CLIENT_KEYS.iter().map(|key| key.to_string()).collect(),
    };
    let key_refs: Vec<&str> = keys.iter().map(String::as_str).collect();

    let translations = extract_translations_for_client(&state.localizer, language, &key_refs);

    Ok(Json(TranslationsResponse {
        translations,
        language: language.code().to_string(),
        requested_keys: keys,
    }))
}

/// Get current language information
pub async fn get_current_language(State(state): State<AppState>, i18n: I18n) -> Json<LanguageInfo> {
    Json(language_info(&state, i18n.language()))
}

/// The effective dictionary for `{code}.json`, whichever source it came from.
pub async fn get_locale_file(
    State(state): State<AppState>,
    Path(file): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    let language = file
        .strip_suffix(".json")
        .and_then(|code| code.parse::<Language>().ok())
        .ok_or_else(|| AppError::NotFound(format!("locale file {file}")))?;

    state
        .localizer
        .dictionary(language)
        .map(|dictionary| Json(dictionary.as_value().clone()))
        .ok_or_else(|| AppError::ServiceUnavailable(format!("no dictionary loaded for {language}")))
}

/// Path of the page the visitor came from; the host part is dropped.
fn return_path(headers: &HeaderMap) -> String {
    headers
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<Uri>().ok())
        .map(|uri| uri.path().to_string())
        .filter(|path| path.starts_with('/') && !path.starts_with("//") && !path.starts_with("/lang/"))
        .unwrap_or_else(|| "/".to_string())
}

/// Language switch: persist the choice as a cookie and go back.
pub async fn switch_language(Path(code): Path<String>, headers: HeaderMap) -> Response {
    let storage = Arc::new(CookieStorage::from_headers(&headers));
    let preference = LanguagePreference::new(storage.clone());

    match code.parse::<Language>() {
        Ok(language) => match preference.store(language) {
            Ok(()) => info!(language = %language, "Language preference updated"),
            Err(e) => warn!("Failed to persist language preference: {}", e),
        },
        Err(e) => warn!("Rejected language switch: {}", e),
    }

    let mut response = Redirect::to(&return_path(&headers)).into_response();
    for cookie in storage.take_set_cookies() {
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }
    response
}
