use axum::{routing::get, Router};

use super::handlers::{
    get_current_language, get_locale_file, get_supported_languages, get_translations,
    switch_language,
};
use crate::app_state::AppState;

/// JSON endpoints, nested under `/api`
pub fn create_i18n_routes() -> Router<AppState> {
    Router::new()
        .route("/languages", get(get_supported_languages))
        .route("/translations", get(get_translations))
        .route("/current-language", get(get_current_language))
}

/// Browser-facing language routes
pub fn language_switch_routes() -> Router<AppState> {
    Router::new()
        .route("/lang/{code}", get(switch_language))
        .route("/locales/{file}", get(get_locale_file))
}
