use axum::{extract::State, middleware, routing::get, Json, Router};
use serde_json::json;
use tower_http::{catch_panic::CatchPanicLayer, services::ServeDir};

use crate::{
    app_state::AppState,
    i18n::Language,
    middleware::{language_middleware, observability_middleware},
    modules::{
        i18n::routes::{create_i18n_routes, language_switch_routes},
        pages::{handlers::not_found_page, routes::page_routes},
        projects::routes::project_routes,
    },
};

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(create_i18n_routes())
        .merge(project_routes());

    Router::new()
        .merge(page_routes())
        .merge(language_switch_routes())
        .route("/health", get(health_check))
        .nest("/api", api)
        .nest_service("/static", ServeDir::new(&state.env.app.static_dir))
        .fallback(not_found_page)
        .layer(middleware::from_fn_with_state(state.clone(), language_middleware))
        .layer(middleware::from_fn(observability_middleware))
        .layer(CatchPanicLayer::new())
        .with_state(state)
}

async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let catalog = state.catalog().await;
    let dictionaries: serde_json::Map<String, serde_json::Value> = Language::all()
        .iter()
        .map(|language| {
            (
                language.code().to_string(),
                json!(state.localizer.source(*language)),
            )
        })
        .collect();

    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "services": {
            "dictionaries": dictionaries,
            "projects": {
                "count": catalog.collection().len(),
                "error": catalog.error(),
            }
        }
    }))
}
