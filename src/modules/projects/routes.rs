use axum::{routing::get, Router};

use super::handlers::{get_project, list_projects};
use crate::app_state::AppState;

pub fn project_routes() -> Router<AppState> {
    Router::new()
        .route("/projects", get(list_projects))
        .route("/projects/{slug}", get(get_project))
}
