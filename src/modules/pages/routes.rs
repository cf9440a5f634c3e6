use axum::{routing::get, Router};

use super::handlers::{about_page, contact_page, home_page, project_detail_page, projects_page};
use crate::app_state::AppState;

pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home_page))
        .route("/index.html", get(home_page))
        .route("/about", get(about_page))
        .route("/about.html", get(about_page))
        .route("/projects", get(projects_page))
        .route("/projects.html", get(projects_page))
        .route("/projects/{slug}", get(project_detail_page))
        .route("/contact", get(contact_page))
        .route("/contact.html", get(contact_page))
}
