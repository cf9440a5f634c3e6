use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::{Deserialize, Serialize};

use crate::app_state::AppState;
use crate::error::{AppError, AppResult};
use crate::site::{ProjectRecord, ProjectStatus};

#[derive(Debug, Deserialize)]
pub struct ProjectListQuery {
    pub status: Option<ProjectStatus>,
}

#[derive(Debug, Serialize)]
pub struct ProjectListResponse {
    pub projects: Vec<ProjectRecord>,
    pub total: usize,
}

/// List projects, optionally limited to one status tab.
pub async fn list_projects(
    State(state): State<AppState>,
    Query(query): Query<ProjectListQuery>,
) -> AppResult<Json<ProjectListResponse>> {
    let catalog = state.catalog().await;
    if let Some(error) = catalog.error() {
        return Err(AppError::ServiceUnavailable(error.to_string()));
    }

    let collection = catalog.collection();
    let projects: Vec<ProjectRecord> = match query.status {
        Some(status) => collection
            .filter_by_status(status)
            .into_iter()
            .cloned()
            .collect(),
        None => collection.iter().cloned().collect(),
    };

    Ok(Json(ProjectListResponse {
        total: projects.len(),
        projects,
    }))
}

pub async fn get_project(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<ProjectRecord>> {
    let catalog = state.catalog().await;
    catalog
        .collection()
        .find(&slug)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("project {slug}")))
}
