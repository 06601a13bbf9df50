use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{projectdb::ProjectExt, proposaldb::ProposalExt},
    dtos::{
        common::ApiResponse,
        projectdtos::{CreateProjectDto, ProjectFilterQuery, UpdateProjectStatusDto},
    },
    error::HttpError,
    middleware::{auth, JWTAuthMiddleware},
    models::projectmodel::PriorityLevel,
    AppState,
};

pub fn projects_handler() -> Router {
    // Browsing is public; everything that writes (or exposes client-only
    // data) sits behind the auth middleware
    Router::new()
        .route(
            "/",
            get(list_projects).merge(post(create_project).layer(middleware::from_fn(auth))),
        )
        .route("/:project_id", get(get_project))
        .route(
            "/:project_id/status",
            put(update_project_status).layer(middleware::from_fn(auth)),
        )
        .route(
            "/:project_id/proposals",
            get(list_project_proposals).layer(middleware::from_fn(auth)),
        )
}

pub async fn list_projects(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(filters): Query<ProjectFilterQuery>,
) -> Result<impl IntoResponse, HttpError> {
    // "all" from the category picker means no category filter
    let category = filters
        .category
        .filter(|c| !c.is_empty() && c.to_lowercase() != "all");
    let search = filters.search.filter(|s| !s.is_empty());

    let projects = app_state
        .db_client
        .list_projects(category, search, filters.min_budget, filters.max_budget)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(projects)))
}

pub async fn get_project(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(project_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let project = app_state
        .db_client
        .view_project(project_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Project not found"))?;

    Ok(Json(ApiResponse::success(project)))
}

pub async fn create_project(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Json(body): Json<CreateProjectDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    if !auth.user.user_type.can_post_projects() {
        return Err(HttpError::forbidden("Only clients can post projects"));
    }

    let project = app_state
        .db_client
        .create_project(
            auth.user.id,
            body.title,
            body.description,
            body.category,
            body.budget_min,
            body.budget_max,
            body.project_type,
            body.duration_estimate.unwrap_or_default(),
            body.priority.unwrap_or(PriorityLevel::Medium),
            body.deadline,
            body.required_skills,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success_with_message(
        "Project created successfully",
        project,
    )))
}

pub async fn update_project_status(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Path(project_id): Path<Uuid>,
    Json(body): Json<UpdateProjectStatusDto>,
) -> Result<impl IntoResponse, HttpError> {
    let project = app_state
        .db_client
        .get_project_by_id(project_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Project not found"))?;

    if project.client_id != auth.user.id {
        return Err(HttpError::forbidden(
            "Only the project owner can change its status",
        ));
    }

    if !project.status.can_transition_to(body.status) {
        return Err(HttpError::bad_request(format!(
            "Project cannot move from {} to {}",
            project.status.to_str(),
            body.status.to_str()
        )));
    }

    let updated = app_state
        .db_client
        .update_project_status(project_id, body.status)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(updated)))
}

pub async fn list_project_proposals(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Path(project_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let project = app_state
        .db_client
        .get_project_by_id(project_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Project not found"))?;

    if project.client_id != auth.user.id {
        return Err(HttpError::forbidden(
            "Only the project owner can view its proposals",
        ));
    }

    let proposals = app_state
        .db_client
        .get_proposals_for_project(project_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(proposals)))
}
