use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    middleware,
    response::IntoResponse,
    routing::{get, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::userdb::UserExt,
    dtos::{
        common::ApiResponse,
        userdtos::{FilterUserDto, PublicUserDto, TopFreelancersQuery, UpdateProfileDto, UserData},
    },
    error::HttpError,
    middleware::{auth, JWTAuthMiddleware},
    AppState,
};

pub fn users_handler() -> Router {
    Router::new()
        .route("/me", put(update_profile).layer(middleware::from_fn(auth)))
        .route("/freelancers/top", get(get_top_freelancers))
        .route("/:user_id", get(get_user_profile))
}

pub async fn update_profile(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Json(body): Json<UpdateProfileDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let updated_user = app_state
        .db_client
        .update_user_profile(
            auth.user.id,
            body.first_name,
            body.last_name,
            body.bio,
            body.location,
            body.hourly_rate,
            body.avatar_url,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(UserData {
        user: FilterUserDto::filter_user(&updated_user),
    })))
}

pub async fn get_user_profile(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let user = app_state
        .db_client
        .get_user(Some(user_id), None)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("User not found"))?;

    Ok(Json(ApiResponse::success(PublicUserDto::from_user(&user))))
}

pub async fn get_top_freelancers(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<TopFreelancersQuery>,
) -> Result<impl IntoResponse, HttpError> {
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let limit = query.limit.unwrap_or(10) as i64;

    let freelancers = app_state
        .db_client
        .get_top_freelancers(limit)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(PublicUserDto::from_users(
        &freelancers,
    ))))
}
