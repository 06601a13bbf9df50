use std::sync::Arc;

use axum::{
    extract::Query,
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use validator::Validate;

use crate::{
    dtos::{
        common::ApiResponse,
        reviewdtos::{CreateReviewDto, ReviewsQuery},
    },
    error::HttpError,
    middleware::{auth, JWTAuthMiddleware},
    AppState,
};

pub fn reviews_handler() -> Router {
    // Reading reviews is public; writing one requires a session
    Router::new().route(
        "/",
        get(get_reviews).merge(post(create_review).layer(middleware::from_fn(auth))),
    )
}

pub async fn get_reviews(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<ReviewsQuery>,
) -> Result<impl IntoResponse, HttpError> {
    let reviews = if let Some(user_id) = query.user_id {
        app_state.review_service.list_reviews_for_user(user_id).await?
    } else if let Some(project_id) = query.project_id {
        app_state
            .review_service
            .list_reviews_for_project(project_id)
            .await?
    } else {
        return Err(HttpError::bad_request("user_id or project_id required"));
    };

    Ok(Json(ApiResponse::success(serde_json::json!({
        "reviews": reviews
    }))))
}

pub async fn create_review(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Json(body): Json<CreateReviewDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let review = app_state
        .review_service
        .create_review(auth.user.id, body)
        .await?;

    Ok(Json(ApiResponse::success_with_message(
        "Review submitted successfully",
        serde_json::json!({ "reviewId": review.id, "review": review }),
    )))
}
