use std::sync::Arc;

use axum::{routing::get, Extension, Json, Router};
use tower_http::trace::TraceLayer;
use serde_json::json;

use crate::{
    handler::{
        auth::auth_handler, messages::messages_handler, payments::payments_handler,
        projects::projects_handler, proposals::proposals_handler, reviews::reviews_handler,
        users::users_handler,
    },
    AppState,
};

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "Server is running"
    }))
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let api_route = Router::new()
        .nest("/auth", auth_handler())
        .nest("/users", users_handler())
        .nest("/projects", projects_handler())
        .nest("/proposals", proposals_handler())
        .nest("/messages", messages_handler())
        .nest("/reviews", reviews_handler())
        .nest("/payments", payments_handler())
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_route)
}
