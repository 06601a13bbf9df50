use std::sync::Arc;

use axum::{
    extract::Query,
    middleware,
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use validator::Validate;

use crate::{
    db::{messagedb::MessageExt, projectdb::ProjectExt, userdb::UserExt},
    dtos::{
        common::ApiResponse,
        messagedtos::{MessagesQuery, SendMessageDto},
    },
    error::HttpError,
    middleware::{auth, JWTAuthMiddleware},
    models::messagemodel::{conversation_id_for, conversation_involves},
    AppState,
};

pub fn messages_handler() -> Router {
    Router::new()
        .route("/", get(get_messages).post(send_message))
        .layer(middleware::from_fn(auth))
}

/// With `conversation_id`: the messages of that conversation, oldest
/// first. Without it: the caller's conversation list, most recent first.
pub async fn get_messages(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Query(query): Query<MessagesQuery>,
) -> Result<impl IntoResponse, HttpError> {
    if let Some(conversation_id) = query.conversation_id {
        if !conversation_involves(&conversation_id, auth.user.id) {
            return Err(HttpError::forbidden(
                "Not authorized to view this conversation",
            ));
        }

        let messages = app_state
            .db_client
            .get_conversation_messages(&conversation_id)
            .await
            .map_err(|e| HttpError::server_error(e.to_string()))?;

        Ok(Json(ApiResponse::success(serde_json::json!({
            "messages": messages
        }))))
    } else {
        let conversations = app_state
            .db_client
            .get_user_conversations(auth.user.id)
            .await
            .map_err(|e| HttpError::server_error(e.to_string()))?;

        Ok(Json(ApiResponse::success(serde_json::json!({
            "conversations": conversations
        }))))
    }
}

pub async fn send_message(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Json(body): Json<SendMessageDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    if body.recipient_id == auth.user.id {
        return Err(HttpError::bad_request(
            "You cannot send a message to yourself",
        ));
    }

    app_state
        .db_client
        .get_user(Some(body.recipient_id), None)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Recipient not found"))?;

    if let Some(project_id) = body.project_id {
        app_state
            .db_client
            .get_project_by_id(project_id)
            .await
            .map_err(|e| HttpError::server_error(e.to_string()))?
            .ok_or_else(|| HttpError::not_found("Project not found"))?;
    }

    let conversation_id = conversation_id_for(auth.user.id, body.recipient_id, body.project_id);

    let message = app_state
        .db_client
        .send_message(
            conversation_id,
            auth.user.id,
            body.recipient_id,
            body.project_id,
            body.content,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(serde_json::json!({
        "message": message
    }))))
}
