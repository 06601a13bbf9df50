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
        proposaldtos::{CreateProposalDto, ProposalQuery, RespondToProposalDto},
    },
    error::HttpError,
    middleware::{auth, JWTAuthMiddleware},
    models::{projectmodel::ProjectStatus, proposalmodel::ProposalStatus},
    AppState,
};

pub fn proposals_handler() -> Router {
    Router::new()
        .route("/", get(list_proposals).post(create_proposal))
        .route("/:proposal_id/respond", put(respond_to_proposal))
        .route("/:proposal_id/withdraw", put(withdraw_proposal))
        .layer(middleware::from_fn(auth))
}

pub async fn list_proposals(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Query(query): Query<ProposalQuery>,
) -> Result<impl IntoResponse, HttpError> {
    let proposals = match query.project_id {
        Some(project_id) => {
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

            app_state
                .db_client
                .get_proposals_for_project(project_id)
                .await
                .map_err(|e| HttpError::server_error(e.to_string()))?
        }
        None => app_state
            .db_client
            .get_proposals_by_freelancer(auth.user.id)
            .await
            .map_err(|e| HttpError::server_error(e.to_string()))?,
    };

    Ok(Json(ApiResponse::success(proposals)))
}

pub async fn create_proposal(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Json(body): Json<CreateProposalDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    if !auth.user.user_type.can_submit_proposals() {
        return Err(HttpError::forbidden(
            "Only freelancers can submit proposals",
        ));
    }

    let project = app_state
        .db_client
        .get_project_by_id(body.project_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Project not found"))?;

    if project.client_id == auth.user.id {
        return Err(HttpError::forbidden(
            "You cannot submit a proposal on your own project",
        ));
    }

    if project.status != ProjectStatus::Open {
        return Err(HttpError::bad_request(
            "Project is not open for proposals",
        ));
    }

    // The unique (project, freelancer) index backs this up under
    // concurrent submissions
    let proposal = app_state
        .db_client
        .create_proposal(
            body.project_id,
            auth.user.id,
            body.cover_letter,
            body.proposed_budget,
            body.proposed_timeline,
        )
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                HttpError::unique_constraint_violation(
                    "You have already submitted a proposal for this project",
                )
            }
            _ => HttpError::server_error(e.to_string()),
        })?;

    Ok(Json(ApiResponse::success_with_message(
        "Proposal submitted successfully",
        proposal,
    )))
}

pub async fn respond_to_proposal(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Path(proposal_id): Path<Uuid>,
    Json(body): Json<RespondToProposalDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    if body.response != "accepted" && body.response != "rejected" {
        return Err(HttpError::bad_request(
            "Response must be 'accepted' or 'rejected'",
        ));
    }

    let proposal = app_state
        .db_client
        .get_proposal_by_id(proposal_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Proposal not found"))?;

    let project = app_state
        .db_client
        .get_project_by_id(proposal.project_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Project not found"))?;

    if project.client_id != auth.user.id {
        return Err(HttpError::forbidden(
            "Only the project owner can respond to proposals",
        ));
    }

    if proposal.status.is_terminal() {
        return Err(HttpError::bad_request(format!(
            "Proposal has already been {}",
            proposal.status.to_str()
        )));
    }

    if body.response == "accepted" {
        let (accepted, contract) = app_state
            .db_client
            .accept_proposal(proposal_id)
            .await
            .map_err(|e| HttpError::server_error(e.to_string()))?;

        Ok(Json(ApiResponse::success_with_message(
            "Proposal accepted",
            serde_json::json!({
                "proposal": accepted,
                "contract": contract,
            }),
        )))
    } else {
        let rejected = app_state
            .db_client
            .update_proposal_status(proposal_id, ProposalStatus::Rejected)
            .await
            .map_err(|e| HttpError::server_error(e.to_string()))?;

        Ok(Json(ApiResponse::success_with_message(
            "Proposal rejected",
            serde_json::json!({ "proposal": rejected }),
        )))
    }
}

pub async fn withdraw_proposal(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Path(proposal_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let proposal = app_state
        .db_client
        .get_proposal_by_id(proposal_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Proposal not found"))?;

    if proposal.freelancer_id != auth.user.id {
        return Err(HttpError::forbidden(
            "Only the proposal owner can withdraw it",
        ));
    }

    if proposal.status.is_terminal() {
        return Err(HttpError::bad_request(format!(
            "Proposal has already been {}",
            proposal.status.to_str()
        )));
    }

    let withdrawn = app_state
        .db_client
        .update_proposal_status(proposal_id, ProposalStatus::Withdrawn)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success_with_message(
        "Proposal withdrawn",
        withdrawn,
    )))
}
