use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    middleware,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::paymentdb::PaymentExt,
    dtos::{
        common::ApiResponse,
        paymentdtos::{
            AddPaymentMethodDto, CreateMilestonesDto, EscrowFundingResponse, FundEscrowDto,
            GatewayConfirmationDto, MilestonesQuery, ReleasePaymentDto,
        },
    },
    error::HttpError,
    middleware::{auth, JWTAuthMiddleware},
    AppState,
};

pub fn payments_handler() -> Router {
    let protected_routes = Router::new()
        .route("/escrow", post(fund_escrow))
        .route("/escrow/:contract_id", get(get_escrow_account))
        .route("/milestones", post(create_milestones).get(list_milestones))
        .route("/milestones/:milestone_id/start", put(start_milestone))
        .route("/milestones/:milestone_id/submit", put(submit_milestone))
        .route("/milestones/:milestone_id/approve", put(approve_milestone))
        .route("/release", post(release_payment))
        .route("/transactions", get(get_transaction_history))
        .route("/methods", get(get_payment_methods).post(add_payment_method))
        .route("/methods/:method_id", delete(remove_payment_method))
        .layer(middleware::from_fn(auth));

    // Gateway-facing; authenticated by reference, not by session
    let public_routes = Router::new().route("/webhook/confirm", post(confirm_gateway));

    Router::new().merge(protected_routes).merge(public_routes)
}

pub async fn fund_escrow(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Json(body): Json<FundEscrowDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let (escrow_account, transaction) = app_state
        .payment_service
        .create_and_fund_escrow(
            auth.user.id,
            body.contract_id,
            body.amount,
            body.payment_method_id,
        )
        .await?;

    Ok(Json(ApiResponse::success_with_message(
        "Escrow funding initiated",
        EscrowFundingResponse {
            escrow_account,
            transaction,
        },
    )))
}

pub async fn get_escrow_account(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Path(contract_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let escrow = app_state
        .payment_service
        .get_escrow_for_contract(auth.user.id, contract_id)
        .await?;

    Ok(Json(ApiResponse::success(escrow)))
}

pub async fn confirm_gateway(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<GatewayConfirmationDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let transaction = app_state
        .payment_service
        .confirm_gateway(&body.gateway_reference, body.status)
        .await?;

    Ok(Json(ApiResponse::success(transaction)))
}

pub async fn create_milestones(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Json(body): Json<CreateMilestonesDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let milestones = app_state
        .payment_service
        .create_milestones(auth.user.id, body.contract_id, body.milestones)
        .await?;

    Ok(Json(ApiResponse::success_with_message(
        "Milestones created successfully",
        milestones,
    )))
}

pub async fn list_milestones(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Query(query): Query<MilestonesQuery>,
) -> Result<impl IntoResponse, HttpError> {
    let milestones = app_state
        .payment_service
        .list_milestones(auth.user.id, query.contract_id)
        .await?;

    Ok(Json(ApiResponse::success(milestones)))
}

pub async fn start_milestone(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Path(milestone_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let milestone = app_state
        .payment_service
        .start_milestone(auth.user.id, milestone_id)
        .await?;

    Ok(Json(ApiResponse::success(milestone)))
}

pub async fn submit_milestone(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Path(milestone_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let milestone = app_state
        .payment_service
        .submit_milestone(auth.user.id, milestone_id)
        .await?;

    Ok(Json(ApiResponse::success(milestone)))
}

pub async fn approve_milestone(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Path(milestone_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let milestone = app_state
        .payment_service
        .approve_milestone(auth.user.id, milestone_id)
        .await?;

    Ok(Json(ApiResponse::success(milestone)))
}

pub async fn release_payment(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Json(body): Json<ReleasePaymentDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let (escrow, milestone, transaction) = app_state
        .payment_service
        .release_milestone_payment(auth.user.id, body.escrow_id, body.milestone_id, body.amount)
        .await?;

    Ok(Json(ApiResponse::success_with_message(
        "Payment released successfully",
        serde_json::json!({
            "escrowAccount": escrow,
            "milestone": milestone,
            "transaction": transaction,
        }),
    )))
}

pub async fn get_transaction_history(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let transactions = app_state
        .db_client
        .get_transactions_for_user(auth.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(transactions)))
}

pub async fn get_payment_methods(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let methods = app_state
        .db_client
        .get_payment_methods_for_user(auth.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(methods)))
}

pub async fn add_payment_method(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Json(body): Json<AddPaymentMethodDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let method = app_state
        .db_client
        .add_payment_method(
            auth.user.id,
            body.method_type,
            body.last4,
            body.brand,
            body.expiry_month,
            body.expiry_year,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success_with_message(
        "Payment method added successfully",
        method,
    )))
}

pub async fn remove_payment_method(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Path(method_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let method = app_state
        .db_client
        .get_payment_method_by_id(method_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Payment method not found"))?;

    if method.user_id != auth.user.id {
        return Err(HttpError::forbidden(
            "You can only remove your own payment methods",
        ));
    }

    app_state
        .db_client
        .delete_payment_method(method_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::<()> {
        success: true,
        data: None,
        message: Some("Payment method removed".to_string()),
    }))
}
