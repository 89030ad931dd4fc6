use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use crates::{
    domain::repositories::credits::CreditRepository,
    infra::db::{postgres::postgres_connection::PgPoolArena, repositories::credits::CreditPostgres},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    axum_http::error_responses::AppError,
    usecases::interview_credits::InterviewCreditsUseCase,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UseCreditRequest {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UseCreditResponse {
    pub success: bool,
    pub remaining_credits: i32,
}

#[derive(Debug, Serialize)]
pub struct CreditBalanceResponse {
    pub credits: i32,
}

pub fn routes(db_pool: Arc<PgPoolArena>) -> Router {
    let repository: Arc<dyn CreditRepository + Send + Sync> =
        Arc::new(CreditPostgres::new(db_pool));
    let usecase = InterviewCreditsUseCase::new(repository);

    Router::new()
        .route("/use-credit", post(use_credit))
        .route("/credits", get(credit_balance))
        .with_state(Arc::new(usecase))
}

/// Balance for the authenticated caller.
pub async fn credit_balance(
    State(usecase): State<Arc<InterviewCreditsUseCase>>,
    user: AuthUser,
) -> Response {
    match usecase.balance(user.user_id).await {
        Ok(Some(credits)) => Json(CreditBalanceResponse { credits }).into_response(),
        Ok(None) => AppError::NotFound("No profile for this user".to_string()).into_response(),
        Err(err) => {
            error!(user_id = %user.user_id, error = ?err, "interviews: balance lookup failed");
            AppError::Internal(err).into_response()
        }
    }
}

pub async fn use_credit(
    State(usecase): State<Arc<InterviewCreditsUseCase>>,
    user: AuthUser,
    Json(payload): Json<UseCreditRequest>,
) -> Response {
    // A user may only spend their own credit.
    if user.user_id != payload.user_id {
        warn!(
            authenticated = %user.user_id,
            requested = %payload.user_id,
            "use-credit refused: user mismatch"
        );
        return AppError::Forbidden("User mismatch when attempting to use credit".to_string())
            .into_response();
    }

    info!(user_id = %payload.user_id, "interviews: use-credit request received");

    match usecase.use_credit(payload.user_id).await {
        Ok(Some(remaining)) => Json(UseCreditResponse {
            success: true,
            remaining_credits: remaining,
        })
        .into_response(),
        Ok(None) => {
            AppError::PaymentRequired("No interview credits remaining".to_string()).into_response()
        }
        Err(err) => {
            error!(user_id = %payload.user_id, error = ?err, "interviews: use-credit failed");
            AppError::Internal(err).into_response()
        }
    }
}
