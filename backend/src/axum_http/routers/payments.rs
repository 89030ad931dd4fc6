use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::post,
};
use crates::{
    domain::repositories::{credits::CreditRepository, payment_orders::PaymentOrderRepository},
    infra::db::{
        postgres::postgres_connection::PgPoolArena,
        repositories::{credits::CreditPostgres, payment_orders::PaymentOrderPostgres},
    },
    payments::{PaymentGateway, xpay_client::{NewDirectOrder, XPayClient}},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    axum_http::error_responses::AppError,
    config::config_model::DotEnvyConfig,
    usecases::payments::{PaymentsUseCase, VerifyOutcome},
};

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub amount_in_cents: i64,
    pub product_description: String,
    pub variable_amount_id: i64,
    pub user_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateOrderResponse {
    pub payment_url: String,
    pub payment_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentRequest {
    pub payment_token: String,
    pub user_id: Uuid,
    pub credits_to_award: i32,
}

#[derive(Debug, Serialize)]
pub struct VerifyPaymentResponse {
    pub success: bool,
    pub verified: bool,
    pub credits_updated: bool,
}

pub fn routes(db_pool: Arc<PgPoolArena>, config: Arc<DotEnvyConfig>) -> Router {
    let gateway: Arc<dyn PaymentGateway + Send + Sync> = Arc::new(XPayClient::new(
        config.xpay.api_key.clone(),
        config.xpay.community_id.clone(),
        config.xpay.base_url.clone(),
        config.xpay.callback_url.clone(),
    ));
    let credit_repository: Arc<dyn CreditRepository + Send + Sync> =
        Arc::new(CreditPostgres::new(Arc::clone(&db_pool)));
    let order_repository: Arc<dyn PaymentOrderRepository + Send + Sync> =
        Arc::new(PaymentOrderPostgres::new(db_pool));

    let usecase = PaymentsUseCase::new(gateway, credit_repository, order_repository);

    Router::new()
        .route("/create", post(create_order))
        .route("/verify", post(verify_payment))
        .with_state(Arc::new(usecase))
}

pub async fn create_order(
    State(usecase): State<Arc<PaymentsUseCase>>,
    user: AuthUser,
    Json(payload): Json<CreateOrderRequest>,
) -> Response {
    if payload.amount_in_cents <= 0 {
        return AppError::BadRequest("amount_in_cents must be positive".to_string())
            .into_response();
    }
    if payload.product_description.trim().is_empty() {
        return AppError::BadRequest("product_description is required".to_string())
            .into_response();
    }

    let Some(user_email) = user.email.clone() else {
        return AppError::BadRequest("authenticated user has no email".to_string())
            .into_response();
    };

    info!(user_id = %user.user_id, "payments: create order request received");

    let order = NewDirectOrder {
        user_id: user.user_id,
        user_name: payload.user_name.unwrap_or_else(|| user_email.clone()),
        user_email,
        amount_in_cents: payload.amount_in_cents,
        product_description: payload.product_description,
        variable_amount_id: payload.variable_amount_id,
    };

    match usecase.create_order(order).await {
        Ok(created) => Json(CreateOrderResponse {
            payment_url: created.payment_url,
            payment_token: created.payment_token,
        })
        .into_response(),
        Err(err) => {
            error!(user_id = %user.user_id, error = ?err, "payments: failed to create order");
            AppError::Internal(err).into_response()
        }
    }
}

pub async fn verify_payment(
    State(usecase): State<Arc<PaymentsUseCase>>,
    user: AuthUser,
    Json(payload): Json<VerifyPaymentRequest>,
) -> Response {
    if payload.payment_token.trim().is_empty() || payload.credits_to_award <= 0 {
        return AppError::BadRequest(
            "paymentToken and a positive creditsToAward are required".to_string(),
        )
        .into_response();
    }

    // A caller may only redeem a payment for themselves, unless it is the
    // service role doing reconciliation.
    if user.user_id != payload.user_id && !user.is_service_role() {
        return AppError::Forbidden("User mismatch when verifying payment".to_string())
            .into_response();
    }

    info!(user_id = %payload.user_id, "payments: verify request received");

    match usecase
        .verify_payment(
            payload.payment_token,
            payload.user_id,
            payload.credits_to_award,
        )
        .await
    {
        Ok(VerifyOutcome::Credited { .. }) => Json(VerifyPaymentResponse {
            success: true,
            verified: true,
            credits_updated: true,
        })
        .into_response(),
        Ok(VerifyOutcome::Unpaid) => (
            axum::http::StatusCode::BAD_REQUEST,
            Json(VerifyPaymentResponse {
                success: false,
                verified: false,
                credits_updated: false,
            }),
        )
            .into_response(),
        Ok(VerifyOutcome::AlreadyRedeemed) => {
            AppError::Conflict("Payment token already redeemed".to_string()).into_response()
        }
        Ok(VerifyOutcome::CreditWriteFailed) => (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            Json(VerifyPaymentResponse {
                success: false,
                verified: true,
                credits_updated: false,
            }),
        )
            .into_response(),
        Err(err) => {
            error!(user_id = %payload.user_id, error = ?err, "payments: verification failed");
            AppError::Internal(err).into_response()
        }
    }
}
