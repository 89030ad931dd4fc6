use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::post,
};
use crates::{
    domain::{
        repositories::recordings::RecordingRepository,
        value_objects::egress_webhook::EgressWebhookEvent,
    },
    infra::{
        db::{postgres::postgres_connection::PgPoolArena, repositories::recordings::RecordingPostgres},
        livekit::{access_token::verify_webhook_token, egress_client::LiveKitApiConfig},
    },
};
use serde_json::json;
use tracing::{error, info, warn};

use crate::{config::config_model::DotEnvyConfig, usecases::egress_webhook::EgressWebhookUseCase};

struct WebhookState {
    usecase: EgressWebhookUseCase,
    livekit: LiveKitApiConfig,
}

pub fn routes(db_pool: Arc<PgPoolArena>, config: Arc<DotEnvyConfig>) -> Router {
    let repository: Arc<dyn RecordingRepository + Send + Sync> =
        Arc::new(RecordingPostgres::new(db_pool));

    let state = WebhookState {
        usecase: EgressWebhookUseCase::new(repository),
        livekit: config.livekit.clone(),
    };

    Router::new()
        .route("/", post(receive_event))
        .with_state(Arc::new(state))
}

async fn receive_event(
    State(state): State<Arc<WebhookState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    // Deliveries are signed with a short-lived token over the body digest.
    match headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(authorization) => {
            if let Err(err) = verify_webhook_token(
                authorization,
                &state.livekit.api_key,
                &state.livekit.api_secret,
                &body,
            ) {
                warn!(error = %err, "webhook delivery rejected");
                return (StatusCode::UNAUTHORIZED, "invalid webhook signature").into_response();
            }
        }
        None => {
            warn!("webhook delivery without Authorization header; accepting unverified");
        }
    }

    let event: EgressWebhookEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(err) => {
            warn!(error = %err, "webhook payload failed to parse");
            return (StatusCode::BAD_REQUEST, "invalid webhook payload").into_response();
        }
    };

    info!(event_type = %event.type_, "egress webhook received");

    match state.usecase.handle_event(event).await {
        Ok(()) => Json(json!({ "success": true })).into_response(),
        Err(err) => {
            error!(error = ?err, "failed to process egress webhook");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to process webhook" })),
            )
                .into_response()
        }
    }
}
