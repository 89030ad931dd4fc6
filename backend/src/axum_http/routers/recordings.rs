use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::post,
};
use crates::{
    domain::repositories::{egress::EgressApi, recordings::RecordingRepository},
    infra::{
        db::{postgres::postgres_connection::PgPoolArena, repositories::recordings::RecordingPostgres},
        livekit::egress_client::LiveKitEgressClient,
    },
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::{
    axum_http::error_responses::AppError,
    config::config_model::DotEnvyConfig,
    usecases::start_recording::StartRecordingUseCase,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRecordingRequest {
    pub room_name: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRecordingResponse {
    pub success: bool,
    pub egress_id: String,
}

pub fn routes(db_pool: Arc<PgPoolArena>, config: Arc<DotEnvyConfig>) -> Router {
    let egress_api: Arc<dyn EgressApi + Send + Sync> =
        Arc::new(LiveKitEgressClient::new(config.livekit.clone()));
    let repository: Arc<dyn RecordingRepository + Send + Sync> =
        Arc::new(RecordingPostgres::new(db_pool));

    let usecase = StartRecordingUseCase::new(egress_api, repository, config.storage.clone());

    Router::new()
        .route("/start", post(start_recording))
        .with_state(Arc::new(usecase))
}

pub async fn start_recording(
    State(usecase): State<Arc<StartRecordingUseCase>>,
    Json(payload): Json<StartRecordingRequest>,
) -> Response {
    let Some(room_name) = payload.room_name.filter(|room| !room.trim().is_empty()) else {
        return AppError::BadRequest("Room name is required".to_string()).into_response();
    };

    info!(
        room = %room_name,
        user = payload.user_id.as_deref().unwrap_or("unknown"),
        "recordings: start request received"
    );

    match usecase.start(room_name, payload.user_id).await {
        Ok(session) => Json(StartRecordingResponse {
            success: true,
            egress_id: session.egress_id,
        })
        .into_response(),
        Err(err) => {
            error!(error = ?err, "recordings: failed to start recording");
            AppError::Internal(err).into_response()
        }
    }
}
