use anyhow::Result;
use chrono::Utc;
use crates::domain::{
    entities::recordings::{InsertRecordingEntity, RecordingCompletionUpdate},
    repositories::recordings::RecordingRepository,
    value_objects::{
        egress::EgressInfo,
        egress_webhook::{EGRESS_FINISHED, EGRESS_STARTED, EgressWebhookEvent},
        enums::recording_statuses::RecordingStatus,
    },
};
use std::sync::Arc;
use tracing::{info, warn};

pub struct EgressWebhookUseCase {
    repository: Arc<dyn RecordingRepository + Send + Sync>,
}

impl EgressWebhookUseCase {
    pub fn new(repository: Arc<dyn RecordingRepository + Send + Sync>) -> Self {
        Self { repository }
    }

    pub async fn handle_event(&self, event: EgressWebhookEvent) -> Result<()> {
        match event.type_.as_str() {
            EGRESS_STARTED => {
                let info = require_egress_info(event.egress_info)?;
                self.handle_started(info).await
            }
            EGRESS_FINISHED => {
                let info = require_egress_info(event.egress_info)?;
                self.handle_finished(info).await
            }
            other => {
                info!(event_type = other, "ignoring webhook event type");
                Ok(())
            }
        }
    }

    async fn handle_started(&self, info: EgressInfo) -> Result<()> {
        let user_id = info.user_id_from_metadata();
        let recording_id = self
            .repository
            .insert(InsertRecordingEntity {
                room_name: info.room_name.unwrap_or_default(),
                egress_id: info.egress_id.clone(),
                status: RecordingStatus::Processing.to_string(),
                started_at: Utc::now(),
                user_id,
            })
            .await?;

        info!(%recording_id, egress_id = %info.egress_id, "egress_started: recording inserted");
        Ok(())
    }

    async fn handle_finished(&self, info: EgressInfo) -> Result<()> {
        if info.status.is_complete() {
            let file_url = info.file_location().map(|location| location.to_string());
            let changeset = RecordingCompletionUpdate {
                status: RecordingStatus::Completed.to_string(),
                file_url,
                ended_at: Some(Utc::now()),
            };

            let affected = self
                .repository
                .update_by_egress_id(info.egress_id.clone(), changeset)
                .await?;

            if affected == 0 {
                warn!(egress_id = %info.egress_id, "egress_finished for unknown recording");
            } else {
                info!(egress_id = %info.egress_id, "egress_finished: recording completed");
            }
            return Ok(());
        }

        if info.status.is_terminal_failure() {
            let changeset = RecordingCompletionUpdate {
                status: RecordingStatus::Error.to_string(),
                file_url: None,
                ended_at: Some(Utc::now()),
            };
            let affected = self
                .repository
                .update_by_egress_id(info.egress_id.clone(), changeset)
                .await?;

            warn!(
                egress_id = %info.egress_id,
                affected,
                "egress_finished with failure status"
            );
            return Ok(());
        }

        info!(egress_id = %info.egress_id, "egress_finished with non-terminal status; ignoring");
        Ok(())
    }
}

fn require_egress_info(info: Option<EgressInfo>) -> Result<EgressInfo> {
    info.ok_or_else(|| anyhow::anyhow!("egressInfo is required"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crates::domain::repositories::recordings::MockRecordingRepository;
    use serde_json::json;
    use uuid::Uuid;

    fn event(value: serde_json::Value) -> EgressWebhookEvent {
        serde_json::from_value(value).expect("webhook event should deserialize")
    }

    #[tokio::test]
    async fn started_event_inserts_a_processing_row() {
        let mut repository = MockRecordingRepository::new();
        repository
            .expect_insert()
            .withf(|entity| {
                entity.egress_id == "EG_S1"
                    && entity.room_name == "R1"
                    && entity.status == "processing"
                    && entity.user_id.as_deref() == Some("user-42")
            })
            .times(1)
            .returning(|_| Ok(Uuid::new_v4()));

        let usecase = EgressWebhookUseCase::new(Arc::new(repository));
        usecase
            .handle_event(event(json!({
                "type": "egress_started",
                "egressInfo": {
                    "egressId": "EG_S1",
                    "roomName": "R1",
                    "status": "EGRESS_ACTIVE",
                    "metadata": "{\"userId\":\"user-42\"}",
                },
            })))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn finished_event_completes_the_row_with_the_file_url() {
        let mut repository = MockRecordingRepository::new();
        repository
            .expect_update_by_egress_id()
            .withf(|egress_id, changeset| {
                egress_id == "EG_S1"
                    && changeset.status == "completed"
                    && changeset.file_url.as_deref() == Some("https://cdn.example/r1.mp4")
                    && changeset.ended_at.is_some()
            })
            .times(1)
            .returning(|_, _| Ok(1));

        let usecase = EgressWebhookUseCase::new(Arc::new(repository));
        usecase
            .handle_event(event(json!({
                "type": "egress_finished",
                "egressInfo": {
                    "egressId": "EG_S1",
                    "roomName": "R1",
                    "status": "EGRESS_COMPLETE",
                    "fileResults": [{ "location": "https://cdn.example/r1.mp4" }],
                },
            })))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn finished_event_for_unknown_egress_is_a_no_op() {
        let mut repository = MockRecordingRepository::new();
        repository
            .expect_update_by_egress_id()
            .times(1)
            .returning(|_, _| Ok(0));

        let usecase = EgressWebhookUseCase::new(Arc::new(repository));
        let result = usecase
            .handle_event(event(json!({
                "type": "egress_finished",
                "egressInfo": {
                    "egressId": "EG_UNKNOWN",
                    "status": "EGRESS_COMPLETE",
                    "fileResults": [{ "location": "https://cdn.example/x.mp4" }],
                },
            })))
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn failed_egress_marks_the_row_as_error() {
        let mut repository = MockRecordingRepository::new();
        repository
            .expect_update_by_egress_id()
            .withf(|_, changeset| changeset.status == "error" && changeset.file_url.is_none())
            .times(1)
            .returning(|_, _| Ok(1));

        let usecase = EgressWebhookUseCase::new(Arc::new(repository));
        usecase
            .handle_event(event(json!({
                "type": "egress_finished",
                "egressInfo": { "egressId": "EG_S1", "status": "EGRESS_FAILED" },
            })))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn unrelated_event_types_are_acknowledged_without_writes() {
        let mut repository = MockRecordingRepository::new();
        repository.expect_insert().times(0);
        repository.expect_update_by_egress_id().times(0);

        let usecase = EgressWebhookUseCase::new(Arc::new(repository));
        usecase
            .handle_event(event(json!({ "type": "room_finished" })))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn missing_egress_info_is_an_error() {
        let usecase = EgressWebhookUseCase::new(Arc::new(MockRecordingRepository::new()));
        let result = usecase
            .handle_event(event(json!({ "type": "egress_finished" })))
            .await;
        assert!(result.is_err());
    }
}
