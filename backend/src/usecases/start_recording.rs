use anyhow::Result;
use chrono::Utc;
use crates::domain::{
    entities::recordings::InsertRecordingEntity,
    repositories::{egress::EgressApi, recordings::RecordingRepository},
    value_objects::{
        egress::EgressSession,
        enums::recording_statuses::RecordingStatus,
        storage::StorageSettings,
    },
};
use crates::infra::storages::adapter::plan_recording;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

const RECORDING_LAYOUT: &str = "speaker";

pub struct StartRecordingUseCase {
    egress_api: Arc<dyn EgressApi + Send + Sync>,
    repository: Arc<dyn RecordingRepository + Send + Sync>,
    storage_settings: StorageSettings,
}

impl StartRecordingUseCase {
    pub fn new(
        egress_api: Arc<dyn EgressApi + Send + Sync>,
        repository: Arc<dyn RecordingRepository + Send + Sync>,
        storage_settings: StorageSettings,
    ) -> Self {
        Self {
            egress_api,
            repository,
            storage_settings,
        }
    }

    /// Starts a composite recording for the room and inserts the tracking row
    /// in `processing` state.
    pub async fn start(
        &self,
        room_name: String,
        user_id: Option<String>,
    ) -> Result<EgressSession> {
        let started_at = Utc::now();
        let filepath = format!(
            "recordings/{}/{}.mp4",
            room_name,
            started_at.timestamp_millis()
        );

        let plan = plan_recording(&self.storage_settings, &filepath);

        // The user id rides along in the egress metadata so webhook handlers
        // can attribute the recording.
        let metadata = user_id
            .as_ref()
            .map(|id| json!({ "userId": id }).to_string());

        let session = self
            .egress_api
            .start_room_composite(
                room_name.clone(),
                RECORDING_LAYOUT.to_string(),
                plan.output,
                metadata,
            )
            .await?;

        info!(room = %room_name, egress_id = %session.egress_id, "recording started");

        self.repository
            .insert(InsertRecordingEntity {
                room_name,
                egress_id: session.egress_id.clone(),
                status: RecordingStatus::Processing.to_string(),
                started_at,
                user_id,
            })
            .await?;

        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crates::domain::{
        repositories::{egress::MockEgressApi, recordings::MockRecordingRepository},
        value_objects::enums::storage_providers::StorageProvider,
    };
    use uuid::Uuid;

    fn storage_settings() -> StorageSettings {
        StorageSettings {
            provider: StorageProvider::LivekitS3,
            public_bucket: false,
            access_key: "key".to_string(),
            secret_key: "secret".to_string(),
            endpoint: "https://s3.example.com".to_string(),
            bucket: "interviews".to_string(),
            region: "us-east-1".to_string(),
        }
    }

    #[tokio::test]
    async fn start_records_the_session_as_processing() {
        let mut egress = MockEgressApi::new();
        egress
            .expect_start_room_composite()
            .withf(|room, layout, output, metadata| {
                room == "R1"
                    && layout == "speaker"
                    && output.filepath.starts_with("recordings/R1/")
                    && metadata
                        .as_deref()
                        .is_some_and(|m| m.contains("user-1"))
            })
            .times(1)
            .returning(|_, _, _, _| {
                Ok(EgressSession {
                    egress_id: "EG_S1".to_string(),
                })
            });

        let mut repository = MockRecordingRepository::new();
        repository
            .expect_insert()
            .withf(|entity| {
                entity.room_name == "R1"
                    && entity.egress_id == "EG_S1"
                    && entity.status == "processing"
                    && entity.user_id.as_deref() == Some("user-1")
            })
            .times(1)
            .returning(|_| Ok(Uuid::new_v4()));

        let usecase = StartRecordingUseCase::new(
            Arc::new(egress),
            Arc::new(repository),
            storage_settings(),
        );

        let session = usecase
            .start("R1".to_string(), Some("user-1".to_string()))
            .await
            .unwrap();
        assert_eq!(session.egress_id, "EG_S1");
    }

    #[tokio::test]
    async fn vendor_failure_skips_the_database_write() {
        let mut egress = MockEgressApi::new();
        egress
            .expect_start_room_composite()
            .times(1)
            .returning(|_, _, _, _| Err(anyhow::anyhow!("egress api returned 500")));

        let mut repository = MockRecordingRepository::new();
        repository.expect_insert().times(0);

        let usecase = StartRecordingUseCase::new(
            Arc::new(egress),
            Arc::new(repository),
            storage_settings(),
        );

        assert!(usecase.start("R1".to_string(), None).await.is_err());
    }
}
