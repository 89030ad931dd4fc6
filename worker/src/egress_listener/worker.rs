use anyhow::Result;
use chrono::Utc;
use crates::domain::{
    entities::recordings::RecordingCompletionUpdate,
    repositories::{
        egress::EgressApi,
        recordings::RecordingRepository,
        storage::RecordingStorageClientFactory,
    },
    value_objects::{egress::EgressInfo, enums::recording_statuses::RecordingStatus},
};
use std::{collections::HashSet, sync::Arc, time::Duration};
use tracing::{debug, error, info, warn};

use super::registry::DirectUploadRegistry;

/// Polls the egress API and, for every newly completed session with a
/// registered destination, uploads the produced file and settles the
/// recording row. One instance owns the processing set; only the listener
/// task ever touches it.
pub struct EgressReconciler {
    egress_api: Arc<dyn EgressApi + Send + Sync>,
    repository: Arc<dyn RecordingRepository + Send + Sync>,
    storage_factory: Arc<dyn RecordingStorageClientFactory + Send + Sync>,
    registry: DirectUploadRegistry,
    processing: HashSet<String>,
}

impl EgressReconciler {
    pub fn new(
        egress_api: Arc<dyn EgressApi + Send + Sync>,
        repository: Arc<dyn RecordingRepository + Send + Sync>,
        storage_factory: Arc<dyn RecordingStorageClientFactory + Send + Sync>,
        registry: DirectUploadRegistry,
    ) -> Self {
        Self {
            egress_api,
            repository,
            storage_factory,
            registry,
            processing: HashSet::new(),
        }
    }

    pub async fn tick(&mut self) -> Result<()> {
        let sessions = self.egress_api.list_egress().await?;
        for info in sessions {
            self.process_session(info).await;
        }
        Ok(())
    }

    async fn process_session(&mut self, info: EgressInfo) {
        if !info.status.is_complete() || self.processing.contains(&info.egress_id) {
            return;
        }

        self.processing.insert(info.egress_id.clone());

        if let Err(err) = self.upload_completed_session(&info).await {
            // Logged and dropped; the session is not retried.
            error!(
                egress_id = %info.egress_id,
                error = ?err,
                "Error processing completed egress"
            );
        }

        self.processing.remove(&info.egress_id);
    }

    async fn upload_completed_session(&mut self, info: &EgressInfo) -> Result<()> {
        let Some(config) = self.registry.take(&info.egress_id) else {
            debug!(
                egress_id = %info.egress_id,
                "no registered upload destination; skipping"
            );
            return Ok(());
        };

        info!(egress_id = %info.egress_id, "Processing completed egress");

        let Some(local_path) = info.file_location() else {
            error!(egress_id = %info.egress_id, "Could not find local file for egress");
            return Ok(());
        };
        let local_path = local_path.to_string();

        let object_name = config.filepath.clone();
        let storage = self.storage_factory.client_for(config).await?;
        let uploaded = storage.upload_recording(&local_path, &object_name).await?;

        info!(
            egress_id = %info.egress_id,
            url = %uploaded.url,
            "Successfully uploaded recording"
        );

        let affected = self
            .repository
            .update_by_egress_id(
                info.egress_id.clone(),
                RecordingCompletionUpdate {
                    status: RecordingStatus::Completed.to_string(),
                    file_url: Some(uploaded.url),
                    ended_at: Some(Utc::now()),
                },
            )
            .await?;

        if affected == 0 {
            warn!(egress_id = %info.egress_id, "upload finished for unknown recording row");
        }

        self.cleanup_local_file(&local_path).await;

        Ok(())
    }

    async fn cleanup_local_file(&self, local_path: &str) {
        match tokio::fs::remove_file(local_path).await {
            Ok(()) => info!(path = %local_path, "Cleaned up local file"),
            Err(err) => warn!(
                path = %local_path,
                error = %err,
                "Failed to clean up local file"
            ),
        }
    }
}

pub async fn run(
    egress_api: Arc<dyn EgressApi + Send + Sync>,
    repository: Arc<dyn RecordingRepository + Send + Sync>,
    storage_factory: Arc<dyn RecordingStorageClientFactory + Send + Sync>,
    registry: DirectUploadRegistry,
    poll_interval: Duration,
) -> Result<()> {
    info!(
        interval_secs = poll_interval.as_secs(),
        "Egress listener started"
    );

    let mut reconciler = EgressReconciler::new(egress_api, repository, storage_factory, registry);
    let mut interval = tokio::time::interval(poll_interval);

    loop {
        interval.tick().await;
        if let Err(error) = reconciler.tick().await {
            error!("Error polling egress info: {}", error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crates::domain::{
        repositories::{
            egress::MockEgressApi,
            recordings::MockRecordingRepository,
            storage::{MockRecordingStorageClient, MockRecordingStorageClientFactory},
        },
        value_objects::storage::{DirectUploadConfig, UploadedRecording},
    };
    use serde_json::json;

    fn complete_session(egress_id: &str, location: &str) -> EgressInfo {
        serde_json::from_value(json!({
            "egressId": egress_id,
            "roomName": "R1",
            "status": "EGRESS_COMPLETE",
            "fileResults": [{ "location": location }],
        }))
        .unwrap()
    }

    fn active_session(egress_id: &str) -> EgressInfo {
        serde_json::from_value(json!({ "egressId": egress_id, "status": "EGRESS_ACTIVE" }))
            .unwrap()
    }

    fn upload_config(filepath: &str) -> DirectUploadConfig {
        DirectUploadConfig {
            access_key: "key".to_string(),
            secret_key: "secret".to_string(),
            endpoint: "https://s3.example.com".to_string(),
            bucket: "interviews".to_string(),
            region: "us-west-002".to_string(),
            filepath: filepath.to_string(),
            public_bucket: true,
        }
    }

    fn factory_with_storage(
        storage: MockRecordingStorageClient,
        expected_calls: usize,
    ) -> MockRecordingStorageClientFactory {
        let storage: Arc<dyn crates::domain::repositories::storage::RecordingStorageClient
            + Send
            + Sync> = Arc::new(storage);
        let mut factory = MockRecordingStorageClientFactory::new();
        factory
            .expect_client_for()
            .times(expected_calls)
            .returning(move |_| Ok(Arc::clone(&storage)));
        factory
    }

    #[tokio::test]
    async fn completed_session_is_uploaded_once_across_repeated_polls() {
        let mut egress = MockEgressApi::new();
        egress
            .expect_list_egress()
            .times(2)
            .returning(|| Ok(vec![complete_session("EG_S1", "/tmp/missing-rec.mp4")]));

        let mut storage = MockRecordingStorageClient::new();
        storage
            .expect_upload_recording()
            .withf(|path, object| path == "/tmp/missing-rec.mp4" && object == "rec-R1.mp4")
            .times(1)
            .returning(|_, object| {
                Ok(UploadedRecording {
                    object_key: object.to_string(),
                    url: format!("https://f002.backblazeb2.com/file/interviews/{}", object),
                })
            });

        let mut repository = MockRecordingRepository::new();
        repository
            .expect_update_by_egress_id()
            .withf(|egress_id, changeset| {
                egress_id == "EG_S1"
                    && changeset.status == "completed"
                    && changeset
                        .file_url
                        .as_deref()
                        .is_some_and(|url| url.contains("rec-R1.mp4"))
            })
            .times(1)
            .returning(|_, _| Ok(1));

        let registry = DirectUploadRegistry::new();
        registry.register("EG_S1".to_string(), upload_config("rec-R1.mp4"));

        let mut reconciler = EgressReconciler::new(
            Arc::new(egress),
            Arc::new(repository),
            Arc::new(factory_with_storage(storage, 1)),
            registry,
        );

        // Two polls report the same completed session; the registration is
        // consumed on the first, so the second is a no-op.
        reconciler.tick().await.unwrap();
        reconciler.tick().await.unwrap();
    }

    #[tokio::test]
    async fn incomplete_sessions_are_ignored() {
        let mut egress = MockEgressApi::new();
        egress
            .expect_list_egress()
            .times(1)
            .returning(|| Ok(vec![active_session("EG_S1")]));

        let mut repository = MockRecordingRepository::new();
        repository.expect_update_by_egress_id().times(0);

        let registry = DirectUploadRegistry::new();
        registry.register("EG_S1".to_string(), upload_config("rec.mp4"));

        let mut reconciler = EgressReconciler::new(
            Arc::new(egress),
            Arc::new(repository),
            Arc::new(factory_with_storage(MockRecordingStorageClient::new(), 0)),
            registry.clone(),
        );

        reconciler.tick().await.unwrap();
        // Still registered: the session never completed.
        assert!(!registry.is_empty());
    }

    #[tokio::test]
    async fn completed_session_without_registration_is_skipped() {
        let mut egress = MockEgressApi::new();
        egress
            .expect_list_egress()
            .times(1)
            .returning(|| Ok(vec![complete_session("EG_OTHER", "/tmp/x.mp4")]));

        let mut repository = MockRecordingRepository::new();
        repository.expect_update_by_egress_id().times(0);

        let mut reconciler = EgressReconciler::new(
            Arc::new(egress),
            Arc::new(repository),
            Arc::new(factory_with_storage(MockRecordingStorageClient::new(), 0)),
            DirectUploadRegistry::new(),
        );

        reconciler.tick().await.unwrap();
    }

    #[tokio::test]
    async fn upload_failure_is_swallowed_and_not_retried() {
        let mut egress = MockEgressApi::new();
        egress
            .expect_list_egress()
            .times(2)
            .returning(|| Ok(vec![complete_session("EG_S1", "/tmp/rec.mp4")]));

        let mut storage = MockRecordingStorageClient::new();
        storage
            .expect_upload_recording()
            .times(1)
            .returning(|_, _| Err(anyhow::anyhow!("connection reset")));

        let mut repository = MockRecordingRepository::new();
        repository.expect_update_by_egress_id().times(0);

        let registry = DirectUploadRegistry::new();
        registry.register("EG_S1".to_string(), upload_config("rec.mp4"));

        let mut reconciler = EgressReconciler::new(
            Arc::new(egress),
            Arc::new(repository),
            Arc::new(factory_with_storage(storage, 1)),
            registry,
        );

        // The failure is logged, the tick still succeeds, and the next poll
        // does not attempt the upload again.
        reconciler.tick().await.unwrap();
        reconciler.tick().await.unwrap();
    }

    #[tokio::test]
    async fn agent_started_recording_is_settled_end_to_end() {
        use crate::agent::entry::InterviewAgent;
        use crates::domain::{
            repositories::{
                realtime::{MockRealtimeSessionApi, RealtimeSession},
                recordings::RecordingRepository,
                rooms::MockRoomApi,
            },
            value_objects::{
                egress::EgressSession,
                enums::storage_providers::StorageProvider,
                rooms::ParticipantInfo,
                storage::StorageSettings,
            },
        };
        use std::time::Duration;
        use uuid::Uuid;

        let registry = DirectUploadRegistry::new();

        // One repository sees both the agent's insert and the listener's
        // completion update.
        let mut repository_mock = MockRecordingRepository::new();
        repository_mock
            .expect_insert()
            .withf(|entity| entity.egress_id == "EG_S1" && entity.status == "processing")
            .times(1)
            .returning(|_| Ok(Uuid::new_v4()));
        repository_mock
            .expect_update_by_egress_id()
            .withf(|egress_id, changeset| {
                egress_id == "EG_S1"
                    && changeset.status == "completed"
                    && changeset.file_url.is_some()
            })
            .times(1)
            .returning(|_, _| Ok(1));
        let repository: Arc<dyn RecordingRepository + Send + Sync> = Arc::new(repository_mock);

        // Agent side: participant present, egress start hands back EG_S1.
        let mut rooms = MockRoomApi::new();
        rooms.expect_list_participants().times(1).returning(|_| {
            Ok(vec![ParticipantInfo {
                identity: "candidate-1".to_string(),
                name: None,
            }])
        });

        let mut agent_egress = MockEgressApi::new();
        agent_egress
            .expect_start_room_composite()
            .times(1)
            .returning(|_, _, _, _| {
                Ok(EgressSession {
                    egress_id: "EG_S1".to_string(),
                })
            });

        let mut realtime = MockRealtimeSessionApi::new();
        realtime.expect_create_session().times(1).returning(|_| {
            Ok(RealtimeSession {
                id: "sess_1".to_string(),
            })
        });
        realtime
            .expect_seed_assistant_message()
            .times(1)
            .returning(|_, _| Ok(()));
        realtime
            .expect_request_response()
            .times(1)
            .returning(|_| Ok(()));

        let agent = InterviewAgent::new(
            Arc::new(rooms),
            Arc::new(agent_egress),
            Arc::clone(&repository),
            Arc::new(realtime),
            registry.clone(),
            Some(StorageSettings {
                provider: StorageProvider::Backblaze,
                public_bucket: true,
                access_key: "key".to_string(),
                secret_key: "secret".to_string(),
                endpoint: "https://s3.us-west-002.backblazeb2.com".to_string(),
                bucket: "interviews".to_string(),
                region: "us-west-002".to_string(),
            }),
            3,
            Duration::from_millis(1),
        );

        agent.run("R1").await.unwrap();

        // Listener side: the next poll reports EG_S1 complete.
        let mut listener_egress = MockEgressApi::new();
        listener_egress
            .expect_list_egress()
            .times(1)
            .returning(|| Ok(vec![complete_session("EG_S1", "/tmp/missing-rec.mp4")]));

        let mut storage = MockRecordingStorageClient::new();
        storage
            .expect_upload_recording()
            .withf(|_, object| object.starts_with("recording-R1-"))
            .times(1)
            .returning(|_, object| {
                Ok(UploadedRecording {
                    object_key: object.to_string(),
                    url: format!("https://f002.backblazeb2.com/file/interviews/{}", object),
                })
            });

        let mut reconciler = EgressReconciler::new(
            Arc::new(listener_egress),
            repository,
            Arc::new(factory_with_storage(storage, 1)),
            registry,
        );

        reconciler.tick().await.unwrap();
    }

    #[tokio::test]
    async fn missing_file_location_skips_the_upload() {
        let mut egress = MockEgressApi::new();
        egress.expect_list_egress().times(1).returning(|| {
            Ok(vec![serde_json::from_value(json!({
                "egressId": "EG_S1",
                "status": "EGRESS_COMPLETE",
            }))
            .unwrap()])
        });

        let mut repository = MockRecordingRepository::new();
        repository.expect_update_by_egress_id().times(0);

        let registry = DirectUploadRegistry::new();
        registry.register("EG_S1".to_string(), upload_config("rec.mp4"));

        let mut reconciler = EgressReconciler::new(
            Arc::new(egress),
            Arc::new(repository),
            Arc::new(factory_with_storage(MockRecordingStorageClient::new(), 0)),
            registry,
        );

        reconciler.tick().await.unwrap();
    }
}
