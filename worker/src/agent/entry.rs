use anyhow::{Result, bail};
use chrono::Utc;
use crates::domain::{
    entities::recordings::InsertRecordingEntity,
    repositories::{
        egress::EgressApi, realtime::RealtimeSessionApi, recordings::RecordingRepository,
        rooms::RoomApi,
    },
    value_objects::{
        enums::recording_statuses::RecordingStatus,
        rooms::ParticipantInfo,
        storage::StorageSettings,
    },
};
use crates::infra::storages::adapter::plan_recording;
use serde_json::json;
use std::{sync::Arc, time::Duration};
use tracing::{error, info};

use crate::egress_listener::registry::DirectUploadRegistry;

use super::instructions::{INTERVIEWER_INSTRUCTIONS, OPENING_MESSAGE};

const RECORDING_LAYOUT: &str = "grid";

/// Everything the agent entry point needs, constructed once in `main` and
/// passed down.
pub struct InterviewAgent {
    rooms: Arc<dyn RoomApi + Send + Sync>,
    egress: Arc<dyn EgressApi + Send + Sync>,
    repository: Arc<dyn RecordingRepository + Send + Sync>,
    realtime: Arc<dyn RealtimeSessionApi + Send + Sync>,
    registry: DirectUploadRegistry,
    storage: Option<StorageSettings>,
    participant_wait_attempts: u32,
    participant_wait_interval: Duration,
}

impl InterviewAgent {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        rooms: Arc<dyn RoomApi + Send + Sync>,
        egress: Arc<dyn EgressApi + Send + Sync>,
        repository: Arc<dyn RecordingRepository + Send + Sync>,
        realtime: Arc<dyn RealtimeSessionApi + Send + Sync>,
        registry: DirectUploadRegistry,
        storage: Option<StorageSettings>,
        participant_wait_attempts: u32,
        participant_wait_interval: Duration,
    ) -> Self {
        Self {
            rooms,
            egress,
            repository,
            realtime,
            registry,
            storage,
            participant_wait_attempts,
            participant_wait_interval,
        }
    }

    /// Happy-path entry: wait for a participant, optionally start recording,
    /// then open the conversational session. Recording and session failures
    /// are logged without aborting the worker.
    pub async fn run(&self, room_name: &str) -> Result<()> {
        info!(room = %room_name, "waiting for participant");
        let participant = self.wait_for_participant(room_name).await?;
        info!(
            room = %room_name,
            identity = %participant.identity,
            "starting interview agent for participant"
        );

        match &self.storage {
            Some(settings) => {
                if let Err(error) = self
                    .start_recording(room_name, &participant.identity, settings)
                    .await
                {
                    error!(room = %room_name, error = ?error, "Error starting recording");
                }
            }
            None => {
                error!("Recording credentials not properly configured; skipping recording");
            }
        }

        self.start_session().await;

        Ok(())
    }

    async fn wait_for_participant(&self, room_name: &str) -> Result<ParticipantInfo> {
        for _ in 0..self.participant_wait_attempts {
            let mut participants = self.rooms.list_participants(room_name.to_string()).await?;
            if let Some(participant) = participants.pop() {
                return Ok(participant);
            }
            tokio::time::sleep(self.participant_wait_interval).await;
        }

        bail!("no participant joined room {}", room_name);
    }

    async fn start_recording(
        &self,
        room_name: &str,
        identity: &str,
        settings: &StorageSettings,
    ) -> Result<()> {
        let started_at = Utc::now();
        let filepath = format!(
            "recording-{}-{}.mp4",
            room_name,
            started_at.timestamp_millis()
        );

        let plan = plan_recording(settings, &filepath);
        let metadata = json!({ "userId": identity }).to_string();

        let session = self
            .egress
            .start_room_composite(
                room_name.to_string(),
                RECORDING_LAYOUT.to_string(),
                plan.output,
                Some(metadata),
            )
            .await?;

        info!(egress_id = %session.egress_id, "Recording started");

        if let Some(direct_upload) = plan.direct_upload {
            self.registry
                .register(session.egress_id.clone(), direct_upload);
        }

        self.repository
            .insert(InsertRecordingEntity {
                room_name: room_name.to_string(),
                egress_id: session.egress_id,
                status: RecordingStatus::Processing.to_string(),
                started_at,
                user_id: Some(identity.to_string()),
            })
            .await?;

        Ok(())
    }

    async fn start_session(&self) {
        let session = match self.realtime.create_session(INTERVIEWER_INSTRUCTIONS).await {
            Ok(session) => session,
            Err(error) => {
                error!(error = ?error, "Error starting agent session");
                return;
            }
        };

        info!(session_id = %session.id, "realtime session created");

        if let Err(error) = self
            .realtime
            .seed_assistant_message(&session.id, OPENING_MESSAGE)
            .await
        {
            error!(error = ?error, "Error seeding opening message");
            return;
        }

        if let Err(error) = self.realtime.request_response(&session.id).await {
            error!(error = ?error, "Error requesting first response");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crates::domain::{
        repositories::{
            egress::MockEgressApi,
            realtime::{MockRealtimeSessionApi, RealtimeSession},
            recordings::MockRecordingRepository,
            rooms::MockRoomApi,
        },
        value_objects::{egress::EgressSession, enums::storage_providers::StorageProvider},
    };
    use uuid::Uuid;

    fn candidate() -> ParticipantInfo {
        ParticipantInfo {
            identity: "candidate-1".to_string(),
            name: None,
        }
    }

    fn backblaze_settings() -> StorageSettings {
        StorageSettings {
            provider: StorageProvider::Backblaze,
            public_bucket: false,
            access_key: "key".to_string(),
            secret_key: "secret".to_string(),
            endpoint: "https://s3.us-west-002.backblazeb2.com".to_string(),
            bucket: "interviews".to_string(),
            region: "us-west-002".to_string(),
        }
    }

    fn realtime_happy_path() -> MockRealtimeSessionApi {
        let mut realtime = MockRealtimeSessionApi::new();
        realtime.expect_create_session().times(1).returning(|_| {
            Ok(RealtimeSession {
                id: "sess_1".to_string(),
            })
        });
        realtime
            .expect_seed_assistant_message()
            .withf(|session_id, text| session_id == "sess_1" && text.contains("interviewer"))
            .times(1)
            .returning(|_, _| Ok(()));
        realtime
            .expect_request_response()
            .times(1)
            .returning(|_| Ok(()));
        realtime
    }

    fn agent(
        rooms: MockRoomApi,
        egress: MockEgressApi,
        repository: MockRecordingRepository,
        realtime: MockRealtimeSessionApi,
        registry: DirectUploadRegistry,
        storage: Option<StorageSettings>,
    ) -> InterviewAgent {
        InterviewAgent::new(
            Arc::new(rooms),
            Arc::new(egress),
            Arc::new(repository),
            Arc::new(realtime),
            registry,
            storage,
            3,
            Duration::from_millis(1),
        )
    }

    #[tokio::test]
    async fn full_run_records_registers_and_opens_the_session() {
        let mut rooms = MockRoomApi::new();
        rooms
            .expect_list_participants()
            .times(1)
            .returning(|_| Ok(vec![candidate()]));

        let mut egress = MockEgressApi::new();
        egress
            .expect_start_room_composite()
            .withf(|room, layout, output, metadata| {
                room == "interview-1"
                    && layout == "grid"
                    && output.filepath.starts_with("recording-interview-1-")
                    && metadata.as_deref().is_some_and(|m| m.contains("candidate-1"))
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
                entity.egress_id == "EG_S1"
                    && entity.status == "processing"
                    && entity.user_id.as_deref() == Some("candidate-1")
            })
            .times(1)
            .returning(|_| Ok(Uuid::new_v4()));

        let registry = DirectUploadRegistry::new();
        let agent = agent(
            rooms,
            egress,
            repository,
            realtime_happy_path(),
            registry.clone(),
            Some(backblaze_settings()),
        );

        agent.run("interview-1").await.unwrap();

        // The direct-upload destination was registered for the listener.
        let config = registry.take("EG_S1").expect("registration expected");
        assert!(config.filepath.starts_with("recording-interview-1-"));
    }

    #[tokio::test]
    async fn recording_failure_still_opens_the_session() {
        let mut rooms = MockRoomApi::new();
        rooms
            .expect_list_participants()
            .times(1)
            .returning(|_| Ok(vec![candidate()]));

        let mut egress = MockEgressApi::new();
        egress
            .expect_start_room_composite()
            .times(1)
            .returning(|_, _, _, _| Err(anyhow::anyhow!("egress api returned 503")));

        let mut repository = MockRecordingRepository::new();
        repository.expect_insert().times(0);

        let agent = agent(
            rooms,
            egress,
            repository,
            realtime_happy_path(),
            DirectUploadRegistry::new(),
            Some(backblaze_settings()),
        );

        agent.run("interview-1").await.unwrap();
    }

    #[tokio::test]
    async fn missing_storage_credentials_skip_recording_entirely() {
        let mut rooms = MockRoomApi::new();
        rooms
            .expect_list_participants()
            .times(1)
            .returning(|_| Ok(vec![candidate()]));

        let mut egress = MockEgressApi::new();
        egress.expect_start_room_composite().times(0);

        let agent = agent(
            rooms,
            egress,
            MockRecordingRepository::new(),
            realtime_happy_path(),
            DirectUploadRegistry::new(),
            None,
        );

        agent.run("interview-1").await.unwrap();
    }

    #[tokio::test]
    async fn waits_through_empty_polls_until_a_participant_joins() {
        let mut rooms = MockRoomApi::new();
        let mut polls = 0;
        rooms.expect_list_participants().times(2).returning(move |_| {
            polls += 1;
            if polls == 1 {
                Ok(vec![])
            } else {
                Ok(vec![candidate()])
            }
        });

        let mut egress = MockEgressApi::new();
        egress.expect_start_room_composite().times(0);

        let agent = agent(
            rooms,
            egress,
            MockRecordingRepository::new(),
            realtime_happy_path(),
            DirectUploadRegistry::new(),
            None,
        );

        agent.run("interview-1").await.unwrap();
    }

    #[tokio::test]
    async fn gives_up_when_no_participant_ever_joins() {
        let mut rooms = MockRoomApi::new();
        rooms
            .expect_list_participants()
            .times(3)
            .returning(|_| Ok(vec![]));

        let mut realtime = MockRealtimeSessionApi::new();
        realtime.expect_create_session().times(0);

        let agent = agent(
            rooms,
            MockEgressApi::new(),
            MockRecordingRepository::new(),
            realtime,
            DirectUploadRegistry::new(),
            None,
        );

        assert!(agent.run("interview-1").await.is_err());
    }
}
