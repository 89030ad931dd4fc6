use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::recordings::{InsertRecordingEntity, RecordingCompletionUpdate};

#[automock]
#[async_trait]
pub trait RecordingRepository {
    async fn insert(&self, insert_recording_entity: InsertRecordingEntity) -> Result<Uuid>;
    /// Applies the changeset to the row with the given egress id and returns
    /// the number of rows touched; an unknown egress id touches zero rows.
    async fn update_by_egress_id(
        &self,
        egress_id: String,
        changeset: RecordingCompletionUpdate,
    ) -> Result<usize>;
}
