use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::value_objects::rooms::ParticipantInfo;

#[automock]
#[async_trait]
pub trait RoomApi {
    async fn list_participants(&self, room_name: String) -> Result<Vec<ParticipantInfo>>;
}
