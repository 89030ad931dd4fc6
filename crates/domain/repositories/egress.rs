use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::value_objects::{
    egress::{EgressInfo, EgressSession},
    storage::RecordingOutput,
};

#[automock]
#[async_trait]
pub trait EgressApi {
    async fn start_room_composite(
        &self,
        room_name: String,
        layout: String,
        output: RecordingOutput,
        metadata: Option<String>,
    ) -> Result<EgressSession>;
    async fn list_egress(&self) -> Result<Vec<EgressInfo>>;
}
