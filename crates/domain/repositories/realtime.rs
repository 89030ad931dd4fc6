use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RealtimeSession {
    pub id: String,
}

/// Minimal surface of the realtime conversational API the agent drives:
/// create a session, seed it with an utterance, ask for a response.
#[automock]
#[async_trait]
pub trait RealtimeSessionApi {
    async fn create_session(&self, instructions: &str) -> Result<RealtimeSession>;
    async fn seed_assistant_message(&self, session_id: &str, text: &str) -> Result<()>;
    async fn request_response(&self, session_id: &str) -> Result<()>;
}
