use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::domain::{repositories::rooms::RoomApi, value_objects::rooms::ParticipantInfo};

use super::{
    access_token::{VideoGrants, mint_service_token},
    egress_client::{LiveKitApiConfig, http_api_base},
};

const TOKEN_TTL: Duration = Duration::from_secs(600);

/// Room service client, used by the agent to observe who is in a room.
pub struct RoomServiceClient {
    http: Client,
    config: LiveKitApiConfig,
}

#[derive(Debug, Serialize)]
struct ListParticipantsRequest<'a> {
    room: &'a str,
}

#[derive(Debug, Deserialize)]
struct ListParticipantsResponse {
    #[serde(default)]
    participants: Vec<ParticipantInfo>,
}

impl RoomServiceClient {
    pub fn new(config: LiveKitApiConfig) -> Self {
        Self {
            http: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("failed to build http client"),
            config,
        }
    }
}

#[async_trait]
impl RoomApi for RoomServiceClient {
    async fn list_participants(&self, room_name: String) -> Result<Vec<ParticipantInfo>> {
        let token = mint_service_token(
            &self.config.api_key,
            &self.config.api_secret,
            VideoGrants {
                room: Some(room_name.clone()),
                room_admin: true,
                ..VideoGrants::default()
            },
            TOKEN_TTL,
        )?;

        let url = format!(
            "{}/twirp/livekit.RoomService/ListParticipants",
            http_api_base(&self.config.url)
        );

        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(&ListParticipantsRequest { room: &room_name })
            .send()
            .await
            .context("room api request failed: ListParticipants")?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            error!(
                status = %status,
                room = %room_name,
                response_body = %body_text,
                "room api request failed"
            );
            anyhow::bail!("room api returned {} for ListParticipants", status);
        }

        let parsed: ListParticipantsResponse = response
            .json()
            .await
            .context("failed to decode ListParticipants response")?;

        Ok(parsed.participants)
    }
}
