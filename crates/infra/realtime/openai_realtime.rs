use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::domain::repositories::realtime::{RealtimeSession, RealtimeSessionApi};

#[derive(Debug, Clone)]
pub struct OpenAiRealtimeConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub voice: String,
}

/// Minimal realtime-API client built on reqwest: create a session, seed a
/// conversation item, request a model response.
pub struct OpenAiRealtimeClient {
    http: reqwest::Client,
    config: OpenAiRealtimeConfig,
}

#[derive(Debug, Deserialize)]
struct RealtimeErrorEnvelope {
    error: RealtimeErrorDetails,
}

#[derive(Debug, Deserialize)]
struct RealtimeErrorDetails {
    #[serde(rename = "type")]
    type_: Option<String>,
    code: Option<String>,
    message: Option<String>,
}

impl OpenAiRealtimeClient {
    pub fn new(config: OpenAiRealtimeConfig) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("failed to build http client"),
            config,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn ensure_success(resp: reqwest::Response, context: &str) -> Result<reqwest::Response> {
        if resp.status().is_success() {
            return Ok(resp);
        }

        let status = resp.status();
        let body = match resp.text().await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => "<empty response body>".to_string(),
            Err(err) => format!("<failed to read response body: {err}>"),
        };

        let (error_type, error_code, error_message) =
            match serde_json::from_str::<RealtimeErrorEnvelope>(&body) {
                Ok(envelope) => (
                    envelope.error.type_,
                    envelope.error.code,
                    envelope.error.message,
                ),
                Err(_) => (None, None, None),
            };

        error!(
            status = %status,
            error_type = ?error_type,
            error_code = ?error_code,
            error_message = ?error_message,
            response_body = %body,
            context = %context,
            "realtime api request failed"
        );

        anyhow::bail!("realtime API request failed: {} (status {})", context, status);
    }
}

#[async_trait]
impl RealtimeSessionApi for OpenAiRealtimeClient {
    async fn create_session(&self, instructions: &str) -> Result<RealtimeSession> {
        let body = json!({
            "model": self.config.model,
            "voice": self.config.voice,
            "instructions": instructions,
        });

        let resp = self
            .http
            .post(self.endpoint("/v1/realtime/sessions"))
            .header(AUTHORIZATION, format!("Bearer {}", self.config.api_key))
            .header("OpenAI-Beta", "realtime=v1")
            .json(&body)
            .send()
            .await?;
        let resp = Self::ensure_success(resp, "create session").await?;

        #[derive(Deserialize)]
        struct SessionResp {
            id: String,
        }

        let parsed: SessionResp = resp.json().await?;
        Ok(RealtimeSession { id: parsed.id })
    }

    async fn seed_assistant_message(&self, session_id: &str, text: &str) -> Result<()> {
        let body = json!({
            "item": {
                "type": "message",
                "role": "assistant",
                "content": [{ "type": "text", "text": text }],
            },
        });

        let resp = self
            .http
            .post(self.endpoint(&format!(
                "/v1/realtime/sessions/{}/conversation/items",
                session_id
            )))
            .header(AUTHORIZATION, format!("Bearer {}", self.config.api_key))
            .header("OpenAI-Beta", "realtime=v1")
            .json(&body)
            .send()
            .await?;
        Self::ensure_success(resp, "seed conversation item").await?;

        Ok(())
    }

    async fn request_response(&self, session_id: &str) -> Result<()> {
        let resp = self
            .http
            .post(self.endpoint(&format!("/v1/realtime/sessions/{}/responses", session_id)))
            .header(AUTHORIZATION, format!("Bearer {}", self.config.api_key))
            .header("OpenAI-Beta", "realtime=v1")
            .json(&json!({}))
            .send()
            .await?;
        Self::ensure_success(resp, "request response").await?;

        Ok(())
    }
}
