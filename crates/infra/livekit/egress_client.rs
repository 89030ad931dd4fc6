use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::error;

use crate::domain::{
    repositories::egress::EgressApi,
    value_objects::{
        egress::{EgressInfo, EgressSession},
        storage::RecordingOutput,
    },
};

use super::access_token::{VideoGrants, mint_service_token};

const TOKEN_TTL: Duration = Duration::from_secs(600);

#[derive(Debug, Clone)]
pub struct LiveKitApiConfig {
    pub url: String,
    pub api_key: String,
    pub api_secret: String,
}

/// Egress service client over the twirp JSON endpoints.
pub struct LiveKitEgressClient {
    http: Client,
    config: LiveKitApiConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RoomCompositeEgressRequest<'a> {
    room_name: &'a str,
    layout: &'a str,
    file_outputs: Vec<&'a RecordingOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct ListEgressRequest {}

#[derive(Debug, Deserialize)]
struct ListEgressResponse {
    #[serde(default)]
    items: Vec<EgressInfo>,
}

impl LiveKitEgressClient {
    pub fn new(config: LiveKitApiConfig) -> Self {
        Self {
            http: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("failed to build http client"),
            config,
        }
    }

    async fn twirp_post<B, R>(&self, method: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let token = mint_service_token(
            &self.config.api_key,
            &self.config.api_secret,
            VideoGrants {
                room_record: true,
                ..VideoGrants::default()
            },
            TOKEN_TTL,
        )?;

        let url = format!(
            "{}/twirp/livekit.Egress/{}",
            http_api_base(&self.config.url),
            method
        );

        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .with_context(|| format!("egress api request failed: {}", method))?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            error!(
                status = %status,
                method,
                response_body = %body_text,
                "egress api request failed"
            );
            anyhow::bail!("egress api returned {} for {}", status, method);
        }

        response
            .json::<R>()
            .await
            .with_context(|| format!("failed to decode egress api response: {}", method))
    }
}

#[async_trait]
impl EgressApi for LiveKitEgressClient {
    async fn start_room_composite(
        &self,
        room_name: String,
        layout: String,
        output: RecordingOutput,
        metadata: Option<String>,
    ) -> Result<EgressSession> {
        let request = RoomCompositeEgressRequest {
            room_name: &room_name,
            layout: &layout,
            file_outputs: vec![&output],
            metadata: metadata.as_deref(),
        };

        let info: EgressInfo = self.twirp_post("StartRoomCompositeEgress", &request).await?;

        Ok(EgressSession {
            egress_id: info.egress_id,
        })
    }

    async fn list_egress(&self) -> Result<Vec<EgressInfo>> {
        let response: ListEgressResponse = self.twirp_post("ListEgress", &ListEgressRequest {}).await?;
        Ok(response.items)
    }
}

/// The configured server URL is usually the websocket one (wss://); the twirp
/// endpoints live on the matching http(s) host.
pub(super) fn http_api_base(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    if let Some(host) = trimmed.strip_prefix("wss://") {
        return format!("https://{}", host);
    }
    if let Some(host) = trimmed.strip_prefix("ws://") {
        return format!("http://{}", host);
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn websocket_urls_map_to_http_hosts() {
        assert_eq!(
            http_api_base("wss://interviews.livekit.cloud/"),
            "https://interviews.livekit.cloud"
        );
        assert_eq!(http_api_base("ws://localhost:7880"), "http://localhost:7880");
        assert_eq!(
            http_api_base("https://interviews.livekit.cloud"),
            "https://interviews.livekit.cloud"
        );
    }

    #[test]
    fn start_request_serializes_with_the_wire_field_names() {
        let output = RecordingOutput {
            file_type: "MP4".to_string(),
            filepath: "recordings/R1/1.mp4".to_string(),
            s3: crate::domain::value_objects::storage::S3UploadDestination {
                access_key: "key".to_string(),
                secret: "secret".to_string(),
                region: "us-west-002".to_string(),
                endpoint: "https://s3.example.com".to_string(),
                bucket: "interviews".to_string(),
                force_path_style: true,
            },
        };

        let request = RoomCompositeEgressRequest {
            room_name: "R1",
            layout: "speaker",
            file_outputs: vec![&output],
            metadata: Some("{\"userId\":\"user-1\"}"),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["roomName"], json!("R1"));
        assert_eq!(value["fileOutputs"][0]["fileType"], json!("MP4"));
        assert_eq!(value["fileOutputs"][0]["s3"]["forcePathStyle"], json!(true));
        assert_eq!(value["metadata"], json!("{\"userId\":\"user-1\"}"));
    }
}
