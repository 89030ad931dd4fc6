use anyhow::{Context, Result};
use crates::{
    domain::value_objects::storage::StorageSettings,
    infra::{livekit::egress_client::LiveKitApiConfig, realtime::openai_realtime::OpenAiRealtimeConfig},
};
use tracing::warn;

use super::config_model::{AgentSettings, Database, DotEnvyConfig, Listener, WorkerServer};

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let worker_server = WorkerServer {
        port: std::env::var("SERVER_PORT_WORKER")
            .expect("SERVER_PORT_WORKER is invalid")
            .parse()?,
        body_limit: std::env::var("SERVER_BODY_LIMIT")
            .expect("SERVER_BODY_LIMIT is invalid")
            .parse()?,
        timeout: std::env::var("SERVER_TIMEOUT")
            .expect("SERVER_TIMEOUT is invalid")
            .parse()?,
    };

    let database = Database {
        url: std::env::var("DATABASE_URL").expect("DATABASE_URL is invalid"),
    };

    let livekit = LiveKitApiConfig {
        url: std::env::var("LIVEKIT_URL").expect("LIVEKIT_URL is invalid"),
        api_key: std::env::var("LIVEKIT_API_KEY").expect("LIVEKIT_API_KEY is invalid"),
        api_secret: std::env::var("LIVEKIT_API_SECRET").expect("LIVEKIT_API_SECRET is invalid"),
    };

    let realtime = OpenAiRealtimeConfig {
        api_key: std::env::var("OPENAI_API_KEY").expect("OPENAI_API_KEY is invalid"),
        base_url: std::env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com".to_string()),
        model: std::env::var("REALTIME_MODEL")
            .unwrap_or_else(|_| "gpt-4o-realtime-preview".to_string()),
        voice: std::env::var("REALTIME_VOICE").unwrap_or_else(|_| "alloy".to_string()),
    };

    let listener = Listener {
        poll_interval_secs: std::env::var("EGRESS_POLL_INTERVAL_SECS")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(10),
    };

    let agent = AgentSettings {
        room_name: std::env::var("AGENT_ROOM_NAME").unwrap_or_else(|_| "interview".to_string()),
        participant_wait_attempts: std::env::var("AGENT_PARTICIPANT_WAIT_ATTEMPTS")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(60),
        participant_wait_interval_secs: std::env::var("AGENT_PARTICIPANT_WAIT_INTERVAL_SECS")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(2),
    };

    Ok(DotEnvyConfig {
        worker_server,
        database,
        livekit,
        storage: load_storage_settings()?,
        realtime,
        listener,
        agent,
    })
}

/// Recording is optional for the agent: if any storage credential is missing
/// the worker runs without it instead of failing startup.
fn load_storage_settings() -> Result<Option<StorageSettings>> {
    let access_key = std::env::var("STORAGE_ACCESS_KEY").ok();
    let secret_key = std::env::var("STORAGE_SECRET_KEY").ok();
    let endpoint = std::env::var("STORAGE_ENDPOINT").ok();
    let bucket = std::env::var("STORAGE_BUCKET").ok();

    let (Some(access_key), Some(secret_key), Some(endpoint), Some(bucket)) =
        (access_key, secret_key, endpoint, bucket)
    else {
        warn!("Storage credentials not fully configured; recording is disabled");
        return Ok(None);
    };

    Ok(Some(StorageSettings {
        provider: std::env::var("STORAGE_PROVIDER")
            .unwrap_or_else(|_| "LIVEKIT_S3".to_string())
            .parse()
            .context("STORAGE_PROVIDER is invalid")?,
        public_bucket: std::env::var("IS_PUBLIC_BUCKET")
            .map(|raw| raw == "true")
            .unwrap_or(false),
        access_key,
        secret_key,
        endpoint,
        bucket,
        region: std::env::var("STORAGE_REGION").unwrap_or_default(),
    }))
}
