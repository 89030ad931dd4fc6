use crates::{
    domain::value_objects::storage::StorageSettings,
    infra::{livekit::egress_client::LiveKitApiConfig, realtime::openai_realtime::OpenAiRealtimeConfig},
};

#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub worker_server: WorkerServer,
    pub database: Database,
    pub livekit: LiveKitApiConfig,
    /// Absent when the storage credentials are incomplete; the agent then
    /// skips recording entirely.
    pub storage: Option<StorageSettings>,
    pub realtime: OpenAiRealtimeConfig,
    pub listener: Listener,
    pub agent: AgentSettings,
}

#[derive(Debug, Clone)]
pub struct WorkerServer {
    pub port: u16,
    pub timeout: u64,
    pub body_limit: u64,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct Listener {
    pub poll_interval_secs: u64,
}

#[derive(Debug, Clone)]
pub struct AgentSettings {
    pub room_name: String,
    pub participant_wait_attempts: u32,
    pub participant_wait_interval_secs: u64,
}
