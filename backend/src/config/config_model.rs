use crates::{
    domain::value_objects::storage::StorageSettings,
    infra::livekit::egress_client::LiveKitApiConfig,
};

#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub backend_server: BackendServer,
    pub database: Database,
    pub supabase: Supabase,
    pub livekit: LiveKitApiConfig,
    pub storage: StorageSettings,
    pub xpay: XPay,
}

#[derive(Debug, Clone)]
pub struct BackendServer {
    pub port: u16,
    pub body_limit: u64,
    pub timeout: u64,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct Supabase {
    pub jwt_secret: String,
}

#[derive(Debug, Clone)]
pub struct XPay {
    pub api_key: String,
    pub community_id: String,
    pub base_url: String,
    pub callback_url: String,
}
