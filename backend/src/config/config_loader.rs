use anyhow::{Context, Result};
use crates::{
    domain::value_objects::storage::StorageSettings,
    infra::livekit::egress_client::LiveKitApiConfig,
};

use super::config_model::{BackendServer, Database, DotEnvyConfig, Supabase, XPay};

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let backend_server = BackendServer {
        port: std::env::var("SERVER_PORT")
            .expect("SERVER_PORT is invalid")
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

    let supabase = Supabase {
        jwt_secret: std::env::var("SUPABASE_JWT_SECRET").expect("SUPABASE_JWT_SECRET is invalid"),
    };

    let livekit = LiveKitApiConfig {
        url: std::env::var("LIVEKIT_URL").expect("LIVEKIT_URL is invalid"),
        api_key: std::env::var("LIVEKIT_API_KEY").expect("LIVEKIT_API_KEY is invalid"),
        api_secret: std::env::var("LIVEKIT_API_SECRET").expect("LIVEKIT_API_SECRET is invalid"),
    };

    let storage = load_storage_settings()?;

    let xpay = XPay {
        api_key: std::env::var("XPAY_API_KEY").expect("XPAY_API_KEY is invalid"),
        community_id: std::env::var("XPAY_COMMUNITY_ID").expect("XPAY_COMMUNITY_ID is invalid"),
        base_url: std::env::var("XPAY_BASE_URL")
            .unwrap_or_else(|_| "https://community.xpay.app/api/v1".to_string()),
        callback_url: std::env::var("XPAY_CALLBACK_URL").expect("XPAY_CALLBACK_URL is invalid"),
    };

    Ok(DotEnvyConfig {
        backend_server,
        database,
        supabase,
        livekit,
        storage,
        xpay,
    })
}

pub fn load_storage_settings() -> Result<StorageSettings> {
    Ok(StorageSettings {
        provider: std::env::var("STORAGE_PROVIDER")
            .unwrap_or_else(|_| "LIVEKIT_S3".to_string())
            .parse()
            .context("STORAGE_PROVIDER is invalid")?,
        public_bucket: std::env::var("IS_PUBLIC_BUCKET")
            .map(|raw| raw == "true")
            .unwrap_or(false),
        access_key: std::env::var("STORAGE_ACCESS_KEY").expect("STORAGE_ACCESS_KEY is invalid"),
        secret_key: std::env::var("STORAGE_SECRET_KEY").expect("STORAGE_SECRET_KEY is invalid"),
        endpoint: std::env::var("STORAGE_ENDPOINT").expect("STORAGE_ENDPOINT is invalid"),
        bucket: std::env::var("STORAGE_BUCKET").expect("STORAGE_BUCKET is invalid"),
        region: std::env::var("STORAGE_REGION").unwrap_or_default(),
    })
}
