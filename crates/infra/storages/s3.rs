use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use aws_config::{BehaviorVersion, timeout::TimeoutConfig};
use aws_credential_types::Credentials;
use aws_sdk_s3::{Client, config::Region};
use http::Uri;

/// Connection settings for an S3-compatible endpoint. Non-AWS hosts need
/// path-style addressing, so it is always on.
#[derive(Debug, Clone)]
pub struct S3ClientSettings {
    pub endpoint: String,
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
}

impl S3ClientSettings {
    pub fn new(endpoint: String, region: String, access_key: String, secret_key: String) -> Self {
        Self {
            endpoint,
            region,
            access_key,
            secret_key,
            connect_timeout: Duration::from_secs(10),
            // Recording files run to hundreds of megabytes.
            read_timeout: Duration::from_secs(300),
        }
    }

    /// Builds an SDK client bound to the configured endpoint.
    pub async fn connect(&self) -> Result<Client> {
        let endpoint = format!("{}/", self.endpoint.trim_end_matches('/'));
        Uri::from_str(&endpoint).context("invalid s3 endpoint URL")?;

        let region = Region::new(self.region.clone());
        let timeouts = TimeoutConfig::builder()
            .connect_timeout(self.connect_timeout)
            .read_timeout(self.read_timeout)
            .build();

        let base = aws_config::defaults(BehaviorVersion::latest())
            .region(region.clone())
            .credentials_provider(Credentials::new(
                self.access_key.clone(),
                self.secret_key.clone(),
                None,
                None,
                "s3-compatible",
            ))
            .timeout_config(timeouts)
            .load()
            .await;

        let conf = aws_sdk_s3::config::Builder::from(&base)
            .endpoint_url(endpoint)
            .force_path_style(true)
            .region(region)
            .build();

        Ok(Client::from_conf(conf))
    }
}
