use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_s3::{presigning::PresigningConfig, primitives::ByteStream};
use mime_guess::MimeGuess;
use tokio::fs;
use tracing::info;

use crate::domain::{
    repositories::storage::{RecordingStorageClient, RecordingStorageClientFactory},
    value_objects::storage::{DirectUploadConfig, UploadedRecording},
};

use super::s3::S3ClientSettings;

/// Signed download links for private buckets are valid for 7 days.
const SIGNED_URL_TTL: Duration = Duration::from_secs(604_800);

/// Backblaze serves public-bucket files from a fixed friendly host.
const PUBLIC_DOWNLOAD_HOST: &str = "https://f002.backblazeb2.com";

#[derive(Debug, Clone)]
pub struct B2StorageConfig {
    pub endpoint: String,
    pub region: String,
    pub bucket: String,
    pub key_id: String,
    pub application_key: String,
    pub public_bucket: bool,
}

impl From<DirectUploadConfig> for B2StorageConfig {
    fn from(config: DirectUploadConfig) -> Self {
        Self {
            endpoint: config.endpoint,
            region: config.region,
            bucket: config.bucket,
            key_id: config.access_key,
            application_key: config.secret_key,
            public_bucket: config.public_bucket,
        }
    }
}

pub struct B2StorageClient {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_bucket: bool,
}

impl B2StorageClient {
    pub async fn new(config: B2StorageConfig) -> Result<Self> {
        let s3_client = S3ClientSettings::new(
            config.endpoint,
            config.region,
            config.key_id,
            config.application_key,
        )
        .connect()
        .await
        .context("failed to build B2 s3 client")?;

        Ok(Self {
            client: s3_client,
            bucket: config.bucket,
            public_bucket: config.public_bucket,
        })
    }

    async fn retrieval_url(&self, object_key: &str) -> Result<String> {
        if self.public_bucket {
            return Ok(public_object_url(&self.bucket, object_key));
        }

        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(object_key)
            .presigned(
                PresigningConfig::expires_in(SIGNED_URL_TTL)
                    .context("invalid presigning expiry")?,
            )
            .await
            .with_context(|| format!("failed to presign download for {}", object_key))?;

        Ok(presigned.uri().to_string())
    }
}

#[async_trait]
impl RecordingStorageClient for B2StorageClient {
    async fn upload_recording(
        &self,
        local_path: &str,
        object_name: &str,
    ) -> Result<UploadedRecording> {
        let path = Path::new(local_path);
        if !path.exists() {
            anyhow::bail!("local file does not exist: {}", local_path);
        }

        let metadata = fs::metadata(path)
            .await
            .with_context(|| format!("failed to read metadata for {}", local_path))?;

        let content_type = MimeGuess::from_path(path)
            .first_raw()
            .unwrap_or("video/mp4")
            .to_string();

        let body = ByteStream::from_path(path)
            .await
            .with_context(|| format!("failed to open recording file {}", local_path))?;

        // Backblaze B2 S3-compatible PutObject request reference:
        // https://www.backblaze.com/docs/cloud-storage-s3-compatible-apis#put-object
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(object_name)
            .body(body)
            .content_type(content_type)
            .send()
            .await
            .with_context(|| {
                format!(
                    "failed to upload {} to Backblaze B2 bucket {}",
                    local_path, self.bucket
                )
            })?;

        let url = self.retrieval_url(object_name).await?;

        info!(
            bucket = %self.bucket,
            key = %object_name,
            size_bytes = metadata.len(),
            public = self.public_bucket,
            "b2 upload completed"
        );

        Ok(UploadedRecording {
            object_key: object_name.to_string(),
            url,
        })
    }
}

/// Format: https://f002.backblazeb2.com/file/{bucket}/{fileName}
pub fn public_object_url(bucket: &str, object_name: &str) -> String {
    format!("{}/file/{}/{}", PUBLIC_DOWNLOAD_HOST, bucket, object_name)
}

pub struct B2ClientFactory;

#[async_trait]
impl RecordingStorageClientFactory for B2ClientFactory {
    async fn client_for(
        &self,
        config: DirectUploadConfig,
    ) -> Result<Arc<dyn RecordingStorageClient + Send + Sync>> {
        let client = B2StorageClient::new(config.into()).await?;
        Ok(Arc::new(client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::storage::RecordingStorageClient;
    use anyhow::Result;

    #[test]
    fn public_urls_use_the_fixed_download_host() {
        assert_eq!(
            public_object_url("interviews", "recording-R1.mp4"),
            "https://f002.backblazeb2.com/file/interviews/recording-R1.mp4"
        );
    }

    #[test]
    fn signed_url_ttl_is_seven_days() {
        assert_eq!(SIGNED_URL_TTL.as_secs(), 604_800);
    }

    fn load_b2_config_from_env() -> B2StorageConfig {
        dotenvy::dotenv().ok();

        B2StorageConfig {
            endpoint: std::env::var("STORAGE_ENDPOINT").expect("STORAGE_ENDPOINT is required"),
            region: std::env::var("STORAGE_REGION").unwrap_or_default(),
            bucket: std::env::var("STORAGE_BUCKET").expect("STORAGE_BUCKET is required"),
            key_id: std::env::var("STORAGE_ACCESS_KEY").expect("STORAGE_ACCESS_KEY is required"),
            application_key: std::env::var("STORAGE_SECRET_KEY")
                .expect("STORAGE_SECRET_KEY is required"),
            public_bucket: std::env::var("IS_PUBLIC_BUCKET")
                .map(|raw| raw == "true")
                .unwrap_or(false),
        }
    }

    // Manual check: place an mp4 named `test-recording.mp4` in the repo root,
    // export the STORAGE_* credentials, then run:
    // cargo test -p crates b2::tests::upload_mp4_to_b2 -- --ignored --nocapture
    #[tokio::test]
    #[ignore = "hits real Backblaze B2 and needs local test file + credentials"]
    async fn upload_mp4_to_b2() -> Result<()> {
        let mp4_path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .parent()
            .expect("workspace root should exist")
            .join("test-recording.mp4");
        if !mp4_path.exists() {
            anyhow::bail!("place `test-recording.mp4` in the project root to run this test");
        }

        let client = B2StorageClient::new(load_b2_config_from_env()).await?;
        let uploaded = client
            .upload_recording(
                mp4_path.to_str().expect("path should be valid utf-8"),
                "manual-upload-check.mp4",
            )
            .await?;
        println!("uploaded to {} ({})", uploaded.object_key, uploaded.url);

        Ok(())
    }
}
