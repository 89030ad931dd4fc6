use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use std::sync::Arc;

use crate::domain::value_objects::storage::{DirectUploadConfig, UploadedRecording};

#[automock]
#[async_trait]
pub trait RecordingStorageClient {
    /// Pushes a local media file to the bucket under the given object name
    /// and returns the key plus a retrievable URL. Read and network errors
    /// propagate; retrying is the caller's concern.
    async fn upload_recording(
        &self,
        local_path: &str,
        object_name: &str,
    ) -> Result<UploadedRecording>;
}

/// Builds a storage client for one registered destination. Registered configs
/// carry their own credentials, so the client is constructed per upload.
#[automock]
#[async_trait]
pub trait RecordingStorageClientFactory {
    async fn client_for(
        &self,
        config: DirectUploadConfig,
    ) -> Result<Arc<dyn RecordingStorageClient + Send + Sync>>;
}
