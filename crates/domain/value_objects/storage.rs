use serde::{Deserialize, Serialize};

use crate::domain::value_objects::enums::storage_providers::StorageProvider;

/// Storage configuration read once at process start.
#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub provider: StorageProvider,
    pub public_bucket: bool,
    pub access_key: String,
    pub secret_key: String,
    pub endpoint: String,
    pub bucket: String,
    pub region: String,
}

/// S3 destination block embedded in the egress request. The recording API
/// requires this even when the upload is handled out-of-band.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct S3UploadDestination {
    pub access_key: String,
    pub secret: String,
    pub region: String,
    pub endpoint: String,
    pub bucket: String,
    pub force_path_style: bool,
}

/// Encoded-file output descriptor sent to StartRoomCompositeEgress.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecordingOutput {
    pub file_type: String,
    pub filepath: String,
    pub s3: S3UploadDestination,
}

/// Destination handed to the egress listener when the recording is written
/// locally first and uploaded out-of-band. Held in memory only, keyed by
/// egress id, and consumed when the upload starts.
#[derive(Debug, Clone)]
pub struct DirectUploadConfig {
    pub access_key: String,
    pub secret_key: String,
    pub endpoint: String,
    pub bucket: String,
    pub region: String,
    pub filepath: String,
    pub public_bucket: bool,
}

/// Result of planning a recording: the descriptor for the egress request and,
/// for the direct-upload provider, the out-of-band destination.
#[derive(Debug, Clone)]
pub struct RecordingPlan {
    pub output: RecordingOutput,
    pub direct_upload: Option<DirectUploadConfig>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadedRecording {
    pub object_key: String,
    pub url: String,
}
