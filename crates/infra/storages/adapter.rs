use tracing::info;

use crate::domain::value_objects::storage::{
    DirectUploadConfig, RecordingOutput, RecordingPlan, S3UploadDestination, StorageSettings,
};

const MP4_FILE_TYPE: &str = "MP4";

/// Builds the recording-output descriptor for the configured storage backend.
///
/// The S3 destination block is always present because the recording API
/// requires one. With the direct-upload provider the descriptor points at a
/// local file and the returned plan carries the out-of-band destination the
/// egress listener will consume; with the vendor-upload providers the service
/// writes straight to the bucket and no secondary config exists.
pub fn plan_recording(settings: &StorageSettings, filepath: &str) -> RecordingPlan {
    let destination = S3UploadDestination {
        access_key: settings.access_key.clone(),
        secret: settings.secret_key.clone(),
        region: settings.region.clone(),
        endpoint: settings.endpoint.clone(),
        bucket: settings.bucket.clone(),
        force_path_style: true,
    };

    if settings.provider.uses_direct_upload() {
        info!(
            provider = %settings.provider,
            public_bucket = settings.public_bucket,
            "recording locally, upload handled out-of-band"
        );

        return RecordingPlan {
            output: RecordingOutput {
                file_type: MP4_FILE_TYPE.to_string(),
                filepath: filepath.to_string(),
                s3: destination,
            },
            direct_upload: Some(DirectUploadConfig {
                access_key: settings.access_key.clone(),
                secret_key: settings.secret_key.clone(),
                endpoint: settings.endpoint.clone(),
                bucket: settings.bucket.clone(),
                region: settings.region.clone(),
                filepath: filepath.to_string(),
                public_bucket: settings.public_bucket,
            }),
        };
    }

    info!(provider = %settings.provider, "recording service uploads to the bucket directly");

    RecordingPlan {
        output: RecordingOutput {
            file_type: MP4_FILE_TYPE.to_string(),
            filepath: filepath.to_string(),
            s3: destination,
        },
        direct_upload: None,
    }
}
