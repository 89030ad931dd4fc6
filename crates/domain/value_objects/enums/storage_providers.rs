use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Which storage backend receives finished recordings. `LivekitS3` and
/// `Supabase` both let the recording service upload to the bucket itself;
/// `Backblaze` records to a local file and uploads out-of-band.
#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StorageProvider {
    #[default]
    LivekitS3,
    Supabase,
    Backblaze,
}

impl StorageProvider {
    pub fn uses_direct_upload(&self) -> bool {
        matches!(self, StorageProvider::Backblaze)
    }
}

impl Display for StorageProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let provider = match self {
            StorageProvider::LivekitS3 => "LIVEKIT_S3",
            StorageProvider::Supabase => "SUPABASE",
            StorageProvider::Backblaze => "BACKBLAZE",
        };
        write!(f, "{}", provider)
    }
}

impl FromStr for StorageProvider {
    type Err = anyhow::Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_uppercase().as_str() {
            "LIVEKIT_S3" => Ok(StorageProvider::LivekitS3),
            "SUPABASE" => Ok(StorageProvider::Supabase),
            "BACKBLAZE" => Ok(StorageProvider::Backblaze),
            other => Err(anyhow::anyhow!("unsupported storage provider: {}", other)),
        }
    }
}
