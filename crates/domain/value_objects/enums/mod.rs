pub mod recording_statuses;
pub mod storage_providers;
