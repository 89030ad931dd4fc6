pub mod db;
pub mod livekit;
pub mod realtime;
pub mod storages;
