use chrono::{DateTime, Utc};
use diesel::{AsChangeset, prelude::*};
use uuid::Uuid;

use crate::infra::db::postgres::schema::recordings;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = recordings)]
pub struct RecordingEntity {
    pub id: Uuid,
    pub room_name: String,
    pub egress_id: String,
    pub status: String,
    pub file_url: Option<String>,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = recordings)]
pub struct InsertRecordingEntity {
    pub room_name: String,
    pub egress_id: String,
    pub status: String,
    pub started_at: DateTime<Utc>,
    pub user_id: Option<String>,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = recordings)]
pub struct RecordingCompletionUpdate {
    pub status: String,
    pub file_url: Option<String>,
    pub ended_at: Option<DateTime<Utc>>,
}
