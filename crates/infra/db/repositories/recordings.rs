use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::recordings::{InsertRecordingEntity, RecordingCompletionUpdate},
        repositories::recordings::RecordingRepository,
    },
    infra::db::postgres::{postgres_connection::PgPoolArena, schema::recordings},
};

pub struct RecordingPostgres {
    db_pool: Arc<PgPoolArena>,
}

impl RecordingPostgres {
    pub fn new(db_pool: Arc<PgPoolArena>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl RecordingRepository for RecordingPostgres {
    async fn insert(&self, insert_recording_entity: InsertRecordingEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(recordings::table)
            .values(&insert_recording_entity)
            .returning(recordings::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(result)
    }

    async fn update_by_egress_id(
        &self,
        egress_id: String,
        changeset: RecordingCompletionUpdate,
    ) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let affected = update(recordings::table.filter(recordings::egress_id.eq(egress_id)))
            .set(changeset)
            .execute(&mut conn)?;

        Ok(affected)
    }
}
