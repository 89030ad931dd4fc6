use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{OptionalExtension, RunQueryDsl, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{entities::user_profiles::UserProfileEntity, repositories::credits::CreditRepository},
    infra::db::postgres::{postgres_connection::PgPoolArena, schema::user_profiles},
};

pub struct CreditPostgres {
    db_pool: Arc<PgPoolArena>,
}

impl CreditPostgres {
    pub fn new(db_pool: Arc<PgPoolArena>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl CreditRepository for CreditPostgres {
    async fn increment_credits(&self, user_id: Uuid, amount: i32) -> Result<i32> {
        let mut conn = Arc::clone(&self.db_pool).get()?;
        let now = Utc::now();

        let balance = update(user_profiles::table.filter(user_profiles::id.eq(user_id)))
            .set((
                user_profiles::credits.eq(user_profiles::credits + amount),
                user_profiles::updated_at.eq(now),
            ))
            .returning(user_profiles::credits)
            .get_result::<i32>(&mut conn)?;

        Ok(balance)
    }

    async fn use_credit(&self, user_id: Uuid) -> Result<Option<i32>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;
        let now = Utc::now();

        // The `credits > 0` filter makes the decrement and the balance check
        // a single atomic statement.
        let remaining = update(
            user_profiles::table
                .filter(user_profiles::id.eq(user_id))
                .filter(user_profiles::credits.gt(0)),
        )
        .set((
            user_profiles::credits.eq(user_profiles::credits - 1),
            user_profiles::updated_at.eq(now),
        ))
        .returning(user_profiles::credits)
        .get_result::<i32>(&mut conn)
        .optional()?;

        Ok(remaining)
    }

    async fn credits_for_user(&self, user_id: Uuid) -> Result<Option<i32>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let profile = user_profiles::table
            .find(user_id)
            .select(UserProfileEntity::as_select())
            .first::<UserProfileEntity>(&mut conn)
            .optional()?;

        Ok(profile.map(|profile| profile.credits))
    }
}
