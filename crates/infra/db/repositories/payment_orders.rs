use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, insert_into, prelude::*};
use std::sync::Arc;

use crate::{
    domain::{
        entities::payment_orders::InsertPaymentOrderEntity,
        repositories::payment_orders::PaymentOrderRepository,
    },
    infra::db::postgres::{postgres_connection::PgPoolArena, schema::payment_orders},
};

pub struct PaymentOrderPostgres {
    db_pool: Arc<PgPoolArena>,
}

impl PaymentOrderPostgres {
    pub fn new(db_pool: Arc<PgPoolArena>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PaymentOrderRepository for PaymentOrderPostgres {
    async fn record_verified_order(&self, order: InsertPaymentOrderEntity) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        // ON CONFLICT DO NOTHING on the unique token column: zero rows means
        // this token was already redeemed.
        let inserted = insert_into(payment_orders::table)
            .values(&order)
            .on_conflict(payment_orders::payment_token)
            .do_nothing()
            .execute(&mut conn)?;

        Ok(inserted > 0)
    }
}
