use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infra::db::postgres::schema::payment_orders;

/// Ledger of payment tokens that have already been verified and credited.
/// The unique token column is what stops a replayed token from crediting twice.
#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = payment_orders)]
pub struct PaymentOrderEntity {
    pub id: Uuid,
    pub payment_token: String,
    pub user_id: Uuid,
    pub credits_awarded: i32,
    pub verified_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = payment_orders)]
pub struct InsertPaymentOrderEntity {
    pub payment_token: String,
    pub user_id: Uuid,
    pub credits_awarded: i32,
    pub verified_at: DateTime<Utc>,
}
