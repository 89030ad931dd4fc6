use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::payment_orders::InsertPaymentOrderEntity;

#[automock]
#[async_trait]
pub trait PaymentOrderRepository {
    /// Records a verified payment token. Returns `false` when the token was
    /// already recorded, which is how a replayed token is detected.
    async fn record_verified_order(&self, order: InsertPaymentOrderEntity) -> Result<bool>;
}
