use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

#[automock]
#[async_trait]
pub trait CreditRepository {
    /// Adds credits to the user's balance and returns the new balance.
    async fn increment_credits(&self, user_id: Uuid, amount: i32) -> Result<i32>;
    /// Spends one credit. Returns the remaining balance, or `None` when the
    /// balance was already zero (nothing is mutated in that case).
    async fn use_credit(&self, user_id: Uuid) -> Result<Option<i32>>;
    async fn credits_for_user(&self, user_id: Uuid) -> Result<Option<i32>>;
}
