use anyhow::Result;
use crates::domain::repositories::credits::CreditRepository;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub struct InterviewCreditsUseCase {
    repository: Arc<dyn CreditRepository + Send + Sync>,
}

impl InterviewCreditsUseCase {
    pub fn new(repository: Arc<dyn CreditRepository + Send + Sync>) -> Self {
        Self { repository }
    }

    /// Spends one interview credit. Returns the remaining balance, or `None`
    /// when the user had no credit left.
    pub async fn use_credit(&self, user_id: Uuid) -> Result<Option<i32>> {
        let remaining = self.repository.use_credit(user_id).await?;
        match remaining {
            Some(balance) => info!(%user_id, balance, "interview credit used"),
            None => info!(%user_id, "interview credit refused: balance is empty"),
        }
        Ok(remaining)
    }

    /// Current balance; `None` when the user has no profile row.
    pub async fn balance(&self, user_id: Uuid) -> Result<Option<i32>> {
        self.repository.credits_for_user(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crates::domain::repositories::credits::MockCreditRepository;

    #[tokio::test]
    async fn spending_returns_the_remaining_balance() {
        let mut repository = MockCreditRepository::new();
        repository
            .expect_use_credit()
            .times(1)
            .returning(|_| Ok(Some(2)));

        let usecase = InterviewCreditsUseCase::new(Arc::new(repository));
        assert_eq!(usecase.use_credit(Uuid::new_v4()).await.unwrap(), Some(2));
    }

    #[tokio::test]
    async fn empty_balance_yields_none() {
        let mut repository = MockCreditRepository::new();
        repository
            .expect_use_credit()
            .times(1)
            .returning(|_| Ok(None));

        let usecase = InterviewCreditsUseCase::new(Arc::new(repository));
        assert_eq!(usecase.use_credit(Uuid::new_v4()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn balance_reads_without_mutating() {
        let mut repository = MockCreditRepository::new();
        repository
            .expect_credits_for_user()
            .times(1)
            .returning(|_| Ok(Some(5)));
        repository.expect_use_credit().times(0);

        let usecase = InterviewCreditsUseCase::new(Arc::new(repository));
        assert_eq!(usecase.balance(Uuid::new_v4()).await.unwrap(), Some(5));
    }
}
