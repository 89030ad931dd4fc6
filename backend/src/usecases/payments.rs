use anyhow::Result;
use chrono::Utc;
use crates::domain::{
    entities::payment_orders::InsertPaymentOrderEntity,
    repositories::{credits::CreditRepository, payment_orders::PaymentOrderRepository},
};
use crates::payments::{PaymentGateway, xpay_client::{CreatedOrder, NewDirectOrder}};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

pub struct PaymentsUseCase {
    gateway: Arc<dyn PaymentGateway + Send + Sync>,
    credit_repository: Arc<dyn CreditRepository + Send + Sync>,
    order_repository: Arc<dyn PaymentOrderRepository + Send + Sync>,
}

#[derive(Debug, PartialEq)]
pub enum VerifyOutcome {
    /// The gateway did not confirm the payment; nothing was mutated.
    Unpaid,
    /// The token was already redeemed; no second credit was awarded.
    AlreadyRedeemed,
    /// Payment confirmed and credits awarded.
    Credited { balance: i32 },
    /// Payment confirmed at the gateway but the credit write failed; needs
    /// manual reconciliation.
    CreditWriteFailed,
}

impl PaymentsUseCase {
    pub fn new(
        gateway: Arc<dyn PaymentGateway + Send + Sync>,
        credit_repository: Arc<dyn CreditRepository + Send + Sync>,
        order_repository: Arc<dyn PaymentOrderRepository + Send + Sync>,
    ) -> Self {
        Self {
            gateway,
            credit_repository,
            order_repository,
        }
    }

    pub async fn create_order(&self, order: NewDirectOrder) -> Result<CreatedOrder> {
        info!(
            user_id = %order.user_id,
            amount_in_cents = order.amount_in_cents,
            "creating payment order"
        );
        self.gateway.create_direct_order(order).await
    }

    /// Verifies a payment token and awards credits exactly once per token.
    pub async fn verify_payment(
        &self,
        payment_token: String,
        user_id: Uuid,
        credits_to_award: i32,
    ) -> Result<VerifyOutcome> {
        let payment = self.gateway.fetch_payment(&payment_token).await?;

        if !payment.paid {
            warn!(user_id = %user_id, "payment verification failed: not paid");
            return Ok(VerifyOutcome::Unpaid);
        }

        // Record the token before crediting: the unique-token insert is the
        // replay guard.
        let recorded = match self
            .order_repository
            .record_verified_order(InsertPaymentOrderEntity {
                payment_token,
                user_id,
                credits_awarded: credits_to_award,
                verified_at: Utc::now(),
            })
            .await
        {
            Ok(recorded) => recorded,
            Err(err) => {
                error!(user_id = %user_id, error = ?err, "payment verified but order write failed");
                return Ok(VerifyOutcome::CreditWriteFailed);
            }
        };

        if !recorded {
            warn!(user_id = %user_id, "payment token already redeemed");
            return Ok(VerifyOutcome::AlreadyRedeemed);
        }

        match self
            .credit_repository
            .increment_credits(user_id, credits_to_award)
            .await
        {
            Ok(balance) => {
                info!(user_id = %user_id, credits_to_award, balance, "credits awarded");
                Ok(VerifyOutcome::Credited { balance })
            }
            Err(err) => {
                // Payment captured and token recorded, but no credits landed.
                error!(user_id = %user_id, error = ?err, "payment verified but credit write failed");
                Ok(VerifyOutcome::CreditWriteFailed)
            }
        }
    }
}
