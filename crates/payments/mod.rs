pub mod xpay_client;

use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use xpay_client::{CreatedOrder, NewDirectOrder, XPayClient, XPayPayment};

/// Gateway surface the payment usecases depend on.
#[automock]
#[async_trait]
pub trait PaymentGateway {
    async fn create_direct_order(&self, order: NewDirectOrder) -> Result<CreatedOrder>;
    async fn fetch_payment(&self, payment_token: &str) -> Result<XPayPayment>;
}

#[async_trait]
impl PaymentGateway for XPayClient {
    async fn create_direct_order(&self, order: NewDirectOrder) -> Result<CreatedOrder> {
        XPayClient::create_direct_order(self, order).await
    }

    async fn fetch_payment(&self, payment_token: &str) -> Result<XPayPayment> {
        XPayClient::fetch_payment(self, payment_token).await
    }
}
