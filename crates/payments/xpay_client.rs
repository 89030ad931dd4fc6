use anyhow::Result;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

const API_KEY_HEADER: &str = "x-api-key";

/// Minimal XPay community-payments client built on reqwest.
pub struct XPayClient {
    http: reqwest::Client,
    api_key: String,
    community_id: String,
    base_url: String,
    callback_url: String,
}

#[derive(Debug, Clone)]
pub struct NewDirectOrder {
    pub user_id: Uuid,
    pub user_email: String,
    pub user_name: String,
    pub amount_in_cents: i64,
    pub product_description: String,
    pub variable_amount_id: i64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CreatedOrder {
    pub payment_url: String,
    pub payment_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct XPayPayment {
    #[serde(default)]
    pub paid: bool,
}

#[derive(Debug, Deserialize)]
struct XPayEnvelope<T> {
    #[serde(default)]
    status: bool,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
    data: Option<T>,
}

impl<T> XPayEnvelope<T> {
    fn into_data(self, context: &str) -> Result<T> {
        if !self.status {
            let reason = self
                .msg
                .or(self.message)
                .unwrap_or_else(|| "gateway reported failure".to_string());
            anyhow::bail!("XPay {} failed: {}", context, reason);
        }
        self.data
            .ok_or_else(|| anyhow::anyhow!("XPay {} response is missing data", context))
    }
}

#[derive(Debug, Serialize)]
struct DirectOrderRequest<'a> {
    community_id: &'a str,
    amount: f64,
    currency: &'a str,
    variable_amount_id: i64,
    custom_fields: DirectOrderCustomFields<'a>,
    callback_url: &'a str,
}

#[derive(Debug, Serialize)]
struct DirectOrderCustomFields<'a> {
    user_id: String,
    user_email: &'a str,
    user_name: &'a str,
    product: &'a str,
}

impl XPayClient {
    pub fn new(
        api_key: String,
        community_id: String,
        base_url: String,
        callback_url: String,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            community_id,
            base_url,
            callback_url,
        }
    }

    async fn ensure_success(resp: reqwest::Response, context: &str) -> Result<reqwest::Response> {
        if resp.status().is_success() {
            return Ok(resp);
        }

        let status = resp.status();
        let body = match resp.text().await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => "<empty response body>".to_string(),
            Err(err) => format!("<failed to read response body: {err}>"),
        };

        error!(
            status = %status,
            response_body = %body,
            context = %context,
            "xpay api request failed"
        );

        anyhow::bail!("XPay API request failed: {} (status {})", context, status);
    }

    /// Creates a hosted-payment order and returns the redirect URL plus the
    /// token used for verification later.
    /// https://community.xpay.app API: POST /direct-order
    pub async fn create_direct_order(&self, order: NewDirectOrder) -> Result<CreatedOrder> {
        // The gateway expects the amount in base currency units.
        let request = DirectOrderRequest {
            community_id: &self.community_id,
            amount: order.amount_in_cents as f64 / 100.0,
            currency: "EGP",
            variable_amount_id: order.variable_amount_id,
            custom_fields: DirectOrderCustomFields {
                user_id: order.user_id.to_string(),
                user_email: &order.user_email,
                user_name: &order.user_name,
                product: &order.product_description,
            },
            callback_url: &self.callback_url,
        };

        let resp = self
            .http
            .post(format!("{}/direct-order", self.base_url.trim_end_matches('/')))
            .header(API_KEY_HEADER, &self.api_key)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(&request)
            .send()
            .await?;
        let resp = Self::ensure_success(resp, "create direct order").await?;

        let envelope: XPayEnvelope<CreatedOrder> = resp.json().await?;
        envelope.into_data("create direct order")
    }

    /// Fetches a payment by its token; `paid` is the gateway's settled flag.
    pub async fn fetch_payment(&self, payment_token: &str) -> Result<XPayPayment> {
        let resp = self
            .http
            .get(format!(
                "{}/payment/{}",
                self.base_url.trim_end_matches('/'),
                payment_token
            ))
            .header(API_KEY_HEADER, &self.api_key)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        let resp = Self::ensure_success(resp, "fetch payment").await?;

        let envelope: XPayEnvelope<XPayPayment> = resp.json().await?;
        envelope.into_data("fetch payment")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_envelope_unwraps_on_success() {
        let raw = r#"{
            "status": true,
            "data": { "payment_url": "https://pay.example/p/1", "payment_token": "tok_1" }
        }"#;
        let envelope: XPayEnvelope<CreatedOrder> = serde_json::from_str(raw).unwrap();
        let order = envelope.into_data("create direct order").unwrap();
        assert_eq!(order.payment_url, "https://pay.example/p/1");
        assert_eq!(order.payment_token.as_deref(), Some("tok_1"));
    }

    #[test]
    fn failed_envelope_surfaces_the_gateway_message() {
        let raw = r#"{ "status": false, "msg": "amount too small" }"#;
        let envelope: XPayEnvelope<CreatedOrder> = serde_json::from_str(raw).unwrap();
        let err = envelope.into_data("create direct order").unwrap_err();
        assert!(err.to_string().contains("amount too small"));
    }

    #[test]
    fn payment_defaults_to_unpaid_when_the_flag_is_absent() {
        let raw = r#"{ "status": true, "data": {} }"#;
        let envelope: XPayEnvelope<XPayPayment> = serde_json::from_str(raw).unwrap();
        let payment = envelope.into_data("fetch payment").unwrap();
        assert!(!payment.paid);
    }
}
