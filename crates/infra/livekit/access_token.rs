use anyhow::{Context, Result, bail};
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::time::Duration;

/// Video grants embedded in a service access token.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VideoGrants {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    #[serde(default)]
    pub room_join: bool,
    #[serde(default)]
    pub room_record: bool,
    #[serde(default)]
    pub room_admin: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct AccessTokenClaims {
    iss: String,
    nbf: i64,
    exp: i64,
    video: VideoGrants,
}

/// Mints a short-lived HS256 access token for server-to-server API calls.
pub fn mint_service_token(
    api_key: &str,
    api_secret: &str,
    grants: VideoGrants,
    ttl: Duration,
) -> Result<String> {
    let now = Utc::now().timestamp();
    let claims = AccessTokenClaims {
        iss: api_key.to_string(),
        nbf: now,
        exp: now + ttl.as_secs() as i64,
        video: grants,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(api_secret.as_bytes()),
    )
    .context("failed to sign access token")
}

#[derive(Debug, Deserialize)]
struct WebhookClaims {
    iss: String,
    #[allow(dead_code)]
    exp: i64,
    sha256: Option<String>,
}

/// Verifies a webhook delivery: the Authorization header carries a JWT signed
/// with the API secret whose `sha256` claim is the hex digest of the body.
pub fn verify_webhook_token(
    authorization: &str,
    api_key: &str,
    api_secret: &str,
    body: &[u8],
) -> Result<()> {
    let token = authorization.trim();
    let token = token.strip_prefix("Bearer ").unwrap_or(token);

    let validation = Validation::new(Algorithm::HS256);
    let data = decode::<WebhookClaims>(
        token,
        &DecodingKey::from_secret(api_secret.as_bytes()),
        &validation,
    )
    .context("webhook token validation failed")?;

    if data.claims.iss != api_key {
        bail!("webhook token issued for a different API key");
    }

    let digest = hex::encode(Sha256::digest(body));
    match data.claims.sha256 {
        Some(expected) if expected.eq_ignore_ascii_case(&digest) => Ok(()),
        Some(_) => bail!("webhook body digest mismatch"),
        None => bail!("webhook token is missing the body digest"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const API_KEY: &str = "APIkeyForTests";
    const API_SECRET: &str = "secretForTestsOnlySecretForTestsOnly";

    fn sign_webhook_token(api_key: &str, api_secret: &str, body: &[u8]) -> String {
        let now = Utc::now().timestamp();
        let claims = json!({
            "iss": api_key,
            "nbf": now,
            "exp": now + 600,
            "sha256": hex::encode(Sha256::digest(body)),
        });
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(api_secret.as_bytes()),
        )
        .expect("test token should sign")
    }

    #[test]
    fn service_token_round_trips_with_its_grants() {
        let token = mint_service_token(
            API_KEY,
            API_SECRET,
            VideoGrants {
                room: Some("interview-1".to_string()),
                room_record: true,
                ..VideoGrants::default()
            },
            Duration::from_secs(600),
        )
        .unwrap();

        let decoded = decode::<AccessTokenClaims>(
            &token,
            &DecodingKey::from_secret(API_SECRET.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .expect("token should validate against the same secret");

        assert_eq!(decoded.claims.iss, API_KEY);
        assert!(decoded.claims.video.room_record);
        assert_eq!(decoded.claims.video.room.as_deref(), Some("interview-1"));
    }

    #[test]
    fn webhook_token_verifies_against_the_delivered_body() {
        let body = br#"{"type":"egress_finished"}"#;
        let token = sign_webhook_token(API_KEY, API_SECRET, body);

        assert!(verify_webhook_token(&token, API_KEY, API_SECRET, body).is_ok());
        // Bearer prefix is tolerated.
        let with_prefix = format!("Bearer {}", token);
        assert!(verify_webhook_token(&with_prefix, API_KEY, API_SECRET, body).is_ok());
    }

    #[test]
    fn tampered_body_or_wrong_secret_is_rejected() {
        let body = br#"{"type":"egress_finished"}"#;
        let token = sign_webhook_token(API_KEY, API_SECRET, body);

        assert!(verify_webhook_token(&token, API_KEY, API_SECRET, b"{}").is_err());
        assert!(verify_webhook_token(&token, API_KEY, "another-secret", body).is_err());
        assert!(verify_webhook_token(&token, "other-key", API_SECRET, body).is_err());
    }
}
