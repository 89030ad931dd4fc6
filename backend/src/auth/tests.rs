use super::*;
use jsonwebtoken::{EncodingKey, Header, encode};
use std::env;

const TEST_SECRET: &str = "supersecretjwtsecretforunittesting123";

fn set_env_vars() {
    unsafe {
        env::set_var("SUPABASE_JWT_SECRET", TEST_SECRET);
    }
}

fn sign(claims: &SupabaseClaims, secret: &str) -> String {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

#[test]
fn valid_token_yields_its_claims() {
    set_env_vars();
    let claims = SupabaseClaims {
        sub: "123e4567-e89b-12d3-a456-426614174000".to_string(),
        aud: "authenticated".to_string(),
        role: "authenticated".to_string(),
        email: Some("candidate@example.com".to_string()),
        exp: 9999999999,
    };

    let validated = validate_supabase_jwt(&sign(&claims, TEST_SECRET))
        .expect("Valid token should pass");
    assert_eq!(validated.sub, claims.sub);
    assert_eq!(validated.email, claims.email);
}

#[test]
fn expired_token_is_rejected() {
    set_env_vars();
    let claims = SupabaseClaims {
        sub: "123e4567-e89b-12d3-a456-426614174000".to_string(),
        aud: "authenticated".to_string(),
        role: "authenticated".to_string(),
        email: None,
        exp: 1,
    };

    assert!(validate_supabase_jwt(&sign(&claims, TEST_SECRET)).is_err());
}

#[test]
fn wrong_signing_secret_is_rejected() {
    set_env_vars();
    let claims = SupabaseClaims {
        sub: "123e4567-e89b-12d3-a456-426614174000".to_string(),
        aud: "authenticated".to_string(),
        role: "authenticated".to_string(),
        email: None,
        exp: 9999999999,
    };

    assert!(validate_supabase_jwt(&sign(&claims, "wrongsecret")).is_err());
}
