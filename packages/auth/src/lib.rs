#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Bearer-token authentication for the AQI tracker API.
//!
//! Issues and validates short-lived HS256 JWTs for the single
//! configured user. This is deliberately minimal — the tracker has one
//! operator account and no user management; the token exists so the
//! public endpoints can't be scraped anonymously.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How long an issued token stays valid.
pub const TOKEN_LIFETIME_HOURS: i64 = 1;

/// Claims carried by an issued token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// The authenticated username.
    pub sub: String,
    /// Expiry as a Unix timestamp (seconds).
    pub exp: i64,
}

/// Errors from token operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No `Authorization: Bearer ...` header was supplied.
    #[error("Missing bearer token")]
    MissingToken,

    /// The token failed validation (bad signature, expired, garbled).
    #[error("Invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
}

/// Issues a token for `username`, valid for [`TOKEN_LIFETIME_HOURS`].
///
/// # Errors
///
/// Returns [`AuthError`] if encoding fails.
pub fn issue_token(username: &str, secret: &str) -> Result<String, AuthError> {
    let claims = Claims {
        sub: username.to_string(),
        exp: (Utc::now() + Duration::hours(TOKEN_LIFETIME_HOURS)).timestamp(),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}

/// Validates a token and returns its claims.
///
/// # Errors
///
/// Returns [`AuthError::InvalidToken`] for bad signatures, expired
/// tokens, or malformed input.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )?;
    Ok(data.claims)
}

/// Extracts the token from an `Authorization` header value.
///
/// # Errors
///
/// Returns [`AuthError::MissingToken`] when the header is absent or is
/// not a `Bearer` scheme.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    header
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingToken)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn issued_token_round_trips() {
        let token = issue_token("admin", SECRET).unwrap();
        let claims = verify_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, "admin");
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = issue_token("admin", SECRET).unwrap();
        assert!(matches!(
            verify_token(&token, "other-secret"),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let claims = Claims {
            sub: "admin".to_string(),
            exp: (Utc::now() - Duration::hours(2)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        assert!(verify_token(&token, SECRET).is_err());
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(verify_token("not-a-jwt", SECRET).is_err());
    }

    #[test]
    fn bearer_token_extracts_value() {
        assert_eq!(bearer_token(Some("Bearer abc.def.ghi")).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn bearer_token_rejects_missing_or_malformed_headers() {
        assert!(matches!(bearer_token(None), Err(AuthError::MissingToken)));
        assert!(matches!(
            bearer_token(Some("Basic dXNlcg==")),
            Err(AuthError::MissingToken)
        ));
        assert!(matches!(
            bearer_token(Some("Bearer ")),
            Err(AuthError::MissingToken)
        ));
    }
}
