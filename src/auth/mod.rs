pub mod password;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AuthConfig;
use crate::model::User;

/// Claims carried in every issued token. Issuer and audience are bound at
/// issuance and checked exactly at verification.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Opaque user id the token resolves to.
    pub sub: String,
    pub username: String,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn for_user(user: &User, config: &AuthConfig) -> Self {
        let now = Utc::now();
        Self {
            sub: user.id.clone(),
            username: user.username.clone(),
            iss: config.jwt_issuer.clone(),
            aud: config.jwt_audience.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(config.jwt_expiry_hours)).timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token generation failed: {0}")]
    TokenGeneration(String),
    #[error("invalid token: {0}")]
    InvalidToken(String),
    #[error("password hashing failed: {0}")]
    Hashing(String),
}

/// Sign a token for the given user (HS256).
pub fn generate_jwt(user: &User, config: &AuthConfig) -> Result<String, AuthError> {
    let claims = Claims::for_user(user, config);
    let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());

    encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| AuthError::TokenGeneration(e.to_string()))
}

/// Verify signature, expiry, issuer, and audience; any failure means the
/// caller is unauthenticated.
pub fn validate_jwt(token: &str, config: &AuthConfig) -> Result<Claims, AuthError> {
    let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

    let mut validation = Validation::default();
    validation.set_issuer(&[&config.jwt_issuer]);
    validation.set_audience(&[&config.jwt_audience]);

    decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| AuthError::InvalidToken(e.to_string()))
}
