//! JWT (JSON Web Token) handling for user sessions

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How long a session token stays valid after login, in hours
pub const TOKEN_VALIDITY_HOURS: i64 = 24;

/// How long a session token stays valid after login
pub fn token_validity() -> Duration {
    Duration::hours(TOKEN_VALIDITY_HOURS)
}

/// Issuer written into every token this service mints
pub const TOKEN_ISSUER: &str = "mailflow";

/// JWT claims for an authenticated session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JwtClaims {
    /// Subject (user UUID)
    pub sub: String,
    /// User email
    pub email: String,
    /// User role (admin, manager, user)
    pub role: String,
    /// Name shown in clients
    pub display_name: String,
    /// Issued at (timestamp)
    pub iat: i64,
    /// Expiration time (timestamp)
    pub exp: i64,
    /// Issuer
    pub iss: String,
}

impl JwtClaims {
    /// Build session claims for a user, valid for `validity` from now.
    pub fn new(
        user_id: String,
        email: String,
        role: String,
        display_name: String,
        validity: Duration,
    ) -> Self {
        let now = Utc::now();
        let exp = now + validity;

        Self {
            sub: user_id,
            email,
            role,
            display_name,
            iat: now.timestamp(),
            exp: exp.timestamp(),
            iss: TOKEN_ISSUER.to_string(),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// JWT errors
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT encoding error: {0}")]
    EncodingError(#[from] jsonwebtoken::errors::Error),

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,
}

/// JWT validator using HMAC-SHA256 (symmetric secret)
///
/// Validates the signature and the expiration claim; issuer and audience
/// are not checked (tokens are minted and consumed by the same service).
pub struct JwtValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtValidator {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_aud = false;
        validation.validate_nbf = false;

        Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn validate(&self, token: &str) -> Result<JwtClaims, JwtError> {
        let token_data = decode::<JwtClaims>(token, &self.decoding_key, &self.validation)?;

        if token_data.claims.is_expired() {
            return Err(JwtError::TokenExpired);
        }

        Ok(token_data.claims)
    }

    /// Encode claims into a signed token using HMAC-SHA256.
    pub fn encode(secret: &[u8], claims: &JwtClaims) -> Result<String, JwtError> {
        let header = Header::new(Algorithm::HS256);
        let encoding_key = EncodingKey::from_secret(secret);

        Ok(encode(&header, claims, &encoding_key)?)
    }
}
