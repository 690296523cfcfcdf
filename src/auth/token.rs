// JWT token generation and validation service

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::auth::error::AuthError;
use crate::config::JwtConfig;

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // stringified user id
    pub exp: i64,    // expiration timestamp
    pub iat: i64,    // issued at timestamp
}

/// Token service for JWT operations
///
/// Access and refresh tokens are produced by the same signing path and
/// differ only in lifetime.
#[derive(Clone)]
pub struct TokenService {
    header: Header,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_token_ttl: Duration,
    refresh_token_ttl: Duration,
}

impl TokenService {
    /// Build a TokenService from the signing configuration
    pub fn new(config: &JwtConfig) -> Self {
        Self::with_ttls(
            &config.secret,
            config.algorithm,
            Duration::minutes(config.access_token_minutes),
            Duration::days(config.refresh_token_days),
        )
    }

    pub fn with_ttls(
        secret: &str,
        algorithm: Algorithm,
        access_token_ttl: Duration,
        refresh_token_ttl: Duration,
    ) -> Self {
        let mut validation = Validation::new(algorithm);
        validation.leeway = 0;

        Self {
            header: Header::new(algorithm),
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            access_token_ttl,
            refresh_token_ttl,
        }
    }

    /// Sign a token for `subject` that expires `ttl` from now
    pub fn issue(&self, subject: i32, ttl: Duration) -> Result<String, AuthError> {
        let now = Utc::now();
        let expires_at = now.checked_add_signed(ttl).ok_or_else(|| {
            AuthError::TokenGenerationError("token lifetime out of range".to_string())
        })?;
        let claims = Claims {
            sub: subject.to_string(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        encode(&self.header, &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenGenerationError(e.to_string()))
    }

    /// Generate a short-lived access token
    pub fn issue_access_token(&self, subject: i32) -> Result<String, AuthError> {
        self.issue(subject, self.access_token_ttl)
    }

    /// Generate a 7-day refresh token
    pub fn issue_refresh_token(&self, subject: i32) -> Result<String, AuthError> {
        self.issue(subject, self.refresh_token_ttl)
    }

    /// Generate both access and refresh tokens
    pub fn issue_token_pair(&self, subject: i32) -> Result<(String, String), AuthError> {
        let access_token = self.issue_access_token(subject)?;
        let refresh_token = self.issue_refresh_token(subject)?;
        Ok((access_token, refresh_token))
    }

    /// Verify signature and expiry and return the claim set
    pub fn decode_claims(&self, token: &str) -> Result<Claims, AuthError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
                _ => AuthError::InvalidToken,
            })?;

        // The library only rejects exp strictly in the past; a token
        // expiring this very second is already unusable.
        if claims.exp <= Utc::now().timestamp() {
            return Err(AuthError::ExpiredToken);
        }

        Ok(claims)
    }

    /// Verify a token and return the user id it was issued for
    pub fn validate(&self, token: &str) -> Result<i32, AuthError> {
        let claims = self.decode_claims(token)?;
        claims
            .sub
            .parse::<i32>()
            .map_err(|_| AuthError::InvalidToken)
    }
}
