//! Signed bearer token issuance and verification
//! Tokens are compact HS256 JWTs carrying the subject and its validity window

use crate::{
    config::{AppConfig, MIN_SECRET_LEN},
    error::AppError,
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default token lifetime: 24 hours
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 86_400;

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user email)
    pub sub: String,

    /// Issued at
    pub iat: i64,

    /// Expiration
    pub exp: i64,
}

/// Reasons a token fails verification
///
/// These stay internal: the authentication gate logs them and then treats
/// the request as anonymous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,
}

impl TokenError {
    /// Stable label for logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            TokenError::Malformed => "malformed",
            TokenError::InvalidSignature => "invalid_signature",
            TokenError::Expired => "expired",
        }
    }
}

/// Symmetric key material used to sign and verify tokens
#[derive(Clone)]
pub struct SigningKey {
    secret: Secret<String>,
}

impl SigningKey {
    /// Wrap a secret, rejecting anything shorter than 32 bytes
    pub fn new(secret: Secret<String>) -> Result<Self, AppError> {
        if secret.expose_secret().len() < MIN_SECRET_LEN {
            return Err(AppError::Config(format!(
                "JWT secret too short (min {} chars)",
                MIN_SECRET_LEN
            )));
        }

        Ok(Self { secret })
    }

    fn as_bytes(&self) -> &[u8] {
        self.secret.expose_secret().as_bytes()
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningKey([REDACTED])")
    }
}

/// Token codec
///
/// Holds only immutable key material, so a single instance is shared by all
/// requests behind an `Arc`.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenCodec {
    /// Create a codec from an explicit key and token lifetime
    pub fn new(key: &SigningKey, ttl: Duration) -> Result<Self, AppError> {
        // Claims carry whole seconds; anything shorter would give exp == iat
        if ttl < Duration::seconds(1) {
            return Err(AppError::Config("Token TTL must be at least one second".to_string()));
        }

        // Expiry is checked against the caller-supplied clock in `verify`
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(key.as_bytes()),
            decoding_key: DecodingKey::from_secret(key.as_bytes()),
            validation,
            ttl,
        })
    }

    /// Create codec from config
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let key = SigningKey::new(config.security.jwt_secret.clone())?;
        let ttl_secs = i64::try_from(config.security.token_ttl_secs)
            .map_err(|_| AppError::Config("Token TTL out of range".to_string()))?;

        Self::new(&key, Duration::seconds(ttl_secs))
    }

    /// Token lifetime
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `identity`, valid from `now` until `now + ttl`
    ///
    /// # Panics
    ///
    /// Panics if `identity` is empty. Callers only issue tokens for records
    /// they have already looked up, so an empty subject is a bug.
    pub fn issue(&self, identity: &str, now: DateTime<Utc>) -> Result<String, AppError> {
        assert!(!identity.is_empty(), "cannot issue a token for an empty identity");

        let expiration = now.checked_add_signed(self.ttl).ok_or_else(|| {
            tracing::error!(ttl_secs = self.ttl.num_seconds(), "Token expiry out of range");
            AppError::Internal("Token expiry out of range".to_string())
        })?;

        let claims = Claims {
            sub: identity.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode token: {:?}", e);
            AppError::Internal(format!("Failed to encode token: {}", e))
        })
    }

    /// Verify a token at time `now` and return its subject
    ///
    /// The signature is recomputed on every call; the comparison is
    /// constant-time.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            })?
            .claims;

        if claims.sub.is_empty() || claims.exp <= claims.iat {
            return Err(TokenError::Malformed);
        }

        if now.timestamp() > claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(claims.sub)
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("ttl_secs", &self.ttl.num_seconds())
            .finish_non_exhaustive()
    }
}
