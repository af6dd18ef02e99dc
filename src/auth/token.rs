use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SecurityConfig;
use crate::types::UserId;

/// Which half of a token pair a token is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Profile data copied into every token so clients don't need a lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileClaims {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// JWT Claims structure for authentication tokens
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    #[serde(flatten)]
    pub profile: ProfileClaims,
    pub typ: TokenKind,
    /// Token issued at timestamp
    pub iat: i64,
    /// Token expiration timestamp
    pub exp: i64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("JWT secret is not configured")]
    InvalidSecret,

    #[error("Token lifetime out of range: {0}")]
    InvalidLifetime(&'static str),

    #[error("JWT generation error: {0}")]
    Signing(String),

    #[error("Malformed token: {0}")]
    Malformed(String),

    #[error("Token signature does not match")]
    BadSignature,

    #[error("Token has expired")]
    Expired,

    #[error("Token is not of the expected kind")]
    WrongKind,
}

/// Access and refresh tokens handed out together at login.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
    /// Lifetime of the access token in seconds.
    pub expires_in: i64,
}

/// Identity recovered from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub subject: UserId,
    pub profile: ProfileClaims,
    pub kind: TokenKind,
    pub expires_at: i64,
}

/// Issues and verifies HS256-signed identity tokens.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenCodec {
    pub fn new(secret: &str, access_ttl: Duration, refresh_ttl: Duration) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::InvalidSecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is exact; tokens are only ever checked by the process that signed them
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            access_ttl,
            refresh_ttl,
        })
    }

    pub fn from_config(security: &SecurityConfig) -> Result<Self, TokenError> {
        let access_ttl = Duration::try_minutes(security.access_token_ttl_minutes)
            .ok_or(TokenError::InvalidLifetime("access"))?;
        let refresh_ttl = Duration::try_hours(security.refresh_token_ttl_hours)
            .ok_or(TokenError::InvalidLifetime("refresh"))?;
        Self::new(&security.jwt_secret, access_ttl, refresh_ttl)
    }

    /// Issue an access/refresh pair for `subject`.
    pub fn issue(&self, subject: UserId, profile: &ProfileClaims) -> Result<TokenPair, TokenError> {
        let now = Utc::now();
        Ok(TokenPair {
            access: self.sign(subject, profile, TokenKind::Access, now)?,
            refresh: self.sign(subject, profile, TokenKind::Refresh, now)?,
            expires_in: self.access_ttl.num_seconds(),
        })
    }

    /// Check signature, expiry and kind, and return the identity the token asserts.
    pub fn verify(&self, token: &str, expected: TokenKind) -> Result<VerifiedToken, TokenError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::BadSignature,
                _ => TokenError::Malformed(e.to_string()),
            })?;

        let claims = token_data.claims;
        if claims.typ != expected {
            return Err(TokenError::WrongKind);
        }

        let subject = claims
            .sub
            .parse::<UserId>()
            .map_err(|_| TokenError::Malformed(format!("subject '{}' is not a user id", claims.sub)))?;

        Ok(VerifiedToken {
            subject,
            profile: claims.profile,
            kind: claims.typ,
            expires_at: claims.exp,
        })
    }

    fn sign(
        &self,
        subject: UserId,
        profile: &ProfileClaims,
        kind: TokenKind,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| TokenError::Signing(format!("{:?} token expiry overflows", kind)))?;
        let claims = Claims {
            sub: subject.to_string(),
            profile: profile.clone(),
            typ: kind,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }
}
