use actix_web::http::header;
use actix_web::HttpRequest;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AuthSettings;

/// Errors that can occur during authentication
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing or malformed Authorization header")]
    MissingToken,

    #[error("Invalid token: {0}")]
    TokenError(#[from] jsonwebtoken::errors::Error),

    #[error("Wrong token kind for this endpoint")]
    WrongTokenKind,

    #[error("Password hashing failed: {0}")]
    HashError(#[from] bcrypt::BcryptError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT claims carried by issued tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: i64,
    pub iat: i64,
    pub exp: i64,
    pub kind: TokenKind,
}

/// Token issuing and verification plus password hashing
///
/// HS256 tokens with a configurable TTL per kind. There is no token
/// blocklist; access tokens stay valid until expiry.
pub struct Authenticator {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl_secs: u64,
    refresh_ttl_secs: u64,
    bcrypt_cost: u32,
}

impl Authenticator {
    pub fn new(settings: &AuthSettings) -> Self {
        Self {
            encoding: EncodingKey::from_secret(settings.jwt_secret.as_bytes()),
            decoding: DecodingKey::from_secret(settings.jwt_secret.as_bytes()),
            access_ttl_secs: settings.access_ttl_secs,
            refresh_ttl_secs: settings.refresh_ttl_secs,
            bcrypt_cost: settings.bcrypt_cost,
        }
    }

    pub fn issue_access_token(&self, user_id: i64) -> Result<String, AuthError> {
        self.issue(user_id, TokenKind::Access, self.access_ttl_secs)
    }

    pub fn issue_refresh_token(&self, user_id: i64) -> Result<String, AuthError> {
        self.issue(user_id, TokenKind::Refresh, self.refresh_ttl_secs)
    }

    fn issue(&self, user_id: i64, kind: TokenKind, ttl_secs: u64) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id,
            iat: now,
            exp: now + ttl_secs as i64,
            kind,
        };

        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// Verify a token and check it is of the expected kind
    pub fn verify(&self, token: &str, expected: TokenKind) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())?;

        if data.claims.kind != expected {
            return Err(AuthError::WrongTokenKind);
        }

        Ok(data.claims)
    }

    /// Extract and verify the bearer access token from a request
    ///
    /// Returns the authenticated user id.
    pub fn authenticate(&self, req: &HttpRequest) -> Result<i64, AuthError> {
        let token = bearer_token(req).ok_or(AuthError::MissingToken)?;
        let claims = self.verify(token, TokenKind::Access)?;
        Ok(claims.sub)
    }

    /// Extract and verify a bearer refresh token from a request
    pub fn authenticate_refresh(&self, req: &HttpRequest) -> Result<i64, AuthError> {
        let token = bearer_token(req).ok_or(AuthError::MissingToken)?;
        let claims = self.verify(token, TokenKind::Refresh)?;
        Ok(claims.sub)
    }

    pub fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        Ok(bcrypt::hash(password, self.bcrypt_cost)?)
    }

    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        Ok(bcrypt::verify(password, hash)?)
    }
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
