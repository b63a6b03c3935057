use actix_web::dev::Payload;
use actix_web::http::{header, StatusCode};
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};
use thiserror::Error;

use crate::models::ErrorResponse;

/// Errors that can occur while hashing passwords or handling tokens
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Password hashing failed: {0}")]
    HashError(#[from] bcrypt::BcryptError),

    #[error("Token error: {0}")]
    TokenError(#[from] jsonwebtoken::errors::Error),
}

/// JWT claims carried by every issued token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User document id
    pub sub: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies bearer tokens, hashes passwords
///
/// Stateless: a token is valid until its expiry, there is no revocation
/// list. Logout is a client-side concern.
pub struct AuthManager {
    encoding: EncodingKey,
    decoding: DecodingKey,
    token_ttl: Duration,
    bcrypt_cost: u32,
}

impl AuthManager {
    pub fn new(secret: &str, token_ttl_hours: i64, bcrypt_cost: u32) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            token_ttl: Duration::hours(token_ttl_hours),
            bcrypt_cost,
        }
    }

    pub fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        Ok(bcrypt::hash(password, self.bcrypt_cost)?)
    }

    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        Ok(bcrypt::verify(password, hash)?)
    }

    /// Issue a signed token for a user
    pub fn issue_token(&self, user_id: &str, email: &str) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + self.token_ttl).timestamp(),
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    /// Decode and validate a token, returning its claims
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))?;
        Ok(data.claims)
    }
}

/// Rejection produced when bearer extraction fails
#[derive(Debug, Error)]
pub enum AuthRejection {
    #[error("Access denied. No token provided.")]
    MissingToken,

    #[error("Invalid or expired token.")]
    InvalidToken,
}

impl ResponseError for AuthRejection {
    fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse::new(self.to_string()))
    }
}

/// Identity of the caller, extracted from the Authorization header
///
/// Handlers that take this parameter require a valid bearer token; the
/// extractor rejects with a 401 envelope otherwise. Only the token is
/// inspected here, profile loads stay in the handlers that need them.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub email: String,
}

impl FromRequest for AuthenticatedUser {
    type Error = AuthRejection;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract_identity(req))
    }
}

fn extract_identity(req: &HttpRequest) -> Result<AuthenticatedUser, AuthRejection> {
    let auth = match req.app_data::<actix_web::web::Data<AuthManager>>() {
        Some(auth) => auth,
        None => {
            tracing::error!("AuthManager is not registered in app data");
            return Err(AuthRejection::InvalidToken);
        }
    };

    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AuthRejection::MissingToken)?;

    let token = header_value
        .strip_prefix("Bearer ")
        .unwrap_or(header_value)
        .trim();
    if token.is_empty() {
        return Err(AuthRejection::MissingToken);
    }

    let claims = auth.verify_token(token).map_err(|err| {
        tracing::debug!("Token verification failed: {}", err);
        AuthRejection::InvalidToken
    })?;

    Ok(AuthenticatedUser {
        user_id: claims.sub,
        email: claims.email,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> AuthManager {
        // Cost 4 is the bcrypt minimum, fast enough for tests
        AuthManager::new("test-secret", 168, 4)
    }

    #[test]
    fn token_round_trip_preserves_identity() {
        let auth = manager();
        let token = auth.issue_token("user-1", "dev@example.com").unwrap();
        let claims = auth.verify_token(&token).unwrap();

        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email, "dev@example.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let auth = manager();
        let other = AuthManager::new("other-secret", 168, 4);
        let token = other.issue_token("user-1", "dev@example.com").unwrap();

        assert!(auth.verify_token(&token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        // Negative TTL backdates the expiry
        let auth = AuthManager::new("test-secret", -1, 4);
        let token = auth.issue_token("user-1", "dev@example.com").unwrap();

        assert!(auth.verify_token(&token).is_err());
    }

    #[test]
    fn password_hash_verifies_and_rejects() {
        let auth = manager();
        let hash = auth.hash_password("hunter22").unwrap();

        assert_ne!(hash, "hunter22");
        assert!(auth.verify_password("hunter22", &hash).unwrap());
        assert!(!auth.verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn rejection_messages_are_stable() {
        assert_eq!(
            AuthRejection::MissingToken.to_string(),
            "Access denied. No token provided."
        );
        assert_eq!(
            AuthRejection::InvalidToken.to_string(),
            "Invalid or expired token."
        );
    }
}
