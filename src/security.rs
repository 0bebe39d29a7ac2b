//! Password hashing and bearer-token issuance/validation.
//!
//! Both halves are stateless: passwords are hashed with argon2 and a fresh
//! random salt, tokens are HS256 JWTs carrying the username as subject.
//! There is no server-side session table and no revocation.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenClaim {
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
}

#[derive(Debug, PartialEq, Eq)]
pub enum TokenError {
    /// Bad signature or malformed payload.
    Invalid,
    /// Signature fine, expiry in the past.
    Expired,
}

impl TokenError {
    pub fn message(&self) -> &'static str {
        match self {
            TokenError::Invalid => "Could not validate credentials",
            TokenError::Expired => "Token has expired",
        }
    }
}

/// Hash a plaintext password with a freshly generated salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// Verify a plaintext password against a stored hash.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Issue a signed token for `username`, valid for `ttl_minutes` from now.
pub fn issue_token(
    username: &str,
    secret: &str,
    ttl_minutes: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = TokenClaim {
        sub: username.to_string(),
        iat: now.timestamp() as usize,
        exp: (now + Duration::minutes(ttl_minutes)).timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
}

/// Validate a token and return its subject (username).
pub fn validate_token(token: &str, secret: &str) -> Result<String, TokenError> {
    let data = decode::<TokenClaim>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid,
    })?;
    Ok(data.claims.sub)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn hash_then_verify_roundtrip() {
        let hash = hash_password("hunter2").unwrap();
        assert_ne!(hash, "hunter2");
        assert!(verify_password("hunter2", &hash));
        assert!(!verify_password("hunter3", &hash));
    }

    #[test]
    fn verify_rejects_garbage_hash() {
        assert!(!verify_password("hunter2", "not-a-phc-string"));
    }

    #[test]
    fn two_hashes_of_same_password_differ() {
        // Salts are random, so equal inputs must not produce equal hashes.
        let a = hash_password("pw").unwrap();
        let b = hash_password("pw").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn issued_token_validates_to_subject() {
        let token = issue_token("alice", SECRET, 30).unwrap();
        assert_eq!(validate_token(&token, SECRET), Ok("alice".to_string()));
    }

    #[test]
    fn expired_token_is_rejected_as_expired() {
        // jsonwebtoken applies a 60s default leeway, so back-date well past it.
        let token = issue_token("alice", SECRET, -5).unwrap();
        assert_eq!(validate_token(&token, SECRET), Err(TokenError::Expired));
    }

    #[test]
    fn wrong_secret_is_invalid_not_expired() {
        let token = issue_token("alice", SECRET, 30).unwrap();
        assert_eq!(
            validate_token(&token, "other-secret"),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn malformed_token_is_invalid() {
        assert_eq!(
            validate_token("definitely.not.a-jwt", SECRET),
            Err(TokenError::Invalid)
        );
    }
}
