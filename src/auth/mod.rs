use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub email: String,
    pub user_id: Uuid,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(email: String, user_id: Uuid) -> Self {
        let now = Utc::now();
        let expiry_hours = config::config().security.jwt_expiry_hours;
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            email,
            user_id,
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug)]
pub enum JwtError {
    TokenGeneration(String),
    InvalidSecret,
}

impl std::fmt::Display for JwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JwtError::TokenGeneration(msg) => write!(f, "JWT generation error: {}", msg),
            JwtError::InvalidSecret => write!(f, "Invalid JWT secret"),
        }
    }
}

impl std::error::Error for JwtError {}

pub fn generate_jwt(claims: &Claims) -> Result<String, JwtError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let header = Header::default();

    encode(&header, claims, &encoding_key).map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

/// Admin authority comes from allow-list membership alone. A valid session
/// token without a listed email is authenticated but not an administrator.
pub fn is_admin_email(email: &str, allow_list: &[String]) -> bool {
    let email = email.to_lowercase();
    allow_list.iter().any(|allowed| allowed.to_lowercase() == email)
}

/// Allow-list check against the configured admin emails.
pub fn is_admin(email: &str) -> bool {
    is_admin_email(email, &config::config().security.admin_emails)
}

/// Hex-encoded SHA-256 digest, as stored in admin_users.password_sha256.
pub fn sha256_hex(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_check_is_case_insensitive() {
        let allow = vec!["admin@example.com".to_string()];
        assert!(is_admin_email("Admin@Example.COM", &allow));
        assert!(is_admin_email("admin@example.com", &allow));
        assert!(!is_admin_email("visitor@example.com", &allow));
    }

    #[test]
    fn empty_allow_list_rejects_everyone() {
        assert!(!is_admin_email("admin@example.com", &[]));
    }

    #[test]
    fn sha256_hex_known_vector() {
        // echo -n "password" | sha256sum
        assert_eq!(
            sha256_hex("password"),
            "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8"
        );
    }
}
