//! Password and reset-token hashing

use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::features::users::UserError;

pub const MIN_PASSWORD_CHARS: usize = 8;

/// Reset tokens stay valid for one hour
pub const RESET_TOKEN_TTL_MINUTES: i64 = 60;

/// 64 hex characters of randomness from two v4 UUIDs
pub fn generate_reset_token() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

/// Only the SHA-256 of a reset token is stored
pub fn hash_reset_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Runs on the blocking pool
pub async fn hash_password(password: String) -> Result<String, UserError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| UserError::PasswordHash(e.to_string()))?
        .map_err(|e| UserError::PasswordHash(e.to_string()))
}
