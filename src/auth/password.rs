use bcrypt::{hash, verify};

use super::AuthError;

/// Hash a plaintext password with a fresh per-hash salt. The plaintext is
/// never stored anywhere.
pub fn hash_password(password: &str, cost: u32) -> Result<String, AuthError> {
    hash(password, cost).map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Constant-behavior check of a plaintext against a stored hash. A malformed
/// stored hash counts as a mismatch rather than an error the caller could
/// leak.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    verify(password, stored_hash).unwrap_or(false)
}
