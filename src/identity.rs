//! Account credential handling: password policy and hashing.
//!
//! Kept in one module so a stronger KDF can be swapped in without touching
//! seeding or the login handler. Hashes are stored as `salt$hex(sha256)`.

use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Error)]
pub enum IdentityError {
    /// The password failed one or more policy rules. Every failed rule is
    /// listed so the operator can fix the credential in one pass.
    #[error("password rejected by policy: {}", .0.join("; "))]
    PolicyViolation(Vec<String>),
}

/// Validate a password against the account policy: minimum length, at
/// least one digit, one lowercase, one uppercase, one non-alphanumeric.
pub fn check_password_policy(password: &str) -> Result<(), IdentityError> {
    let mut violations = Vec::new();

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        violations.push(format!("must be at least {MIN_PASSWORD_LENGTH} characters"));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        violations.push("must contain a digit".to_string());
    }
    if !password.chars().any(|c| c.is_lowercase()) {
        violations.push("must contain a lowercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_uppercase()) {
        violations.push("must contain an uppercase letter".to_string());
    }
    if password.chars().all(|c| c.is_alphanumeric()) {
        violations.push("must contain a non-alphanumeric character".to_string());
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(IdentityError::PolicyViolation(violations))
    }
}

/// Check the policy, then hash with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, IdentityError> {
    check_password_policy(password)?;
    let salt = Uuid::new_v4().simple().to_string();
    Ok(format!("{salt}${}", digest(&salt, password)))
}

/// Verify a candidate password against a stored `salt$hash` value.
/// Malformed stored values verify as false.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt, expected)) = stored.split_once('$') else {
        return false;
    };
    digest(salt, password) == expected
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}
