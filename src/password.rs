use argon2::{password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rand::rngs::OsRng;

use crate::errors::AppError;

/// Outcome of checking a password against whatever is stored for the user.
///
/// Early seed data stored passwords in the clear. A stored value that does not
/// parse as a PHC hash is treated as such a legacy value: if it matches the
/// presented password, the login succeeds and the caller must persist the
/// freshly produced argon2 hash.
#[derive(Debug)]
pub enum VerifyOutcome {
    Verified,
    VerifiedAndUpgraded { new_hash: String },
    Rejected,
}

pub fn hash_password(plain: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("argon2 hash: {e}")))?
        .to_string();
    Ok(hash)
}

pub fn verify_password(plain: &str, stored: &str) -> Result<VerifyOutcome, AppError> {
    match PasswordHash::new(stored) {
        Ok(parsed) => {
            if Argon2::default()
                .verify_password(plain.as_bytes(), &parsed)
                .is_ok()
            {
                Ok(VerifyOutcome::Verified)
            } else {
                Ok(VerifyOutcome::Rejected)
            }
        }
        // not a PHC string: legacy plaintext seed value
        Err(_) => {
            if plain == stored {
                let new_hash = hash_password(plain)?;
                Ok(VerifyOutcome::VerifiedAndUpgraded { new_hash })
            } else {
                Ok(VerifyOutcome::Rejected)
            }
        }
    }
}
