//! Credential list password hashes
//!
//! New entries are Argon2id PHC strings. bcrypt entries (`$2a$`, `$2b$`,
//! `$2y$`) carried over from older user lists are recognised so they can be
//! reported at startup, but they never authenticate: re-hash those passwords
//! with `teacher-report-hash-password`.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::types::ReportError;

/// Format of a stored hash, read from its `$<id>$` prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HashScheme {
    Argon2,
    Bcrypt,
    Unknown,
}

impl HashScheme {
    pub fn detect(hash: &str) -> Self {
        let Some(rest) = hash.trim().strip_prefix('$') else {
            return Self::Unknown;
        };
        match rest.split('$').next() {
            Some(id) if id.starts_with("argon2") => Self::Argon2,
            Some("2a" | "2b" | "2x" | "2y") => Self::Bcrypt,
            _ => Self::Unknown,
        }
    }

    pub fn is_supported(self) -> bool {
        self == Self::Argon2
    }
}

/// Hash `password` into an Argon2id PHC string with a fresh salt
pub fn hash_password(password: &str) -> Result<String, ReportError> {
    let salt = SaltString::generate(&mut OsRng);
    let phc = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ReportError::Internal(format!("Failed to hash password: {e}")))?;
    Ok(phc.to_string())
}

/// Check `password` against a stored hash.
///
/// `Ok(false)` is a wrong password. An error means the stored hash itself
/// cannot be used.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, ReportError> {
    match HashScheme::detect(hash) {
        HashScheme::Argon2 => {
            let phc = PasswordHash::new(hash.trim())
                .map_err(|e| ReportError::Config(format!("Malformed Argon2 hash: {e}")))?;
            Ok(Argon2::default()
                .verify_password(password.as_bytes(), &phc)
                .is_ok())
        }
        HashScheme::Bcrypt => Err(ReportError::Config(
            "bcrypt hash; re-hash the password with teacher-report-hash-password".into(),
        )),
        HashScheme::Unknown => Err(ReportError::Config("Unrecognized password hash".into())),
    }
}
