//! Fixed credential list
//!
//! Report users are not stored in MongoDB. The deployment ships a JSON file
//! of `{username, passwordHash, role}` entries with Argon2 hashes, loaded once
//! at startup.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

use crate::auth::{verify_password, HashScheme, Role};
use crate::types::{ReportError, Result};

/// One entry of the credential list
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub username: String,
    pub password_hash: String,
    #[serde(default)]
    pub role: Role,
}

/// Username → credential lookup
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    users: HashMap<String, Credential>,
}

impl CredentialStore {
    pub fn new(credentials: Vec<Credential>) -> Self {
        let store = Self {
            users: credentials
                .into_iter()
                .map(|c| (c.username.clone(), c))
                .collect(),
        };
        for (username, scheme) in store.unusable_entries() {
            warn!(
                "Credential '{}' has a {:?} password hash and cannot log in; \
                 re-hash it with teacher-report-hash-password",
                username, scheme
            );
        }
        store
    }

    /// Entries whose hash is not Argon2, sorted by username
    pub fn unusable_entries(&self) -> Vec<(&str, HashScheme)> {
        let mut entries: Vec<(&str, HashScheme)> = self
            .users
            .values()
            .map(|c| (c.username.as_str(), HashScheme::detect(&c.password_hash)))
            .filter(|(_, scheme)| !scheme.is_supported())
            .collect();
        entries.sort_unstable();
        entries
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let credentials: Vec<Credential> = serde_json::from_str(json)
            .map_err(|e| ReportError::Config(format!("Invalid credential list: {}", e)))?;
        Ok(Self::new(credentials))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            ReportError::Config(format!("Cannot read credential list {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    /// Check a username/password pair and return the user's role.
    ///
    /// Unknown users and wrong passwords produce the same error.
    pub fn verify(&self, username: &str, password: &str) -> Result<Role> {
        let Some(credential) = self.users.get(username) else {
            return Err(ReportError::InvalidCredentials);
        };

        match verify_password(password, &credential.password_hash) {
            Ok(true) => Ok(credential.role),
            Ok(false) => Err(ReportError::InvalidCredentials),
            Err(e) => {
                warn!("Unusable password hash for '{}': {}", username, e);
                Err(ReportError::InvalidCredentials)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
