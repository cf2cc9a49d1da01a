//! Concrete principal record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vigil_core::Authenticatable;

/// An account row as the store persists it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    /// Sign-in identifier (username or email).
    pub identifier: String,
    /// 16-byte salt followed by the derived subkey.
    pub password_digest: Vec<u8>,
    pub security_stamp: Option<String>,
    pub last_sign_in: Option<DateTime<Utc>>,
    pub access_failed_count: u32,
    pub access_lockout_end: Option<DateTime<Utc>>,
    pub mfa_enabled: bool,
}

impl Account {
    /// Fresh account with a random id and security stamp, no recorded
    /// failures, and no lockout.
    pub fn new(identifier: impl Into<String>, password_digest: Vec<u8>, mfa_enabled: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            identifier: identifier.into(),
            password_digest,
            security_stamp: Some(new_security_stamp()),
            last_sign_in: None,
            access_failed_count: 0,
            access_lockout_end: None,
            mfa_enabled,
        }
    }
}

/// Random opaque security stamp (16 bytes, hex-encoded). Assign a new
/// one whenever credentials or other security-relevant attributes
/// change; every outstanding session is revoked on its next request.
pub fn new_security_stamp() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 16] = rand::Rng::random(&mut rng);
    hex::encode(bytes)
}

impl Authenticatable for Account {
    fn id(&self) -> Uuid {
        self.id
    }

    fn password_digest(&self) -> &[u8] {
        &self.password_digest
    }

    fn security_stamp(&self) -> Option<&str> {
        self.security_stamp.as_deref()
    }

    fn access_failed_count(&self) -> u32 {
        self.access_failed_count
    }

    fn access_lockout_end(&self) -> Option<DateTime<Utc>> {
        self.access_lockout_end
    }

    fn mfa_enabled(&self) -> bool {
        self.mfa_enabled
    }

    fn last_sign_in(&self) -> Option<DateTime<Utc>> {
        self.last_sign_in
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_account_starts_clean() {
        let account = Account::new("alice", vec![0u8; 48], false);
        assert_eq!(account.access_failed_count, 0);
        assert!(account.access_lockout_end.is_none());
        assert!(account.last_sign_in.is_none());
        assert!(account.security_stamp.is_some());
    }

    #[test]
    fn stamps_are_unique() {
        assert_ne!(new_security_stamp(), new_security_stamp());
    }
}
