//! Short-lived store for pending MFA challenges.
//!
//! After a correct password on an MFA-enabled account, the principal
//! snapshot waits here under an opaque challenge token until the
//! one-time code arrives. Cache keys are SHA-256 digests of the raw
//! token, so a dump of the cache never yields a token a caller could
//! replay.

use std::collections::HashMap;
use std::sync::Mutex;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

/// Snapshot held between the password step and the one-time-code step.
#[derive(Debug, Clone)]
pub struct PendingChallenge<P> {
    pub principal: P,
    /// Persistence flag captured at the password step; the session
    /// issued after the code is verified uses it.
    pub persistent: bool,
    pub expires_at: DateTime<Utc>,
}

/// Maps opaque challenge tokens to pending principal snapshots.
///
/// Entries expire at their deadline whether or not they are ever
/// consumed: expired entries are dropped on lookup and evicted on
/// insert. Insert, lookup, and removal are each atomic on the cache's
/// own lock; nothing else synchronizes on it.
pub struct ChallengeCache<P> {
    entries: Mutex<HashMap<String, PendingChallenge<P>>>,
}

/// Generate a cryptographically random opaque challenge token
/// (32 bytes, base64url without padding).
pub fn generate_token() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 32] = rand::Rng::random(&mut rng);
    URL_SAFE_NO_PAD.encode(bytes)
}

impl<P: Clone> ChallengeCache<P> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Store a pending challenge under `token`, evicting expired entries
    /// while the lock is held.
    pub fn insert(&self, token: &str, challenge: PendingChallenge<P>, now: DateTime<Utc>) {
        let mut entries = self.entries.lock().expect("challenge cache lock poisoned");
        entries.retain(|_, entry| entry.expires_at > now);
        entries.insert(cache_key(token), challenge);
    }

    /// Fetch the challenge for `token` if it has not expired. An expired
    /// entry is dropped on the way out.
    pub fn get(&self, token: &str, now: DateTime<Utc>) -> Option<PendingChallenge<P>> {
        let mut entries = self.entries.lock().expect("challenge cache lock poisoned");
        let key = cache_key(token);
        match entries.get(&key) {
            Some(entry) if entry.expires_at > now => Some(entry.clone()),
            Some(_) => {
                entries.remove(&key);
                None
            }
            None => None,
        }
    }

    /// Consume the challenge so the token cannot be replayed against a
    /// second session issuance.
    pub fn remove(&self, token: &str) {
        self.entries
            .lock()
            .expect("challenge cache lock poisoned")
            .remove(&cache_key(token));
    }
}

impl<P: Clone> Default for ChallengeCache<P> {
    fn default() -> Self {
        Self::new()
    }
}

fn cache_key(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn pending(expires_at: DateTime<Utc>) -> PendingChallenge<&'static str> {
        PendingChallenge {
            principal: "alice",
            persistent: true,
            expires_at,
        }
    }

    #[test]
    fn token_is_url_safe_and_unique() {
        let token = generate_token();
        assert_eq!(token.len(), 43);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_ne!(token, generate_token());
    }

    #[test]
    fn roundtrip() {
        let cache = ChallengeCache::new();
        cache.insert("tok", pending(now() + Duration::hours(1)), now());

        let entry = cache.get("tok", now()).unwrap();
        assert_eq!(entry.principal, "alice");
        assert!(entry.persistent);
    }

    #[test]
    fn unknown_token_misses() {
        let cache = ChallengeCache::<&str>::new();
        assert!(cache.get("nope", now()).is_none());
    }

    #[test]
    fn entry_expires_at_its_deadline() {
        let cache = ChallengeCache::new();
        let deadline = now() + Duration::hours(1);
        cache.insert("tok", pending(deadline), now());

        assert!(cache.get("tok", deadline - Duration::seconds(1)).is_some());
        assert!(cache.get("tok", deadline).is_none());
        // Dropped for good, even if time rolls back.
        assert!(cache.get("tok", now()).is_none());
    }

    #[test]
    fn insert_evicts_expired_entries() {
        let cache = ChallengeCache::new();
        cache.insert("stale", pending(now() + Duration::minutes(5)), now());

        let later = now() + Duration::hours(1);
        cache.insert("fresh", pending(later + Duration::hours(1)), later);

        assert!(cache.get("fresh", later).is_some());
        assert!(cache.get("stale", later).is_none());
    }

    #[test]
    fn remove_consumes_the_entry() {
        let cache = ChallengeCache::new();
        cache.insert("tok", pending(now() + Duration::hours(1)), now());
        cache.remove("tok");
        assert!(cache.get("tok", now()).is_none());
    }
}
