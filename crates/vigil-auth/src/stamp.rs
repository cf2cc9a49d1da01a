//! Per-request session revocation keyed to the stored security stamp.

use subtle::ConstantTimeEq;
use tracing::{debug, error};
use uuid::Uuid;
use vigil_core::{CredentialStore, SessionSink, VigilResult};

/// Validates, once per authenticated request, that the stamp a session
/// carries still matches the credential store.
///
/// Sessions carry the stamp but the store is the source of truth:
/// rotating a principal's stamp revokes every outstanding session on the
/// next request each of them makes, with no per-session bookkeeping.
/// The check is a single point lookup and runs before any further
/// request handling.
pub struct SecurityStampValidator<S, K> {
    store: S,
    sessions: K,
}

impl<S, K> SecurityStampValidator<S, K>
where
    S: CredentialStore,
    K: SessionSink<S::Principal>,
{
    pub fn new(store: S, sessions: K) -> Self {
        Self { store, sessions }
    }

    /// Check the claimed stamp for `id`. On a failed lookup or any
    /// mismatch the session is revoked and `Ok(false)` is returned; the
    /// request must not proceed as authenticated.
    pub async fn validate(&self, id: Uuid, claimed_stamp: &str) -> VigilResult<bool> {
        let valid = match self.store.security_stamp(id).await {
            Ok(Some(stored)) => {
                bool::from(stored.as_bytes().ct_eq(claimed_stamp.as_bytes()))
            }
            Ok(None) => false,
            Err(err) => {
                error!(%err, "security stamp lookup failed");
                false
            }
        };

        if !valid {
            debug!(principal = %id, "security stamp mismatch, revoking session");
            self.sessions.revoke().await?;
        }

        Ok(valid)
    }
}
