//! Collaborator traits consumed by the authentication engine.
//!
//! All store operations are async: lookups and updates are I/O-bound
//! suspension points, and callers are never blocked synchronously.

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::VigilResult;
use crate::principal::{Authenticatable, LockoutTransition};

/// Read/write access to the credential store.
pub trait CredentialStore: Send + Sync {
    type Principal: Authenticatable + Clone + Send + Sync + 'static;

    /// Look up a principal by its sign-in identifier.
    ///
    /// Rows whose lockout end lies after `now` must be invisible: a
    /// currently locked account and an unknown identifier are
    /// indistinguishable to the caller.
    fn find_by_identifier(
        &self,
        identifier: &str,
        now: DateTime<Utc>,
    ) -> impl Future<Output = VigilResult<Option<Self::Principal>>> + Send;

    /// Apply a counter/lockout transition as a single conditional update
    /// keyed by `id`. The update completes fully or has no effect.
    fn apply_lockout_transition(
        &self,
        id: Uuid,
        transition: LockoutTransition,
    ) -> impl Future<Output = VigilResult<()>> + Send;

    /// Current security stamp for `id`, or `None` when the principal
    /// does not exist or carries no stamp. This runs on every
    /// authenticated request and must stay a single point lookup.
    fn security_stamp(
        &self,
        id: Uuid,
    ) -> impl Future<Output = VigilResult<Option<String>>> + Send;
}

/// Session issuance and invalidation. Cookie or token transport lives
/// behind this seam.
pub trait SessionSink<P>: Send + Sync {
    /// Establish a session for an authenticated principal.
    fn issue(
        &self,
        principal: &P,
        persistent: bool,
    ) -> impl Future<Output = VigilResult<()>> + Send;

    /// Invalidate the current session. Idempotent: succeeds when no
    /// session exists.
    fn revoke(&self) -> impl Future<Output = VigilResult<()>> + Send;
}

/// Injectable time source.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock implementation used outside of tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
