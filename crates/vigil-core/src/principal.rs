//! The authenticatable-principal capability and the counter/lockout
//! transitions a credential store can be asked to apply.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Capability surface the authentication engine needs from a principal.
///
/// Any record type exposing these attributes can be authenticated; the
/// engine never depends on a concrete storage model.
pub trait Authenticatable {
    /// Stable unique identifier.
    fn id(&self) -> Uuid;

    /// Salted password digest: a 16-byte salt followed by the derived
    /// subkey.
    fn password_digest(&self) -> &[u8];

    /// Opaque token rotated whenever credentials or other
    /// security-relevant attributes change. `None` only before the first
    /// rotation.
    fn security_stamp(&self) -> Option<&str>;

    /// Consecutive failed password checks since the last success.
    fn access_failed_count(&self) -> u32;

    /// End of the most recent lockout window, if one was ever applied.
    /// A value in the past means the lock expired but the failure counter
    /// is untouched.
    fn access_lockout_end(&self) -> Option<DateTime<Utc>>;

    /// Whether a one-time-code second factor is required after a correct
    /// password.
    fn mfa_enabled(&self) -> bool;

    /// Timestamp of the last successful password verification.
    fn last_sign_in(&self) -> Option<DateTime<Utc>>;
}

/// A counter/lockout mutation to be applied as one conditional update
/// keyed by the principal id.
///
/// The store must apply the whole transition atomically, with the new
/// values computed store-side. A read-then-write round trip is not an
/// implementation of this contract: concurrent failed attempts would
/// lose increments or race the lockout decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockoutTransition {
    /// Password matched: zero the failure counter, clear the lockout end,
    /// record the sign-in timestamp.
    Reset { now: DateTime<Utc> },

    /// Password mismatch below the threshold: advance the failure counter
    /// by one.
    Increment,

    /// Password mismatch reaching the threshold: set the lockout end.
    /// The failure counter is left as-is.
    Lock { until: DateTime<Utc> },
}
