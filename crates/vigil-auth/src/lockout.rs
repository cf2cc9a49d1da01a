//! Progressive-lockout decision logic.
//!
//! Pure functions of the password-check result, the principal's failure
//! counter, the configuration, and the current time. The returned
//! [`LockoutTransition`] is what the credential store applies as one
//! conditional update; nothing here touches storage.

use chrono::{DateTime, Duration, Utc};
use vigil_core::LockoutTransition;

use crate::config::AuthConfig;

/// Transition to persist for one password-check result.
pub fn transition(
    matched: bool,
    failed_count: u32,
    config: &AuthConfig,
    now: DateTime<Utc>,
) -> LockoutTransition {
    if matched {
        return LockoutTransition::Reset { now };
    }

    if reaches_threshold(failed_count, config) {
        LockoutTransition::Lock {
            until: now + lockout_duration(failed_count, config),
        }
    } else {
        LockoutTransition::Increment
    }
}

/// Whether this failed attempt is the one that crosses the threshold.
/// One is subtracted from the maximum so the lock lands exactly on the
/// attempt that reaches it.
pub fn reaches_threshold(failed_count: u32, config: &AuthConfig) -> bool {
    failed_count >= config.max_authentication_attempts.saturating_sub(1)
}

/// Lockout duration for an account locking with `failed_count` recorded
/// failures.
///
/// With incremental lockout the multiplier comes from integer division
/// of the attempt maximum by the failure count, plus one. The multiplier
/// is not monotonic in `failed_count` (maximum 10: locking at count 4
/// gives 3x, at count 9 gives 2x). The divisor is clamped to one; a
/// configured maximum of one attempt would otherwise divide by zero.
fn lockout_duration(failed_count: u32, config: &AuthConfig) -> Duration {
    let multiplier = if config.incremental_lockout_duration {
        config.max_authentication_attempts / failed_count.max(1)
    } else {
        0
    } + 1;

    Duration::seconds((u64::from(multiplier) * config.lockout_duration_secs) as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(max: u32, duration_secs: u64, incremental: bool) -> AuthConfig {
        AuthConfig {
            max_authentication_attempts: max,
            lockout_duration_secs: duration_secs,
            incremental_lockout_duration: incremental,
            ..AuthConfig::default()
        }
    }

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn match_resets() {
        let t = transition(true, 4, &config(5, 3600, false), now());
        assert_eq!(t, LockoutTransition::Reset { now: now() });
    }

    #[test]
    fn mismatch_below_threshold_increments() {
        let cfg = config(5, 3600, false);
        for count in 0..4 {
            assert_eq!(
                transition(false, count, &cfg, now()),
                LockoutTransition::Increment
            );
        }
    }

    #[test]
    fn mismatch_at_threshold_locks_for_base_duration() {
        let t = transition(false, 4, &config(5, 3600, false), now());
        assert_eq!(
            t,
            LockoutTransition::Lock {
                until: now() + Duration::hours(1)
            }
        );
    }

    #[test]
    fn incremental_multiplier_follows_integer_division() {
        // max / count + 1, not doubling: 5 / 4 + 1 = 2.
        let t = transition(false, 4, &config(5, 3600, true), now());
        assert_eq!(
            t,
            LockoutTransition::Lock {
                until: now() + Duration::hours(2)
            }
        );
    }

    #[test]
    fn incremental_multiplier_can_shrink_as_failures_grow() {
        // 10 / 4 + 1 = 3 but 10 / 9 + 1 = 2: a later lock is shorter.
        let cfg = config(10, 3600, true);
        assert_eq!(lockout_duration(4, &cfg), Duration::hours(3));
        assert_eq!(lockout_duration(9, &cfg), Duration::hours(2));
        assert_eq!(
            transition(false, 9, &cfg, now()),
            LockoutTransition::Lock {
                until: now() + Duration::hours(2)
            }
        );
    }

    #[test]
    fn single_attempt_maximum_locks_immediately_without_panicking() {
        let t = transition(false, 0, &config(1, 3600, true), now());
        assert_eq!(
            t,
            LockoutTransition::Lock {
                until: now() + Duration::hours(2)
            }
        );
    }
}
