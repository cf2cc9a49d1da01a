//! Authentication orchestration: credential lookup, password check,
//! lockout transition, MFA gating, session issuance.

use chrono::Duration;
use tracing::{debug, error, warn};
use vigil_core::{
    Authenticatable, Clock, CredentialStore, LockoutTransition, SessionSink, VigilResult,
};

use crate::challenge::{self, ChallengeCache, PendingChallenge};
use crate::config::{AuthConfig, TotpConfig};
use crate::lockout;
use crate::password;
use crate::totp::TotpEngine;

/// Result of a credential submission.
///
/// Unknown identifier, wrong secret, and currently-locked account all
/// surface as `InvalidCredentials`; callers can never probe whether an
/// identifier exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthenticationOutcome {
    /// A store or crypto fault unrelated to the submitted credentials.
    UnknownError,
    /// The credentials did not authenticate the principal.
    InvalidCredentials,
    /// Correct password; the one-time code must be submitted with the
    /// returned challenge token to finish signing in.
    MfaRequired { challenge_token: String },
    /// This attempt crossed the failure threshold and locked the account.
    AccountLockedOut,
    /// Authenticated; a session was issued.
    Success,
}

/// The authentication decision engine.
///
/// Generic over the credential store, session sink, and clock so hosts
/// wire their own storage and transport and tests inject deterministic
/// time.
pub struct AuthenticationEngine<S: CredentialStore, K, C> {
    store: S,
    sessions: K,
    clock: C,
    totp: TotpEngine,
    config: AuthConfig,
    pending: ChallengeCache<S::Principal>,
}

impl<S, K, C> AuthenticationEngine<S, K, C>
where
    S: CredentialStore,
    K: SessionSink<S::Principal>,
    C: Clock,
{
    pub fn new(store: S, sessions: K, clock: C, config: AuthConfig, totp: TotpConfig) -> Self {
        Self {
            store,
            sessions,
            clock,
            totp: TotpEngine::new(totp),
            config,
            pending: ChallengeCache::new(),
        }
    }

    /// Attempt to sign in with an identifier and password.
    ///
    /// Every counter or lockout mutation is persisted before the outcome
    /// is returned; the outcome is never reported ahead of the state
    /// change, and any store fault fails closed to `UnknownError`.
    pub async fn authenticate(
        &self,
        identifier: &str,
        password: &str,
        persistent: bool,
    ) -> AuthenticationOutcome {
        let now = self.clock.now();

        // 1. Look up the principal. Currently-locked rows are invisible
        //    to this query.
        let principal = match self.store.find_by_identifier(identifier, now).await {
            Ok(Some(principal)) => principal,
            Ok(None) => return AuthenticationOutcome::InvalidCredentials,
            Err(err) => {
                error!(%err, "credential lookup failed");
                return AuthenticationOutcome::UnknownError;
            }
        };

        // 2. Verify the password and persist the lockout transition. The
        //    clock is read again here: time has passed since the lookup
        //    anchored `now`.
        let matched = password::verify(principal.password_digest(), password);
        let transition = lockout::transition(
            matched,
            principal.access_failed_count(),
            &self.config,
            self.clock.now(),
        );

        if let Err(err) = self
            .store
            .apply_lockout_transition(principal.id(), transition)
            .await
        {
            error!(%err, "failed to persist lockout transition");
            return AuthenticationOutcome::UnknownError;
        }

        if !matched {
            return match transition {
                LockoutTransition::Lock { until } => {
                    debug!(principal = %principal.id(), %until, "account locked out");
                    AuthenticationOutcome::AccountLockedOut
                }
                _ => AuthenticationOutcome::InvalidCredentials,
            };
        }

        // 3. MFA gating: park the principal under an opaque challenge
        //    token instead of issuing a session.
        if self.config.mfa_enabled && principal.mfa_enabled() {
            let token = challenge::generate_token();
            let expires_at = now + Duration::seconds(self.config.challenge_ttl_secs as i64);
            self.pending.insert(
                &token,
                PendingChallenge {
                    principal,
                    persistent,
                    expires_at,
                },
                now,
            );
            return AuthenticationOutcome::MfaRequired {
                challenge_token: token,
            };
        }

        // 4. No second factor required; issue the session.
        if let Err(err) = self.sessions.issue(&principal, persistent).await {
            error!(%err, "session issuance failed");
            return AuthenticationOutcome::UnknownError;
        }

        AuthenticationOutcome::Success
    }

    /// Finish an MFA sign-in with the one-time code for a pending
    /// challenge token.
    ///
    /// The verification window is anchored before any cache work so the
    /// code is judged for the moment it was submitted. A wrong code
    /// leaves the challenge in place for retry until its deadline; a
    /// correct one consumes it so the token cannot be replayed.
    pub async fn authenticate_challenge(&self, token: &str, code: &str) -> bool {
        let request = self.totp.challenge(self.clock.now());

        let Some(pending) = self.pending.get(token, self.clock.now()) else {
            warn!("one-time code submitted without a pending challenge");
            return false;
        };

        if !self.totp.verify(request, code) {
            return false;
        }

        self.pending.remove(token);

        match self
            .sessions
            .issue(&pending.principal, pending.persistent)
            .await
        {
            Ok(()) => true,
            Err(err) => {
                error!(%err, "session issuance failed");
                false
            }
        }
    }

    /// Invalidate the current session. Idempotent: succeeds when no
    /// session exists.
    pub async fn sign_out(&self) -> VigilResult<()> {
        self.sessions.revoke().await
    }

    /// Enrollment URI for the configured TOTP secret.
    pub fn provisioning_uri(&self, account_label: &str) -> String {
        self.totp.provisioning_uri(account_label)
    }
}
