//! In-memory implementation of [`CredentialStore`].
//!
//! A `HashMap` behind an async `RwLock`. Every lockout transition runs
//! inside a single write-lock scope with the new values computed there,
//! which is the atomicity unit concurrent attempts serialize on: an
//! increment can never be lost and a transition either applies fully or
//! not at all.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;
use vigil_core::{CredentialStore, LockoutTransition, VigilError, VigilResult};

use crate::account::{self, Account};

/// Cheaply cloneable store handle; clones share the same map.
#[derive(Clone, Default)]
pub struct MemoryCredentialStore {
    accounts: Arc<RwLock<HashMap<Uuid, Account>>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an account.
    pub async fn upsert(&self, account: Account) {
        self.accounts.write().await.insert(account.id, account);
    }

    /// Point read of the stored row.
    pub async fn get(&self, id: Uuid) -> Option<Account> {
        self.accounts.read().await.get(&id).cloned()
    }

    /// Rotate the security stamp for `id` and return the new value.
    /// Outstanding sessions for the account die on their next request.
    pub async fn rotate_security_stamp(&self, id: Uuid) -> VigilResult<String> {
        let mut accounts = self.accounts.write().await;
        let account = accounts.get_mut(&id).ok_or_else(|| not_found(id))?;
        let stamp = account::new_security_stamp();
        account.security_stamp = Some(stamp.clone());
        debug!(principal = %id, "security stamp rotated");
        Ok(stamp)
    }
}

fn not_found(id: Uuid) -> VigilError {
    VigilError::NotFound { id: id.to_string() }
}

impl CredentialStore for MemoryCredentialStore {
    type Principal = Account;

    async fn find_by_identifier(
        &self,
        identifier: &str,
        now: DateTime<Utc>,
    ) -> VigilResult<Option<Account>> {
        let accounts = self.accounts.read().await;
        let found = accounts.values().find(|account| {
            account.identifier == identifier
                // A row locked past `now` is indistinguishable from a
                // missing one.
                && account.access_lockout_end.is_none_or(|end| end <= now)
        });
        Ok(found.cloned())
    }

    async fn apply_lockout_transition(
        &self,
        id: Uuid,
        transition: LockoutTransition,
    ) -> VigilResult<()> {
        let mut accounts = self.accounts.write().await;
        let account = accounts.get_mut(&id).ok_or_else(|| not_found(id))?;

        match transition {
            LockoutTransition::Reset { now } => {
                account.access_failed_count = 0;
                account.access_lockout_end = None;
                account.last_sign_in = Some(now);
            }
            LockoutTransition::Increment => {
                account.access_failed_count += 1;
            }
            LockoutTransition::Lock { until } => {
                account.access_lockout_end = Some(until);
            }
        }

        Ok(())
    }

    async fn security_stamp(&self, id: Uuid) -> VigilResult<Option<String>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(&id).and_then(|a| a.security_stamp.clone()))
    }
}
