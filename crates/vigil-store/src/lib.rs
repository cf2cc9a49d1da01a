//! Vigil Store — in-memory [`CredentialStore`] implementation and the
//! concrete [`Account`] principal record.
//!
//! [`CredentialStore`]: vigil_core::CredentialStore
//! [`Account`]: account::Account

pub mod account;
pub mod memory;

pub use account::{new_security_stamp, Account};
pub use memory::MemoryCredentialStore;
