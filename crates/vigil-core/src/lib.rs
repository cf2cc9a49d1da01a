//! Vigil Core — domain abstractions for the authentication decision
//! engine: the error taxonomy, the authenticatable-principal capability,
//! and the collaborator traits the engine consumes (credential store,
//! session sink, clock).

pub mod error;
pub mod principal;
pub mod store;

pub use error::{VigilError, VigilResult};
pub use principal::{Authenticatable, LockoutTransition};
pub use store::{Clock, CredentialStore, SessionSink, SystemClock};
