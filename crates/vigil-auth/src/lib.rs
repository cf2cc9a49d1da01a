//! Vigil Auth — the authentication decision engine: password
//! verification, progressive account lockout, TOTP challenge/response,
//! and per-request session revocation via the security stamp.

pub mod challenge;
pub mod config;
pub mod engine;
pub mod lockout;
pub mod password;
pub mod stamp;
pub mod totp;

pub use config::{AuthConfig, TotpAlgorithm, TotpConfig};
pub use engine::{AuthenticationEngine, AuthenticationOutcome};
pub use stamp::SecurityStampValidator;
pub use totp::{TotpChallenge, TotpEngine};
