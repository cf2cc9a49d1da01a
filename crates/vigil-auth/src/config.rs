//! Authentication and TOTP configuration.

/// Configuration for the authentication engine.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Max consecutive failed password checks before lockout (default: 5).
    pub max_authentication_attempts: u32,
    /// Base lockout duration in seconds (default: 3600 = 1 hour).
    pub lockout_duration_secs: u64,
    /// Scale the lockout duration with the failure count recorded at lock
    /// time (default: false).
    pub incremental_lockout_duration: bool,
    /// Global switch for the one-time-code second factor (default: true).
    pub mfa_enabled: bool,
    /// Pending MFA challenge lifetime in seconds (default: 3600 = 1 hour).
    pub challenge_ttl_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            max_authentication_attempts: 5,
            lockout_duration_secs: 3600,
            incremental_lockout_duration: false,
            mfa_enabled: true,
            challenge_ttl_secs: 3600,
        }
    }
}

/// Hash algorithm for the TOTP HMAC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TotpAlgorithm {
    /// RFC 6238 default.
    #[default]
    Sha1,
    Sha256,
    Sha512,
}

impl TotpAlgorithm {
    /// Name used in the `otpauth://` provisioning URI.
    pub fn as_str(self) -> &'static str {
        match self {
            TotpAlgorithm::Sha1 => "SHA1",
            TotpAlgorithm::Sha256 => "SHA256",
            TotpAlgorithm::Sha512 => "SHA512",
        }
    }
}

/// Configuration for TOTP generation and verification.
#[derive(Debug, Clone)]
pub struct TotpConfig {
    /// Shared secret the HMAC is keyed with.
    pub secret_key: Vec<u8>,
    /// Validity window of a single code in seconds (default: 30).
    pub step_secs: i64,
    /// Number of digits in a code (default: 6).
    pub digits: u32,
    /// HMAC algorithm (default: SHA1).
    pub algorithm: TotpAlgorithm,
    /// Accepted clock drift below the current step, in steps (default: 0).
    pub window_lower_offset: i64,
    /// Accepted clock drift above the current step, in steps (default: 0).
    pub window_upper_offset: i64,
    /// Issuer shown in authenticator apps.
    pub issuer: Option<String>,
}

impl Default for TotpConfig {
    fn default() -> Self {
        Self {
            secret_key: Vec::new(),
            step_secs: 30,
            digits: 6,
            algorithm: TotpAlgorithm::Sha1,
            window_lower_offset: 0,
            window_upper_offset: 0,
            issuer: None,
        }
    }
}
