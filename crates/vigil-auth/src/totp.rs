//! Time-based one-time passwords: enrollment URIs and time-windowed
//! verification (RFC 4226 truncation over RFC 6238 time steps).

use base32::Alphabet;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::{Sha256, Sha512};
use subtle::ConstantTimeEq;

use crate::config::{TotpAlgorithm, TotpConfig};

/// A verification request anchored to the moment it began.
///
/// Capture the challenge as soon as a code submission arrives; the
/// anchored timestamp, not a later clock read, selects the time window
/// searched during verification.
#[derive(Debug, Clone, Copy)]
pub struct TotpChallenge {
    timestamp: i64,
}

impl TotpChallenge {
    /// Unix seconds the request was anchored at.
    pub fn timestamp(self) -> i64 {
        self.timestamp
    }
}

/// Generates provisioning URIs and verifies time-windowed one-time codes
/// against the configured shared secret.
pub struct TotpEngine {
    config: TotpConfig,
}

impl TotpEngine {
    /// # Panics
    ///
    /// Panics if the configured secret key is empty.
    pub fn new(config: TotpConfig) -> Self {
        assert!(
            !config.secret_key.is_empty(),
            "TOTP secret key must not be empty"
        );
        Self { config }
    }

    /// Build an `otpauth://` URI for enrolling the shared secret into an
    /// authenticator app. The secret is unpadded base32; the issuer and
    /// account label are percent-encoded.
    pub fn provisioning_uri(&self, account_label: &str) -> String {
        let mut uri = String::from("otpauth://totp/");

        if let Some(issuer) = &self.config.issuer {
            uri.push_str(&urlencoding::encode(issuer));
            uri.push(':');
        }
        uri.push_str(&urlencoding::encode(account_label));

        uri.push_str("?secret=");
        uri.push_str(&base32::encode(
            Alphabet::Rfc4648 { padding: false },
            &self.config.secret_key,
        ));
        if let Some(issuer) = &self.config.issuer {
            uri.push_str("&issuer=");
            uri.push_str(&urlencoding::encode(issuer));
        }
        uri.push_str("&algorithm=");
        uri.push_str(self.config.algorithm.as_str());
        uri.push_str("&digits=");
        uri.push_str(&self.config.digits.to_string());
        uri.push_str("&period=");
        uri.push_str(&self.config.step_secs.to_string());

        uri
    }

    /// Anchor a verification request at `now`.
    pub fn challenge(&self, now: DateTime<Utc>) -> TotpChallenge {
        TotpChallenge {
            timestamp: now.timestamp(),
        }
    }

    /// Check `code` against every candidate step in the accepted drift
    /// window around the challenge's anchored step.
    ///
    /// Comparison is exact-length equality on the code strings, so
    /// leading zeros stay significant.
    pub fn verify(&self, challenge: TotpChallenge, code: &str) -> bool {
        let step = challenge.timestamp / self.config.step_secs;

        // TODO: decide whether `max` should be derived from
        // window_upper_offset; deployments currently rely on this range,
        // so widening it needs a coordinated config change.
        let min = step - self.config.window_lower_offset;
        let max = step + self.config.window_lower_offset;

        for candidate in min..=max {
            if constant_time_code_eq(code, &self.code_for_step(candidate)) {
                return true;
            }
        }

        false
    }

    /// Compute the code for one counter value: 8-byte big-endian counter,
    /// keyed HMAC, dynamic truncation to 31 bits, reduced modulo
    /// `10^digits` and left-padded with zeros.
    fn code_for_step(&self, step: i64) -> String {
        let counter = step.to_be_bytes();
        let mac = self.hmac(&counter);

        // Low nibble of the last byte picks the 4-byte window; the top
        // bit of the window is masked to keep the value in 31 bits.
        let offset = (mac[mac.len() - 1] & 0x0f) as usize;
        let value = (u64::from(mac[offset] & 0x7f)) << 24
            | u64::from(mac[offset + 1]) << 16
            | u64::from(mac[offset + 2]) << 8
            | u64::from(mac[offset + 3]);

        let code = value % 10u64.pow(self.config.digits);
        format!("{:01$}", code, self.config.digits as usize)
    }

    fn hmac(&self, counter: &[u8]) -> Vec<u8> {
        let key = &self.config.secret_key;
        match self.config.algorithm {
            TotpAlgorithm::Sha1 => {
                let mut mac =
                    Hmac::<Sha1>::new_from_slice(key).expect("HMAC accepts any key length");
                mac.update(counter);
                mac.finalize().into_bytes().to_vec()
            }
            TotpAlgorithm::Sha256 => {
                let mut mac =
                    Hmac::<Sha256>::new_from_slice(key).expect("HMAC accepts any key length");
                mac.update(counter);
                mac.finalize().into_bytes().to_vec()
            }
            TotpAlgorithm::Sha512 => {
                let mut mac =
                    Hmac::<Sha512>::new_from_slice(key).expect("HMAC accepts any key length");
                mac.update(counter);
                mac.finalize().into_bytes().to_vec()
            }
        }
    }
}

/// Exact-length equality that does not leak where two codes diverge.
/// `"042"` and `"42"` never match.
fn constant_time_code_eq(lhs: &str, rhs: &str) -> bool {
    lhs.len() == rhs.len() && bool::from(lhs.as_bytes().ct_eq(rhs.as_bytes()))
}
