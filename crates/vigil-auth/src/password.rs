//! Password digests: PBKDF2-HMAC-SHA256 over a random per-password salt.
//!
//! A digest is the 16-byte salt followed by the 32-byte derived subkey,
//! 48 bytes total. The layout and iteration count are part of the
//! stored-credential contract; changing either invalidates every digest
//! already at rest.

use pbkdf2::pbkdf2_hmac;
use rand::Rng;
use sha2::Sha256;
use subtle::ConstantTimeEq;

/// Salt prefix length in bytes.
pub const SALT_LEN: usize = 16;
/// Derived subkey length in bytes for newly created digests.
pub const SUBKEY_LEN: usize = 32;
/// Total length of a freshly generated digest.
pub const DIGEST_LEN: usize = SALT_LEN + SUBKEY_LEN;

const PBKDF2_ROUNDS: u32 = 100;

/// Derive a salted digest for `password`.
pub fn hash(password: &str) -> [u8; DIGEST_LEN] {
    let mut rng = rand::rng();
    let salt: [u8; SALT_LEN] = rng.random();

    let mut digest = [0u8; DIGEST_LEN];
    digest[..SALT_LEN].copy_from_slice(&salt);
    pbkdf2_hmac::<Sha256>(
        password.as_bytes(),
        &salt,
        PBKDF2_ROUNDS,
        &mut digest[SALT_LEN..],
    );

    digest
}

/// Verify `password` against a stored digest.
///
/// The stored subkey length is taken from the digest rather than assumed,
/// so digests with a different subkey size keep verifying. The comparison
/// runs in constant time relative to the subkey.
///
/// # Panics
///
/// Panics if `digest` is not longer than the salt prefix. A digest that
/// short cannot have come from [`hash`]; passing one is a caller bug, not
/// a failed credential check.
pub fn verify(digest: &[u8], password: &str) -> bool {
    assert!(
        digest.len() > SALT_LEN,
        "password digest shorter than its salt prefix"
    );

    let (salt, stored_subkey) = digest.split_at(SALT_LEN);

    let mut candidate = vec![0u8; stored_subkey.len()];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, PBKDF2_ROUNDS, &mut candidate);

    stored_subkey.ct_eq(&candidate).into()
}

/// Minimum password length accepted by [`validate_strength`].
pub const MIN_PASSWORD_LEN: usize = 8;

const SPECIAL_CHARS: &str = "!@#$%^&*()-_=+[{]};:'\"\\|,<.>/?§±`~";

/// Check a candidate password against the strength policy: minimum
/// length, at least one uppercase letter, one digit, and one special
/// character.
pub fn validate_strength(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| SPECIAL_CHARS.contains(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_has_expected_layout() {
        let digest = hash("hunter2");
        assert_eq!(digest.len(), DIGEST_LEN);
    }

    #[test]
    fn correct_password_matches() {
        let digest = hash("correct-horse-battery");
        assert!(verify(&digest, "correct-horse-battery"));
    }

    #[test]
    fn wrong_password_does_not_match() {
        let digest = hash("correct-horse-battery");
        assert!(!verify(&digest, "wrong-password"));
    }

    #[test]
    fn same_password_hashes_differently() {
        // Salts are random, so two digests of one password differ.
        let a = hash("hunter2");
        let b = hash("hunter2");
        assert_ne!(a, b);
        assert!(verify(&a, "hunter2"));
        assert!(verify(&b, "hunter2"));
    }

    #[test]
    fn subkey_length_is_taken_from_digest() {
        // A digest with a 20-byte subkey still verifies; the candidate is
        // derived at the stored length.
        let salt = [7u8; SALT_LEN];
        let mut subkey = vec![0u8; 20];
        pbkdf2_hmac::<Sha256>(b"legacy-pw", &salt, 100, &mut subkey);

        let mut digest = salt.to_vec();
        digest.extend_from_slice(&subkey);

        assert!(verify(&digest, "legacy-pw"));
        assert!(!verify(&digest, "other-pw"));
    }

    #[test]
    #[should_panic(expected = "shorter than its salt prefix")]
    fn short_digest_is_a_caller_bug() {
        verify(&[0u8; SALT_LEN], "anything");
    }

    #[test]
    fn strength_policy() {
        assert!(validate_strength("Str0ng!pw"));
        // Too short.
        assert!(!validate_strength("S0rt!"));
        // No uppercase.
        assert!(!validate_strength("weak0!pwd"));
        // No digit.
        assert!(!validate_strength("Weakest!pw"));
        // No special character.
        assert!(!validate_strength("Weakest0pw"));
    }
}
