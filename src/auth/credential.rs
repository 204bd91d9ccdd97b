//! Credential codec - salted keyed-hash password digests
//!
//! A stored credential is a per-member random salt plus the hex digest of
//! HMAC-SHA-256 over the plaintext, keyed by that salt. The digest of an
//! empty or unset password is the empty string: callers must treat it as
//! "password effectively unset", never as a match target that came from a
//! real plaintext.

use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;

/// The digest of an empty or unset password.
pub const EMPTY_DIGEST: &str = "";

/// Generate a fresh salt from the current time and a random source.
///
/// Salts are unique per call with overwhelming probability; no other
/// uniqueness guarantee is made or needed.
pub fn make_salt() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let noise: u64 = rand::rng().random();
    format!("{:x}{:016x}", millis, noise)
}

/// Compute the digest for a plaintext under the given salt.
///
/// Deterministic: the same `(plaintext, salt)` pair always yields the same
/// digest. An empty plaintext, or any failure to key the MAC, yields
/// [`EMPTY_DIGEST`] rather than an error.
pub fn encrypt_password(plaintext: &str, salt: &str) -> String {
    if plaintext.is_empty() {
        return EMPTY_DIGEST.to_string();
    }

    // new_from_slice accepts any key length for SHA-256
    let mut mac = match Hmac::<Sha256>::new_from_slice(salt.as_bytes()) {
        Ok(m) => m,
        Err(_) => return EMPTY_DIGEST.to_string(), // Unreachable for string salts
    };
    mac.update(plaintext.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Check a plaintext candidate against a stored salt and digest.
///
/// True iff `encrypt_password(plaintext, salt)` equals `digest`. The
/// comparison is constant-time over equal-length inputs.
pub fn authenticate(plaintext: &str, salt: &str, digest: &str) -> bool {
    let computed = encrypt_password(plaintext, salt);
    constant_time_eq(computed.as_bytes(), digest.as_bytes())
}

/// Constant-time byte equality. Length mismatch returns early; only the
/// content comparison needs to resist timing probes.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_digest_is_deterministic() {
        let salt = make_salt();
        let a = encrypt_password("correct-horse-battery-staple", &salt);
        let b = encrypt_password("correct-horse-battery-staple", &salt);
        assert_eq!(a, b);
        assert!(!a.is_empty());
    }

    #[test]
    fn test_digest_depends_on_salt() {
        let a = encrypt_password("hunter22", "salt-one");
        let b = encrypt_password("hunter22", "salt-two");
        assert_ne!(a, b);
    }

    #[test]
    fn test_salts_are_distinct() {
        let mut seen = std::collections::HashSet::new();
        for _ in 0..100 {
            assert!(seen.insert(make_salt()));
        }
    }

    #[test]
    fn test_authenticate_accepts_matching_password() {
        let salt = make_salt();
        let digest = encrypt_password("open sesame", &salt);
        assert!(authenticate("open sesame", &salt, &digest));
    }

    #[test]
    fn test_authenticate_rejects_wrong_password() {
        let salt = make_salt();
        let digest = encrypt_password("open sesame", &salt);
        assert!(!authenticate("open sesame!", &salt, &digest));
        assert!(!authenticate("", &salt, &digest));
    }

    #[test]
    fn test_empty_plaintext_yields_sentinel() {
        let salt = make_salt();
        assert_eq!(encrypt_password("", &salt), EMPTY_DIGEST);
    }

    #[test]
    fn test_digest_is_hex_of_mac_length() {
        let digest = encrypt_password("anything", "salt");
        // HMAC-SHA-256 output is 32 bytes, hex doubles it
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"abcd"));
        assert!(constant_time_eq(b"", b""));
    }

    #[test]
    fn test_random_passwords_roundtrip() {
        let mut rng = rand::rng();
        for _ in 0..20 {
            let len = rng.random_range(6..24);
            let password: String = (0..len)
                .map(|_| char::from(rng.random_range(b'a'..=b'z')))
                .collect();
            let salt = make_salt();
            let digest = encrypt_password(&password, &salt);
            assert!(authenticate(&password, &salt, &digest));
        }
    }
}
