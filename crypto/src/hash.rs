//! SHA-256 hashing for verification codes and API keys.

use sha2::{Digest, Sha256};

/// Compute the hex-encoded SHA-256 digest of a string value.
///
/// Deterministic: the same input always yields the same digest, so the
/// digest serves both as the stored form and the lookup key.
pub fn sha256_hex(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    hex::encode(digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_deterministic() {
        let h1 = sha256_hex("hello vouch");
        let h2 = sha256_hex("hello vouch");
        assert_eq!(h1, h2);
    }

    #[test]
    fn sha256_different_inputs() {
        assert_ne!(sha256_hex("hello"), sha256_hex("world"));
    }

    #[test]
    fn sha256_known_vector() {
        // SHA-256("abc"), FIPS 180-2 appendix B.1.
        assert_eq!(
            sha256_hex("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn sha256_output_is_64_hex_chars() {
        let h = sha256_hex("");
        assert_eq!(h.len(), 64);
        assert!(h.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
