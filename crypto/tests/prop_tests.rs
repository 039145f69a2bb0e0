use proptest::prelude::*;

use vouch_crypto::sha256_hex;

proptest! {
    /// Digest stability: hashing the same input twice yields identical digests.
    #[test]
    fn digest_is_stable(input in ".{0,128}") {
        prop_assert_eq!(sha256_hex(&input), sha256_hex(&input));
    }

    /// Digests are always 64 lowercase hex characters regardless of input.
    #[test]
    fn digest_shape(input in ".{0,128}") {
        let digest = sha256_hex(&input);
        prop_assert_eq!(digest.len(), 64);
        prop_assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    /// Distinct inputs produce distinct digests (collision resistance at the
    /// scale a property test can observe).
    #[test]
    fn distinct_inputs_distinct_digests(a in "[a-z]{1,32}", b in "[a-z]{1,32}") {
        if a != b {
            prop_assert_ne!(sha256_hex(&a), sha256_hex(&b));
        }
    }
}
