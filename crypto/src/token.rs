//! Verification code generation.

/// Number of random bytes per verification code (256 bits of entropy).
const CODE_BYTES: usize = 32;

/// Generate a cryptographically random verification code.
///
/// 32 bytes from the OS random source, hex-encoded (64 characters).
/// Unguessable within the token's 5-minute lifetime even under online
/// brute force. Pure generation — no side effects.
pub fn generate_code() -> String {
    let mut bytes = [0u8; CODE_BYTES];
    rand::RngCore::fill_bytes(&mut rand::rngs::OsRng, &mut bytes);
    hex::encode(bytes)
}
