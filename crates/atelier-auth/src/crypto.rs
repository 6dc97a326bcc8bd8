//! Secure random and encoding primitives
//!
//! Everything above this module builds on these three things: random
//! bytes from the OS CSPRNG, Base64URL without padding, and keyed
//! HMAC-SHA256. All are pure functions of their arguments.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;

use crate::error::{AuthError, AuthResult};

type HmacSha256 = Hmac<Sha256>;

/// Draw `byte_length` bytes from the OS CSPRNG, hex-encoded
/// (2 chars per byte). Refresh tokens use 32 bytes, OAuth state
/// tokens 16.
pub fn random_token(byte_length: usize) -> String {
    let mut bytes = vec![0u8; byte_length];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Base64 with the URL-safe alphabet and padding stripped
pub fn b64url_encode(input: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(input.as_ref())
}

/// Reverse of [`b64url_encode`]. Malformed input is an error; the JWT
/// codec maps it to an invalid-token outcome, never a crash.
pub fn b64url_decode(input: &str) -> AuthResult<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(input)
        .map_err(|_| AuthError::InvalidToken)
}

/// HMAC-SHA256 over an arbitrary byte string
pub fn hmac_sha256(key: &[u8], message: &[u8]) -> [u8; 32] {
    // new_from_slice only fails for unusable key lengths, which HMAC
    // does not have
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(message);
    mac.finalize().into_bytes().into()
}
