// Payload signatures — HMAC-SHA256 over the base64 payload, hex-encoded.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Sign `message` with `secret`, returning the lowercase hex HMAC-SHA256 tag.
pub fn sign(secret: &str, message: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC key can be any length");
    mac.update(message.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Check `signature` against a freshly computed tag in constant time.
pub fn verify(secret: &str, message: &str, signature: &str) -> bool {
    let expected = sign(secret, message);
    constant_time_equal(expected.as_bytes(), signature.as_bytes())
}

fn constant_time_equal(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
