//! Payload encoding and parsing.
//!
//! Outbound payloads are `return_sso_url=<url>&nonce=<nonce>` in base64.
//! Inbound payloads are base64 of a URL-encoded `key=value&...` string.

use crate::types::IdentityClaim;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::collections::HashMap;

pub const RETURN_SSO_URL: &str = "return_sso_url";
pub const NONCE: &str = "nonce";
pub const EXTERNAL_ID: &str = "external_id";
pub const USERNAME: &str = "username";
pub const EMAIL: &str = "email";

/// Build the plaintext outbound payload.
pub fn build_outbound(return_url: &str, nonce: &str) -> String {
    format!("{RETURN_SSO_URL}={return_url}&{NONCE}={nonce}")
}

/// Base64-encode a plaintext payload.
pub fn encode(plaintext: &str) -> String {
    STANDARD.encode(plaintext.as_bytes())
}

/// Decode an inbound payload into its plaintext `key=value&...` form.
///
/// Returns `None` for bad base64, non-UTF-8 content, or percent-escapes that
/// decode to invalid UTF-8.
pub fn decode_inbound(payload: &str) -> Option<String> {
    // Providers may wrap long base64 output across lines.
    let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD.decode(compact.as_bytes()).ok()?;
    let query = String::from_utf8(bytes).ok()?;
    let query = query.replace('+', " ");
    urlencoding::decode(&query).ok().map(|s| s.into_owned())
}

/// Split a plaintext payload into a key → optional value map.
///
/// Empty segments are skipped, a segment without `=` maps its key to `None`,
/// and a repeated key keeps its last value.
pub fn parse_payload(plaintext: &str) -> HashMap<String, Option<String>> {
    plaintext
        .split('&')
        .filter(|segment| !segment.is_empty())
        .map(|segment| match segment.split_once('=') {
            Some((key, value)) => (key.to_string(), Some(value.to_string())),
            None => (segment.to_string(), None),
        })
        .collect()
}

/// Build an identity claim from parsed fields, requiring `external_id`,
/// `username` and `email`.
pub fn extract_claim(fields: &HashMap<String, Option<String>>) -> Option<IdentityClaim> {
    let field = |key: &str| fields.get(key).and_then(|v| v.as_deref());

    let id = field(EXTERNAL_ID)?.parse::<i64>().ok()?;
    let username = field(USERNAME)?.to_string();
    let email = field(EMAIL)?.to_string();

    Some(IdentityClaim {
        id,
        username,
        email,
        avatar_url: None,
    })
}
