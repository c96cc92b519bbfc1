//! Webhook request signatures.
//!
//! The provider signs each webhook with HMAC-SHA1 over the full request URL
//! followed by every form parameter as `key + value`, keys in ascending
//! order, keyed with the account auth token and base64 encoded.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use std::collections::BTreeMap;

type HmacSha1 = Hmac<Sha1>;

pub const SIGNATURE_HEADER: &str = "X-Twilio-Signature";

fn signed_mac(auth_token: &str, url: &str, params: &BTreeMap<String, String>) -> Option<HmacSha1> {
    let mut mac = HmacSha1::new_from_slice(auth_token.as_bytes()).ok()?;
    mac.update(url.as_bytes());
    for (key, value) in params {
        mac.update(key.as_bytes());
        mac.update(value.as_bytes());
    }
    Some(mac)
}

/// The header value a genuine request for `url` and `params` would carry.
pub fn expected_signature(
    auth_token: &str,
    url: &str,
    params: &BTreeMap<String, String>,
) -> Option<String> {
    let mac = signed_mac(auth_token, url, params)?;
    Some(STANDARD.encode(mac.finalize().into_bytes()))
}

/// Constant-time check of a signature header against the request contents.
pub fn verify_signature(
    auth_token: &str,
    url: &str,
    params: &BTreeMap<String, String>,
    signature: &str,
) -> bool {
    let Ok(provided) = STANDARD.decode(signature.trim()) else {
        return false;
    };
    match signed_mac(auth_token, url, params) {
        Some(mac) => mac.verify_slice(&provided).is_ok(),
        None => false,
    }
}
