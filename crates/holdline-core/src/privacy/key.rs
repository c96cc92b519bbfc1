use crate::error::CoreError;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;

type HmacSha256 = Hmac<Sha256>;

/// Secret used to key every phone-number hash.
///
/// The HMAC state is keyed once at construction and cloned per digest.
#[derive(Clone)]
pub struct PhoneHashKey {
    mac: HmacSha256,
}

impl PhoneHashKey {
    pub fn new(secret: &str) -> Result<Self, CoreError> {
        if secret.is_empty() {
            return Err(CoreError::EmptySecret);
        }
        let mac =
            HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| CoreError::InvalidSecret)?;
        Ok(Self { mac })
    }

    /// Lowercase hex of the first `bytes` bytes of HMAC-SHA256(`input`).
    pub(crate) fn digest_hex(&self, input: &str, bytes: usize) -> String {
        let mut mac = self.mac.clone();
        mac.update(input.as_bytes());
        let digest = mac.finalize().into_bytes();
        hex::encode(&digest[..bytes.min(digest.len())])
    }
}

impl fmt::Debug for PhoneHashKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PhoneHashKey(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::PhoneHashKey;
    use crate::error::CoreError;

    #[test]
    fn rejects_empty_secret() {
        let err = PhoneHashKey::new("").unwrap_err();
        assert_eq!(err, CoreError::EmptySecret);
    }

    #[test]
    fn digest_matches_hmac_sha256_prefix() {
        let key = PhoneHashKey::new("k").unwrap();
        assert_eq!(key.digest_hex("+19129127264", 8), "967933827a5d76fd");
        assert_eq!(key.digest_hex("+19129127264", 2), "9679");
    }

    #[test]
    fn digest_is_reusable_across_calls() {
        let key = PhoneHashKey::new("k").unwrap();
        let first = key.digest_hex("5551234", 8);
        let second = key.digest_hex("5551234", 8);
        assert_eq!(first, second);
    }

    #[test]
    fn debug_hides_secret() {
        let key = PhoneHashKey::new("super-secret").unwrap();
        let rendered = format!("{key:?}");
        assert!(!rendered.contains("super-secret"));
    }
}
