//! # Identity Redaction
//!
//! Converts the client-supplied forwarded-for header into a stable
//! pseudonymous key. The raw address is never persisted or logged; the
//! digest is only an abuse-correlation key, not a security boundary.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Substituted when no forwarded-for header reaches the handler.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Hex characters kept from the full digest. Enough to avoid collisions
/// within the active key space of a personal site.
const DIGEST_LEN: usize = 16;

/// Derives fixed-length keyed digests from raw client addresses.
///
/// Keyed with a server-side salt so the digest cannot be reversed or
/// dictionary-matched against address lists. Deterministic within a
/// process lifetime: same input, same output.
pub struct IdentityRedactor {
    salt: Vec<u8>,
}

impl IdentityRedactor {
    /// Accepts the redaction salt (e.g., from configuration).
    pub fn new(salt: &str) -> Self {
        Self {
            salt: salt.as_bytes().to_vec(),
        }
    }

    /// Redacts the left-most entry of a forwarded-for chain.
    ///
    /// The header may carry a comma-separated proxy chain; only the first
    /// entry identifies the originating client. Absent or empty headers
    /// collapse to the [`UNKNOWN_CLIENT`] sentinel so such traffic shares
    /// one bucket.
    pub fn client_key(&self, forwarded_for: Option<&str>) -> String {
        let raw = forwarded_for
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(UNKNOWN_CLIENT);
        self.redact(raw)
    }

    /// HMAC-SHA256 of the raw value, hex-encoded and truncated.
    pub fn redact(&self, raw: &str) -> String {
        let mut mac =
            HmacSha256::new_from_slice(&self.salt).expect("HMAC accepts keys of any length");
        mac.update(raw.as_bytes());
        let digest = hex::encode(mac.finalize().into_bytes());
        digest[..DIGEST_LEN].to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn redactor() -> IdentityRedactor {
        IdentityRedactor::new("test-salt")
    }

    #[test]
    fn deterministic_within_process() {
        let r = redactor();
        assert_eq!(r.redact("203.0.113.7"), r.redact("203.0.113.7"));
    }

    #[test]
    fn distinct_addresses_do_not_collide() {
        let r = redactor();
        let addrs = [
            "203.0.113.7",
            "203.0.113.8",
            "198.51.100.1",
            "2001:db8::1",
            "2001:db8::2",
            "10.0.0.1",
        ];
        let mut keys: Vec<String> = addrs.iter().map(|a| r.redact(a)).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), addrs.len());
    }

    #[test]
    fn digest_is_fixed_length_and_reveals_nothing() {
        let r = redactor();
        let key = r.redact("203.0.113.7");
        assert_eq!(key.len(), DIGEST_LEN);
        assert!(!key.contains("203"));
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn takes_first_entry_of_forwarded_chain() {
        let r = redactor();
        let direct = r.client_key(Some("203.0.113.7"));
        let chained = r.client_key(Some("203.0.113.7, 10.0.0.1, 172.16.0.1"));
        let padded = r.client_key(Some("  203.0.113.7  , 10.0.0.1"));
        assert_eq!(direct, chained);
        assert_eq!(direct, padded);
    }

    #[test]
    fn missing_header_uses_unknown_sentinel() {
        let r = redactor();
        assert_eq!(r.client_key(None), r.redact(UNKNOWN_CLIENT));
        assert_eq!(r.client_key(Some("")), r.redact(UNKNOWN_CLIENT));
        assert_eq!(r.client_key(Some("  ,10.0.0.1")), r.redact(UNKNOWN_CLIENT));
    }

    #[test]
    fn different_salts_produce_unrelated_keys() {
        let a = IdentityRedactor::new("salt-a");
        let b = IdentityRedactor::new("salt-b");
        assert_ne!(a.redact("203.0.113.7"), b.redact("203.0.113.7"));
    }
}
