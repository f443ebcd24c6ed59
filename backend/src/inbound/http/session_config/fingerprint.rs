//! Non-reversible session key fingerprints.
//!
//! Startup logs the fingerprint so operators can tell which key a replica
//! loaded after a rotation without the key itself reaching the logs.

use actix_web::cookie::Key;
use sha2::{Digest, Sha256};

/// Bytes of the digest kept before hex encoding.
const FINGERPRINT_BYTES: usize = 8;

/// Lowercase hex prefix of the SHA-256 digest of the key's signing half.
///
/// # Examples
///
/// ```rust
/// use actix_web::cookie::Key;
/// use whoami::inbound::http::session_config::fingerprint::key_fingerprint;
///
/// let fingerprint = key_fingerprint(&Key::derive_from(&[7; 64]));
/// assert_eq!(fingerprint.len(), 16);
/// ```
#[must_use]
pub fn key_fingerprint(key: &Key) -> String {
    let digest = Sha256::digest(key.signing());
    hex::encode(&digest[..FINGERPRINT_BYTES])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn same_material_same_fingerprint() {
        let material = [b'k'; 64];
        assert_eq!(
            key_fingerprint(&Key::derive_from(&material)),
            key_fingerprint(&Key::derive_from(&material))
        );
    }

    #[rstest]
    fn rotated_keys_are_distinguishable() {
        let before = key_fingerprint(&Key::derive_from(&[b'a'; 64]));
        let after = key_fingerprint(&Key::derive_from(&[b'b'; 64]));
        assert_ne!(before, after);
    }

    #[rstest]
    fn fingerprint_is_short_lowercase_hex() {
        let fingerprint = key_fingerprint(&Key::generate());
        assert_eq!(fingerprint.len(), FINGERPRINT_BYTES * 2);
        assert!(
            fingerprint
                .chars()
                .all(|ch| ch.is_ascii_digit() || ('a'..='f').contains(&ch))
        );
    }
}
