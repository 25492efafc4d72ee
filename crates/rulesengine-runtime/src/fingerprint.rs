//! Content fingerprints of raw configuration

use sha2::{Digest, Sha256};
use std::fmt;

/// SHA-256 digest of raw configuration bytes
///
/// Depends only on content: the same bytes fetched at different times give
/// equal fingerprints.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Fingerprint raw configuration bytes
    pub fn of(bytes: &[u8]) -> Self {
        let digest = Sha256::digest(bytes);
        let mut result = [0u8; 32];
        result.copy_from_slice(&digest);
        Self(result)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex encoding
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", &self.to_hex()[..12])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_bytes_equal_fingerprints() {
        let a = Fingerprint::of(br#"{"ruleSets": []}"#);
        let b = Fingerprint::of(br#"{"ruleSets": []}"#.to_vec().as_slice());
        assert_eq!(a, b);
    }

    #[test]
    fn test_whitespace_changes_fingerprint() {
        let a = Fingerprint::of(br#"{"ruleSets": []}"#);
        let b = Fingerprint::of(br#"{"ruleSets":[]}"#);
        assert_ne!(a, b);
    }

    #[test]
    fn test_known_digest() {
        assert_eq!(
            Fingerprint::of(b"").to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(format!("{:?}", Fingerprint::of(b"")), "Fingerprint(e3b0c44298fc)");
    }
}
