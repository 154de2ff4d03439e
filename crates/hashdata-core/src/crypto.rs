//! Content digests.
//!
//! Every digest in hashdata is SHA-256, rendered as lowercase hex on the wire
//! and in the ledger.

use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// A 32-byte SHA-256 hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sha256Hash(pub [u8; 32]);

impl Sha256Hash {
    /// Compute the SHA-256 hash of data.
    pub fn hash(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Self(hasher.finalize().into())
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from a 64-character hex string.
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        let bytes = hex::decode(s).map_err(|e| CoreError::InvalidDigest(e.to_string()))?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|b: Vec<u8>| CoreError::InvalidDigest(format!("expected 32 bytes, got {}", b.len())))?;
        Ok(Self(arr))
    }

    /// Whether a caller-supplied hex claim names this digest.
    ///
    /// The comparison is exact on the hex text: an uppercase rendering of the
    /// right digest does not match.
    pub fn matches_claim(&self, claim: &str) -> bool {
        !claim.is_empty() && claim == self.to_hex()
    }
}

impl fmt::Debug for Sha256Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SHA256({}...)", &self.to_hex()[..8])
    }
}

impl fmt::Display for Sha256Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Sha256Hash {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl AsRef<[u8]> for Sha256Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for Sha256Hash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_digests() {
        assert_eq!(
            Sha256Hash::hash(b"").to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            Sha256Hash::hash(b"abc").to_hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_hex_parse() {
        let h = Sha256Hash::hash(b"hello");
        let parsed: Sha256Hash = h.to_hex().parse().unwrap();
        assert_eq!(h, parsed);

        assert!(Sha256Hash::from_hex("abcd").is_err());
        assert!(Sha256Hash::from_hex("zz").is_err());
    }

    #[test]
    fn test_matches_claim() {
        let h = Sha256Hash::hash(b"{\"x\":1}");
        assert!(h.matches_claim(&h.to_hex()));
        assert!(!h.matches_claim(""));
        assert!(!h.matches_claim(&h.to_hex().to_uppercase()));
        assert!(!h.matches_claim(&Sha256Hash::hash(b"other").to_hex()));
    }

    #[test]
    fn test_debug_is_truncated() {
        let debug = format!("{:?}", Sha256Hash::hash(b"abc"));
        assert_eq!(debug, "SHA256(ba7816bf...)");
    }

    proptest! {
        #[test]
        fn digest_is_deterministic(data in prop::collection::vec(any::<u8>(), 0..512)) {
            let a = Sha256Hash::hash(&data);
            let b = Sha256Hash::hash(&data);
            prop_assert_eq!(a, b);
            prop_assert_eq!(a.to_hex().len(), 64);
        }
    }
}
