//! Golden digest vectors.
//!
//! Every ledger backend must record exactly these hashes for exactly these
//! bytes. The first four are the published SHA-256 test vectors.

use hashdata_core::Sha256Hash;
use serde::{Deserialize, Serialize};

/// A single golden test vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoldenVector {
    pub name: String,
    pub description: String,
    pub content: String,
    /// Lowercase hex SHA-256 of `content`.
    pub hash: String,
}

fn vector(name: &str, description: &str, content: &str, hash: &str) -> GoldenVector {
    GoldenVector {
        name: name.to_string(),
        description: description.to_string(),
        content: content.to_string(),
        hash: hash.to_string(),
    }
}

/// All golden vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        vector(
            "empty",
            "Empty content",
            "",
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
        ),
        vector(
            "abc",
            "One-block message",
            "abc",
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad",
        ),
        vector(
            "two_block",
            "448-bit message spanning two blocks",
            "abcdbcdecdefdefgefghfghighijhijkijkljklmklmnlmnomnopnopq",
            "248d6a61d20638b8e5c026930c3e6039a33ce45964ff2167f6ecedd419db06c1",
        ),
        vector(
            "quick_brown_fox",
            "Pangram",
            "The quick brown fox jumps over the lazy dog",
            "d7a8fbb307d7809469ca9abcb0082e4f8d5651e46d3cdb762d02d0bf37c9e592",
        ),
    ]
}

/// Check every vector against [`Sha256Hash`]. Returns the name of the first
/// vector that does not match.
pub fn verify_all_vectors() -> Result<(), String> {
    for v in all_vectors() {
        if Sha256Hash::hash(v.content.as_bytes()).to_hex() != v.hash {
            return Err(v.name);
        }
    }
    Ok(())
}
