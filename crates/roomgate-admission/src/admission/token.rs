//! Session token generation.

use rand::RngExt;

/// Generates session tokens for admission attempts.
///
/// Tokens are opaque 64-character hex strings from 32 cryptographically
/// random bytes. A fresh token is generated per admission attempt and
/// never replayed: after a transport failure the caller cannot know
/// whether the previous attempt committed, so retrying with the same
/// candidate would make the admitted sequence ambiguous.
#[derive(Debug, Clone, Default)]
pub struct TokenGenerator;

impl TokenGenerator {
    /// Creates a new token generator.
    pub fn new() -> Self {
        Self
    }

    /// Generates a cryptographically secure random session token.
    pub fn generate(&self) -> String {
        let mut rng = rand::rng();
        let bytes: Vec<u8> = (0..32).map(|_| rng.random()).collect();
        hex::encode(bytes)
    }
}

/// Simple hex encoding without external dependency.
mod hex {
    /// Encode bytes to hex string.
    pub fn encode(bytes: Vec<u8>) -> String {
        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }
}
