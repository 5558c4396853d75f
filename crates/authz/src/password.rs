//! Password digests.
//!
//! Digests are unsalted SHA-256, so equal passwords produce equal digests.

use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 of `password`.
pub fn digest(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Whether `password` hashes to `expected`.
pub fn verify(password: &str, expected: &str) -> bool {
    digest(password) == expected
}
