//! Error type for the secret cipher.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error kind for this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CryptoErrorKind {
    /// Master key missing or too short at startup. Fatal.
    Configuration,
    /// Blob does not parse into the expected `nonce:ciphertext:tag` layout.
    Format,
    /// Authentication tag did not verify — tampered blob, wrong key, or
    /// corrupted data. No plaintext is ever returned on this path.
    Integrity,
}

/// Crate-level error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CryptoError {
    pub kind: CryptoErrorKind,
    pub message: String,
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.kind, self.message)
    }
}

impl std::error::Error for CryptoError {}

impl CryptoError {
    pub fn new(kind: CryptoErrorKind, msg: impl Into<String>) -> Self {
        Self {
            kind,
            message: msg.into(),
        }
    }
}
