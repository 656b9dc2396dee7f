//! Master-key handling.
//!
//! A single symmetric key protects every stored secret. It is provisioned
//! once at process start from a trusted source (normally the environment)
//! and injected into the cipher — there is no ambient global key state.
//! A missing or short key is a hard startup precondition failure, not a
//! runtime-recoverable error.

use zeroize::Zeroize;

use crate::error::{CryptoError, CryptoErrorKind};

/// AES-256 key length in bytes.
pub const MASTER_KEY_LEN: usize = 32;

/// Server-held master key for the secret cipher.
///
/// The raw bytes are zeroized on drop and never appear in `Debug` output.
pub struct MasterKey([u8; MASTER_KEY_LEN]);

impl MasterKey {
    /// Wrap an exact 32-byte key.
    pub fn from_bytes(bytes: [u8; MASTER_KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Build a key from UTF-8 key material.
    ///
    /// At least 32 bytes are required; longer material is truncated to the
    /// first 32 bytes (the validated bound is the minimum length).
    pub fn from_utf8(material: &str) -> Result<Self, CryptoError> {
        let bytes = material.as_bytes();
        if bytes.len() < MASTER_KEY_LEN {
            return Err(CryptoError::new(
                CryptoErrorKind::Configuration,
                format!(
                    "master key must be at least {} bytes, got {}",
                    MASTER_KEY_LEN,
                    bytes.len()
                ),
            ));
        }
        let mut key = [0u8; MASTER_KEY_LEN];
        key.copy_from_slice(&bytes[..MASTER_KEY_LEN]);
        Ok(Self(key))
    }

    /// Load the key from an environment variable. Absence is fatal.
    pub fn from_env(var: &str) -> Result<Self, CryptoError> {
        let material = std::env::var(var).map_err(|_| {
            CryptoError::new(
                CryptoErrorKind::Configuration,
                format!("{var} environment variable is required"),
            )
        })?;
        Self::from_utf8(&material)
    }

    /// Raw key bytes, for cipher construction only.
    pub(crate) fn as_bytes(&self) -> &[u8; MASTER_KEY_LEN] {
        &self.0
    }
}

impl Drop for MasterKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MasterKey(<redacted>)")
    }
}
