//! AES-256-GCM secret cipher.
//!
//! Turns a raw secret string into an opaque, storage-safe blob and back.
//! Every encryption draws a fresh random 96-bit nonce; the 128-bit GCM tag
//! proves integrity and that the same key decrypts the blob.
//!
//! Blob layout: `nonce:ciphertext:tag`, each segment lowercase hex. The
//! AEAD implementation appends the tag to the ciphertext, so the writer
//! splits it off into its own segment and the reader re-joins them.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Key, Nonce,
};
use rand::RngCore;

use crate::error::{CryptoError, CryptoErrorKind};
use crate::key::MasterKey;

/// AES-GCM nonce length in bytes.
pub const NONCE_LEN: usize = 12;
/// AES-GCM authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

/// Authenticated cipher over the server-held master key.
///
/// Construct once at startup and share by reference; all methods take
/// `&self` and the key schedule is immutable.
pub struct SecretCipher {
    cipher: Aes256Gcm,
}

impl SecretCipher {
    /// Build the cipher, consuming the master key.
    ///
    /// The key bytes are expanded into the AES key schedule here; the
    /// `MasterKey` wrapper zeroizes its copy on drop.
    pub fn new(master_key: MasterKey) -> Self {
        let key = Key::<Aes256Gcm>::from_slice(master_key.as_bytes());
        Self {
            cipher: Aes256Gcm::new(key),
        }
    }

    /// Encrypt a raw secret into a `nonce:ciphertext:tag` hex blob.
    pub fn encrypt(&self, secret: &str) -> Result<String, CryptoError> {
        let nonce_bytes = generate_nonce();
        let nonce = Nonce::from_slice(&nonce_bytes);
        let sealed = self
            .cipher
            .encrypt(nonce, secret.as_bytes())
            .map_err(|_| CryptoError::new(CryptoErrorKind::Integrity, "AES-GCM encryption failed"))?;

        // `sealed` is ciphertext || tag
        let tag_start = sealed.len() - TAG_LEN;
        Ok(format!(
            "{}:{}:{}",
            hex::encode(nonce_bytes),
            hex::encode(&sealed[..tag_start]),
            hex::encode(&sealed[tag_start..])
        ))
    }

    /// Decrypt a `nonce:ciphertext:tag` hex blob back to the raw secret.
    ///
    /// Fails with a `Format` error if the blob does not parse into exactly
    /// three hex segments with a 12-byte nonce and 16-byte tag, and with an
    /// `Integrity` error if the tag does not verify. No partial plaintext is
    /// ever returned.
    pub fn decrypt(&self, blob: &str) -> Result<String, CryptoError> {
        let (nonce_bytes, ciphertext, tag) = parse_blob(blob)?;

        let mut sealed = ciphertext;
        sealed.extend_from_slice(&tag);

        let nonce = Nonce::from_slice(&nonce_bytes);
        let plaintext = self
            .cipher
            .decrypt(nonce, sealed.as_slice())
            .map_err(|_| CryptoError::new(CryptoErrorKind::Integrity, "authentication tag mismatch"))?;

        String::from_utf8(plaintext)
            .map_err(|_| CryptoError::new(CryptoErrorKind::Integrity, "decrypted secret is not UTF-8"))
    }
}

/// Split and hex-decode a blob into (nonce, ciphertext, tag).
fn parse_blob(blob: &str) -> Result<([u8; NONCE_LEN], Vec<u8>, Vec<u8>), CryptoError> {
    let segments: Vec<&str> = blob.split(':').collect();
    if segments.len() != 3 {
        return Err(CryptoError::new(
            CryptoErrorKind::Format,
            format!("expected 3 blob segments, got {}", segments.len()),
        ));
    }

    let decode = |segment: &str, name: &str| {
        hex::decode(segment).map_err(|_| {
            CryptoError::new(CryptoErrorKind::Format, format!("{name} segment is not valid hex"))
        })
    };

    let nonce_vec = decode(segments[0], "nonce")?;
    let ciphertext = decode(segments[1], "ciphertext")?;
    let tag = decode(segments[2], "tag")?;

    if nonce_vec.len() != NONCE_LEN {
        return Err(CryptoError::new(
            CryptoErrorKind::Format,
            format!("nonce length {} != expected {}", nonce_vec.len(), NONCE_LEN),
        ));
    }
    if tag.len() != TAG_LEN {
        return Err(CryptoError::new(
            CryptoErrorKind::Format,
            format!("tag length {} != expected {}", tag.len(), TAG_LEN),
        ));
    }

    let mut nonce = [0u8; NONCE_LEN];
    nonce.copy_from_slice(&nonce_vec);
    Ok((nonce, ciphertext, tag))
}

/// Generate a cryptographically random nonce for AES-GCM.
fn generate_nonce() -> [u8; NONCE_LEN] {
    let mut nonce = [0u8; NONCE_LEN];
    rand::thread_rng().fill_bytes(&mut nonce);
    nonce
}
