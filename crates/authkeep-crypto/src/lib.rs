//! # Authkeep – Secret Cipher
//!
//! Authenticated encryption of platform shared secrets:
//!
//! - **AES-256-GCM** – random 96-bit nonce per encryption, 128-bit tag
//! - **Blob format** – `nonce:ciphertext:tag`, lowercase hex, colon-joined
//! - **Master key** – exactly 32 bytes, provisioned once at startup and
//!   zeroized on drop
//!
//! The blob format is a storage contract: field order and separators must
//! not change without a migration of every stored secret.

pub mod cipher;
pub mod error;
pub mod key;

pub use cipher::SecretCipher;
pub use error::{CryptoError, CryptoErrorKind};
pub use key::MasterKey;
