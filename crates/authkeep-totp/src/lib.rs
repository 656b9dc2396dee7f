//! # Authkeep – OTP Engine
//!
//! Deterministic one-time-password derivation:
//!
//! - **RFC 4226** – HOTP with SHA-1, SHA-256, SHA-512 and dynamic truncation
//! - **RFC 6238** – TOTP over a 30-second time step, with remaining-validity
//!   reporting
//! - **Verification** – drift-window search, current step first then
//!   spiralling outward, constant-time code comparison
//!
//! The engine is a pure computation over (secret, time): it holds no state,
//! performs no I/O, and never retries. Its one fallible precondition is a
//! well-formed base-32 secret.

pub mod engine;
pub mod types;

pub use engine::{
    decode_secret, encode_secret, generate, generate_at, generate_secret, seconds_remaining_at,
    time_step_at, unix_now, verify, verify_at,
};
pub use types::{Algorithm, OneTimeCode, TotpError, TotpErrorKind, DEFAULT_DIGITS, DEFAULT_PERIOD};
