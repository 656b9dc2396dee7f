//! OTP derivation — RFC 4226 (HOTP) and RFC 6238 (TOTP).
//!
//! HMAC over a big-endian counter with dynamic truncation, time-step
//! calculation, remaining-validity math, and drift-tolerant verification.

use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::{Sha256, Sha512};

use crate::types::{Algorithm, OneTimeCode, TotpError, TotpErrorKind, DEFAULT_DIGITS, DEFAULT_PERIOD};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Raw HMAC-OTP (RFC 4226 §5.3)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Compute an HOTP code for raw key bytes and a counter.
pub fn hotp_raw(key: &[u8], counter: u64, digits: u8, algo: Algorithm) -> String {
    let hmac_result = compute_hmac(key, &counter.to_be_bytes(), algo);
    truncate(&hmac_result, digits)
}

/// Compute HMAC(key, message) with the specified algorithm.
fn compute_hmac(key: &[u8], data: &[u8], algo: Algorithm) -> Vec<u8> {
    match algo {
        Algorithm::Sha1 => {
            let mut mac = Hmac::<Sha1>::new_from_slice(key).expect("HMAC accepts any key length");
            mac.update(data);
            mac.finalize().into_bytes().to_vec()
        }
        Algorithm::Sha256 => {
            let mut mac = Hmac::<Sha256>::new_from_slice(key).expect("HMAC accepts any key length");
            mac.update(data);
            mac.finalize().into_bytes().to_vec()
        }
        Algorithm::Sha512 => {
            let mut mac = Hmac::<Sha512>::new_from_slice(key).expect("HMAC accepts any key length");
            mac.update(data);
            mac.finalize().into_bytes().to_vec()
        }
    }
}

/// Dynamic truncation per RFC 4226 §5.3.
fn truncate(hmac_result: &[u8], digits: u8) -> String {
    let offset = (hmac_result[hmac_result.len() - 1] & 0x0f) as usize;
    let binary = ((hmac_result[offset] as u32 & 0x7f) << 24)
        | ((hmac_result[offset + 1] as u32) << 16)
        | ((hmac_result[offset + 2] as u32) << 8)
        | (hmac_result[offset + 3] as u32);
    let modulus = 10u32.pow(digits as u32);
    format!("{:0>width$}", binary % modulus, width = digits as usize)
}

/// Generate an HOTP code from a base-32 encoded secret.
pub fn hotp(secret_b32: &str, counter: u64, digits: u8, algo: Algorithm) -> Result<String, TotpError> {
    let key = decode_secret(secret_b32)?;
    Ok(hotp_raw(&key, counter, digits, algo))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Time-step math (RFC 6238)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Compute the time-step counter for a unix timestamp.
pub fn time_step_at(unix_seconds: u64, period: u32) -> u64 {
    unix_seconds / period as u64
}

/// Seconds remaining in the step containing `unix_seconds`.
///
/// Always in `[1, period]`: exactly `period` at a step boundary.
pub fn seconds_remaining_at(unix_seconds: u64, period: u32) -> u32 {
    let p = period as u64;
    (p - (unix_seconds % p)) as u32
}

/// Current unix timestamp in seconds.
pub fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  TOTP generation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Generate a TOTP code at an explicit unix timestamp with explicit
/// parameters.
pub fn totp_at(
    secret_b32: &str,
    digits: u8,
    period: u32,
    algo: Algorithm,
    unix_seconds: u64,
) -> Result<String, TotpError> {
    hotp(secret_b32, time_step_at(unix_seconds, period), digits, algo)
}

/// Derive the vault's one-time code (6 digits, SHA-1, 30-second step) at an
/// explicit timestamp.
///
/// Pure in (secret, time): two calls within the same step return the same
/// code.
pub fn generate_at(secret_b32: &str, unix_seconds: u64) -> Result<OneTimeCode, TotpError> {
    let code = totp_at(
        secret_b32,
        DEFAULT_DIGITS,
        DEFAULT_PERIOD,
        Algorithm::default(),
        unix_seconds,
    )?;
    Ok(OneTimeCode {
        code,
        remaining_seconds: seconds_remaining_at(unix_seconds, DEFAULT_PERIOD),
    })
}

/// Derive the vault's one-time code at the current wall-clock time.
pub fn generate(secret_b32: &str) -> Result<OneTimeCode, TotpError> {
    generate_at(secret_b32, unix_now())
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Verification
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Verify a candidate code at an explicit timestamp.
///
/// Accepts a code valid within `window` steps either side of the current
/// step. The current step is checked first, then ±1, ±2, … outward,
/// accepting on the first match. The comparison is constant-time.
pub fn verify_at(
    secret_b32: &str,
    candidate: &str,
    unix_seconds: u64,
    window: u32,
) -> Result<bool, TotpError> {
    let key = decode_secret(secret_b32)?;

    if candidate.len() != DEFAULT_DIGITS as usize
        || !candidate.chars().all(|c| c.is_ascii_digit())
    {
        return Ok(false);
    }

    let base = time_step_at(unix_seconds, DEFAULT_PERIOD);
    for counter in spiral_counters(base, window) {
        let expected = hotp_raw(&key, counter, DEFAULT_DIGITS, Algorithm::default());
        if constant_time_eq(expected.as_bytes(), candidate.as_bytes()) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Verify a candidate code against the current wall-clock time.
pub fn verify(secret_b32: &str, candidate: &str, window: u32) -> Result<bool, TotpError> {
    verify_at(secret_b32, candidate, unix_now(), window)
}

/// Counters to try, nearest-first: base, base-1, base+1, base-2, base+2, …
/// Steps before the epoch are skipped.
fn spiral_counters(base: u64, window: u32) -> Vec<u64> {
    let mut counters = vec![base];
    for d in 1..=window as u64 {
        if let Some(earlier) = base.checked_sub(d) {
            counters.push(earlier);
        }
        counters.push(base + d);
    }
    counters
}

/// Constant-time comparison (prevents timing attacks on code verification).
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Secret helpers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Decode a base-32 secret (spaces/dashes tolerated, case-insensitive).
pub fn decode_secret(b32: &str) -> Result<Vec<u8>, TotpError> {
    let cleaned = b32.replace(' ', "").replace('-', "").to_uppercase();
    if cleaned.is_empty() {
        return Err(TotpError::new(TotpErrorKind::InvalidSecret, "empty base-32 secret"));
    }
    let padded = pad_base32(&cleaned);
    base32::decode(base32::Alphabet::Rfc4648 { padding: true }, &padded)
        .or_else(|| base32::decode(base32::Alphabet::Rfc4648 { padding: false }, &cleaned))
        .ok_or_else(|| TotpError::new(TotpErrorKind::InvalidSecret, "invalid base-32 secret"))
}

/// Encode raw bytes to base-32 (no padding, uppercase).
pub fn encode_secret(bytes: &[u8]) -> String {
    base32::encode(base32::Alphabet::Rfc4648 { padding: false }, bytes)
}

/// Generate a cryptographically-random base-32 secret for enrollment.
pub fn generate_secret(byte_length: usize) -> String {
    use rand::RngCore;
    let mut buf = vec![0u8; byte_length];
    rand::thread_rng().fill_bytes(&mut buf);
    encode_secret(&buf)
}

/// Pad a base-32 string to a multiple of 8 with '='.
fn pad_base32(s: &str) -> String {
    let remainder = s.len() % 8;
    if remainder == 0 {
        s.to_string()
    } else {
        format!("{}{}", s, "=".repeat(8 - remainder))
    }
}
