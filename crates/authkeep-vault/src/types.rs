//! Core types for the binding lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Binding
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A user's enrollment of a shared secret for a platform, as stored.
///
/// `encrypted_secret` is the opaque `nonce:ciphertext:tag` blob produced by
/// the secret cipher; nothing outside the cipher interprets it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Binding {
    /// Unique identifier, assigned at creation.
    pub id: String,
    /// Owning user; immutable after creation.
    pub user_id: String,
    /// Platform this secret belongs to.
    pub platform_id: String,
    /// Human-readable account label, unique within (user, platform).
    pub account_name: String,
    /// Cipher-produced blob. Never returned to callers.
    pub encrypted_secret: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Binding {
    /// Create a binding around an already-encrypted secret.
    pub fn new(
        user_id: impl Into<String>,
        platform_id: impl Into<String>,
        account_name: impl Into<String>,
        encrypted_secret: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            platform_id: platform_id.into(),
            account_name: account_name.into(),
            encrypted_secret: encrypted_secret.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Bump `updated_at` after a mutation.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Caller-facing projection without the ciphertext.
    pub fn summary(&self) -> BindingSummary {
        BindingSummary {
            id: self.id.clone(),
            user_id: self.user_id.clone(),
            platform_id: self.platform_id.clone(),
            account_name: self.account_name.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// What callers see of a binding — everything but the secret material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingSummary {
    pub id: String,
    pub user_id: String,
    pub platform_id: String,
    pub account_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update for a binding. `raw_secret` triggers re-encryption with a
/// fresh nonce; the old ciphertext is discarded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingUpdate {
    pub account_name: Option<String>,
    pub raw_secret: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Platform
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// An enrollable platform. Name only — platforms carry no behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Platform {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Platform {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Results
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A derived one-time code as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedOtp {
    /// Fixed-width numeric code.
    pub code: String,
    /// Seconds until the code expires, in `[1, 30]`.
    pub expires_in_seconds: u32,
}

/// One page of a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    /// Total matching records across all pages.
    pub total: usize,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Error type
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Error kind for this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VaultErrorKind {
    /// Binding or platform does not exist.
    NotFound,
    /// Caller does not own the record.
    Forbidden,
    /// Uniqueness rule violated.
    Conflict,
    /// Required input missing or empty.
    InvalidInput,
    /// Secret is not well-formed base-32.
    InvalidSecret,
    /// Opaque cryptographic failure. The caller never learns whether the
    /// stored blob was malformed or failed integrity verification.
    OperationFailed,
    /// Backing store failure.
    Storage,
}

/// Crate-level error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultError {
    pub kind: VaultErrorKind,
    pub message: String,
    pub detail: Option<String>,
}

impl fmt::Display for VaultError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.kind, self.message)?;
        if let Some(d) = &self.detail {
            write!(f, " ({d})")?;
        }
        Ok(())
    }
}

impl std::error::Error for VaultError {}

impl VaultError {
    pub fn new(kind: VaultErrorKind, msg: impl Into<String>) -> Self {
        Self {
            kind,
            message: msg.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Binding ──────────────────────────────────────────────────

    #[test]
    fn binding_new_assigns_id_and_timestamps() {
        let b = Binding::new("u1", "p1", "alice@example.com", "aa:bb:cc");
        assert!(!b.id.is_empty());
        assert_eq!(b.created_at, b.updated_at);
        assert_eq!(b.account_name, "alice@example.com");
    }

    #[test]
    fn binding_ids_are_unique() {
        let a = Binding::new("u", "p", "a", "x");
        let b = Binding::new("u", "p", "a", "x");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn summary_omits_secret_material() {
        let b = Binding::new("u1", "p1", "acct", "aa:bb:cc");
        let json = serde_json::to_string(&b.summary()).unwrap();
        assert!(!json.contains("aa:bb:cc"));
        assert!(!json.contains("encryptedSecret"));
        assert!(json.contains("accountName"));
    }

    #[test]
    fn binding_serde_uses_camel_case() {
        let b = Binding::new("u1", "p1", "acct", "aa:bb:cc");
        let json = serde_json::to_string(&b).unwrap();
        assert!(json.contains("userId"));
        assert!(json.contains("platformId"));
        assert!(json.contains("createdAt"));
    }

    // ── Platform ─────────────────────────────────────────────────

    #[test]
    fn platform_new() {
        let p = Platform::new("GitHub");
        assert_eq!(p.name, "GitHub");
        assert!(!p.id.is_empty());
    }

    // ── GeneratedOtp ─────────────────────────────────────────────

    #[test]
    fn generated_otp_serde() {
        let otp = GeneratedOtp {
            code: "123456".into(),
            expires_in_seconds: 21,
        };
        let json = serde_json::to_string(&otp).unwrap();
        assert!(json.contains("expiresInSeconds"));
        let back: GeneratedOtp = serde_json::from_str(&json).unwrap();
        assert_eq!(back, otp);
    }

    // ── Error ────────────────────────────────────────────────────

    #[test]
    fn error_display_includes_detail() {
        let err = VaultError::new(VaultErrorKind::Conflict, "already exists")
            .with_detail("account 'x'");
        let s = err.to_string();
        assert!(s.contains("Conflict"));
        assert!(s.contains("account 'x'"));
    }
}
