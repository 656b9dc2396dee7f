//! Binding lifecycle service — the caller-facing operation surface.
//!
//! Enforces ownership and uniqueness around the encrypted record,
//! independent of storage technology. Decryption happens only at the moment
//! a code is generated or verified; the decrypted secret never leaves this
//! module and is never logged.

use std::sync::Arc;

use authkeep_crypto::SecretCipher;
use authkeep_totp as totp;

use crate::storage::BindingStore;
use crate::types::{
    Binding, BindingSummary, BindingUpdate, GeneratedOtp, Page, VaultError, VaultErrorKind,
};

/// Default verification drift window: ±1 step (≈90 s clock-skew tolerance).
pub const VERIFY_WINDOW: u32 = 1;

/// Central binding service.
///
/// Takes `&self` everywhere — the only cross-request state is the immutable
/// cipher key, so concurrent calls need no mutual exclusion.
pub struct BindingService {
    store: Arc<dyn BindingStore>,
    cipher: Arc<SecretCipher>,
}

impl BindingService {
    pub fn new(store: Arc<dyn BindingStore>, cipher: Arc<SecretCipher>) -> Self {
        Self { store, cipher }
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    //  Create
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Enroll a new binding. The raw secret is validated as base-32,
    /// encrypted, and persisted; secret material is never returned.
    pub async fn create_binding(
        &self,
        user_id: &str,
        platform_id: &str,
        account_name: &str,
        raw_secret: &str,
    ) -> Result<BindingSummary, VaultError> {
        if user_id.is_empty() {
            return Err(VaultError::new(VaultErrorKind::InvalidInput, "user id is required"));
        }

        totp::decode_secret(raw_secret)
            .map_err(|e| VaultError::new(VaultErrorKind::InvalidSecret, e.message))?;

        if self
            .store
            .find_by_account(user_id, platform_id, account_name)
            .await?
            .is_some()
        {
            return Err(VaultError::new(
                VaultErrorKind::Conflict,
                "a binding for this platform and account already exists",
            ));
        }

        let encrypted = self.encrypt_secret(raw_secret)?;
        let binding = Binding::new(user_id, platform_id, account_name, encrypted);
        let summary = binding.summary();
        self.store.save(binding).await?;
        log::info!("created binding {} for user {}", summary.id, user_id);
        Ok(summary)
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    //  Read
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Fetch a single binding, ownership-checked.
    pub async fn get_binding(&self, id: &str, user_id: &str) -> Result<BindingSummary, VaultError> {
        Ok(self.load_owned(id, user_id).await?.summary())
    }

    /// List a user's bindings, newest first. `page` is 1-based.
    pub async fn list_bindings(
        &self,
        user_id: &str,
        page: usize,
        limit: usize,
    ) -> Result<Page<BindingSummary>, VaultError> {
        let records = self.store.list_by_user(user_id, page, limit).await?;
        Ok(Page {
            data: records.data.iter().map(Binding::summary).collect(),
            total: records.total,
        })
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    //  Update / delete
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Rename the account and/or rotate the secret.
    ///
    /// Rotation re-encrypts with a fresh nonce; the old ciphertext is
    /// discarded, never retained for rollback.
    pub async fn update_binding(
        &self,
        id: &str,
        user_id: &str,
        update: BindingUpdate,
    ) -> Result<BindingSummary, VaultError> {
        let mut binding = self.load_owned(id, user_id).await?;

        if let Some(account_name) = update.account_name {
            if account_name != binding.account_name {
                if let Some(existing) = self
                    .store
                    .find_by_account(user_id, &binding.platform_id, &account_name)
                    .await?
                {
                    if existing.id != binding.id {
                        return Err(VaultError::new(
                            VaultErrorKind::Conflict,
                            "a binding for this platform and account already exists",
                        ));
                    }
                }
                binding.account_name = account_name;
            }
        }

        if let Some(raw_secret) = update.raw_secret {
            totp::decode_secret(&raw_secret)
                .map_err(|e| VaultError::new(VaultErrorKind::InvalidSecret, e.message))?;
            binding.encrypted_secret = self.encrypt_secret(&raw_secret)?;
        }

        binding.touch();
        let summary = binding.summary();
        self.store.save(binding).await?;
        Ok(summary)
    }

    /// Delete a binding, ownership-checked. Strict: a missing id is
    /// `NotFound`, never a silent success.
    pub async fn delete_binding(&self, id: &str, user_id: &str) -> Result<(), VaultError> {
        self.load_owned(id, user_id).await?;
        if !self.store.delete(id).await? {
            return Err(VaultError::new(VaultErrorKind::NotFound, "binding not found"));
        }
        log::info!("deleted binding {id} for user {user_id}");
        Ok(())
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    //  Code generation / verification
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Derive the current one-time code for a binding.
    pub async fn generate_code(&self, id: &str, user_id: &str) -> Result<GeneratedOtp, VaultError> {
        self.generate_code_at(id, user_id, totp::unix_now()).await
    }

    /// Derive the one-time code at an explicit timestamp.
    pub async fn generate_code_at(
        &self,
        id: &str,
        user_id: &str,
        unix_seconds: u64,
    ) -> Result<GeneratedOtp, VaultError> {
        let binding = self.load_owned(id, user_id).await?;
        let secret = self.decrypt_secret(&binding)?;
        let otc = totp::generate_at(&secret, unix_seconds)
            .map_err(|e| VaultError::new(VaultErrorKind::InvalidSecret, e.message))?;
        Ok(GeneratedOtp {
            code: otc.code,
            expires_in_seconds: otc.remaining_seconds,
        })
    }

    /// Check a candidate code against the binding's secret, with the default
    /// ±1-step drift window.
    pub async fn verify_code(
        &self,
        id: &str,
        user_id: &str,
        candidate: &str,
    ) -> Result<bool, VaultError> {
        self.verify_code_at(id, user_id, candidate, totp::unix_now(), VERIFY_WINDOW)
            .await
    }

    /// Check a candidate code at an explicit timestamp and window.
    pub async fn verify_code_at(
        &self,
        id: &str,
        user_id: &str,
        candidate: &str,
        unix_seconds: u64,
        window: u32,
    ) -> Result<bool, VaultError> {
        let binding = self.load_owned(id, user_id).await?;
        let secret = self.decrypt_secret(&binding)?;
        totp::verify_at(&secret, candidate, unix_seconds, window)
            .map_err(|e| VaultError::new(VaultErrorKind::InvalidSecret, e.message))
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    //  Internal
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// The mandatory ownership gate: `NotFound` before `Forbidden`, both
    /// before any mutation or secret exposure.
    async fn load_owned(&self, id: &str, user_id: &str) -> Result<Binding, VaultError> {
        let binding = self
            .store
            .load(id)
            .await?
            .ok_or_else(|| VaultError::new(VaultErrorKind::NotFound, "binding not found"))?;
        if binding.user_id != user_id {
            return Err(VaultError::new(
                VaultErrorKind::Forbidden,
                "you do not have access to this binding",
            ));
        }
        Ok(binding)
    }

    fn encrypt_secret(&self, raw_secret: &str) -> Result<String, VaultError> {
        self.cipher.encrypt(raw_secret).map_err(|e| {
            log::warn!("secret encryption failed: {:?}", e.kind);
            VaultError::new(VaultErrorKind::OperationFailed, "operation failed")
        })
    }

    /// Decrypt a binding's secret. Format and integrity failures collapse
    /// into one opaque caller-visible error so a caller cannot probe which
    /// one occurred; the kind is logged server-side with the binding id
    /// only, never the blob.
    fn decrypt_secret(&self, binding: &Binding) -> Result<String, VaultError> {
        self.cipher.decrypt(&binding.encrypted_secret).map_err(|e| {
            log::warn!(
                "secret decrypt failed for binding {}: {:?}",
                binding.id,
                e.kind
            );
            VaultError::new(VaultErrorKind::OperationFailed, "operation failed")
        })
    }
}
