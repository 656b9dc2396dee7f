//! # Authkeep
//!
//! Two-factor-authentication credential vault. Users enroll platform
//! bindings (account label + shared base-32 secret); secrets are stored
//! AES-256-GCM encrypted under a server-held master key and decrypted only
//! at the moment an RFC 6238 one-time code is derived.
//!
//! The HTTP transport, real persistence drivers, and session handling live
//! outside this workspace — they call into [`Vault`] and implement the
//! storage traits in [`authkeep_vault::storage`].
//!
//! ```no_run
//! use authkeep::{config::VaultConfig, Vault};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! authkeep::init_logging();
//! let vault = Vault::in_memory(VaultConfig::from_env()?);
//!
//! let platform = vault.platforms().create_platform("GitHub").await?;
//! let binding = vault
//!     .bindings()
//!     .create_binding("user-1", &platform.id, "alice@example.com", "JBSWY3DPEHPK3PXP")
//!     .await?;
//! let otp = vault.bindings().generate_code(&binding.id, "user-1").await?;
//! println!("{} (valid {}s)", otp.code, otp.expires_in_seconds);
//! # Ok(())
//! # }
//! ```

pub mod config;

use std::sync::Arc;

use authkeep_crypto::SecretCipher;
use authkeep_vault::{BindingService, PlatformService};

use config::VaultConfig;

pub use authkeep_crypto::{CryptoError, CryptoErrorKind, MasterKey};
pub use authkeep_totp as totp;
pub use authkeep_vault::{
    Binding, BindingStore, BindingSummary, BindingUpdate, GeneratedOtp, MemoryStore, Page,
    Platform, PlatformStore, VaultError, VaultErrorKind, VERIFY_WINDOW,
};

/// Initialise process-wide logging (idempotent).
///
/// Honors `RUST_LOG`; defaults to `info`. `log`-macro records from the
/// crates are bridged into the tracing subscriber.
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// The assembled credential vault.
///
/// Construction is explicit dependency injection: the validated
/// [`VaultConfig`] and the storage implementations go in, the service
/// surface comes out. There is no ambient global key state.
pub struct Vault {
    bindings: BindingService,
    platforms: PlatformService,
}

impl Vault {
    /// Wire the vault against real storage implementations.
    pub fn open(
        config: VaultConfig,
        binding_store: Arc<dyn BindingStore>,
        platform_store: Arc<dyn PlatformStore>,
    ) -> Self {
        let cipher = Arc::new(SecretCipher::new(config.into_master_key()));
        tracing::info!("vault opened");
        Self {
            bindings: BindingService::new(binding_store, cipher),
            platforms: PlatformService::new(platform_store),
        }
    }

    /// Wire the vault against the in-memory reference store (tests, local
    /// development).
    pub fn in_memory(config: VaultConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::open(config, store.clone(), store)
    }

    /// Binding lifecycle operations.
    pub fn bindings(&self) -> &BindingService {
        &self.bindings
    }

    /// Platform registry operations.
    pub fn platforms(&self) -> &PlatformService {
        &self.platforms
    }
}
