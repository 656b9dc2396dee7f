//! Startup configuration.
//!
//! The vault takes one piece of configuration: the master key protecting
//! every stored secret. It is read once from the process environment and
//! handed to [`crate::Vault::open`] as a constructed object — services never
//! reach into the environment themselves.

use authkeep_crypto::{CryptoError, MasterKey};

/// Environment variable holding the master key material (≥ 32 bytes).
pub const MASTER_KEY_ENV: &str = "ENCRYPTION_KEY";

/// Validated startup configuration.
#[derive(Debug)]
pub struct VaultConfig {
    master_key: MasterKey,
}

impl VaultConfig {
    /// Wrap an already-validated master key.
    pub fn new(master_key: MasterKey) -> Self {
        Self { master_key }
    }

    /// Load configuration from the process environment.
    ///
    /// Fails fast with a `Configuration` error if `ENCRYPTION_KEY` is unset
    /// or shorter than 32 bytes — a weaker key would invalidate the
    /// confidentiality of every stored secret, so startup must not proceed.
    pub fn from_env() -> Result<Self, CryptoError> {
        Ok(Self {
            master_key: MasterKey::from_env(MASTER_KEY_ENV)?,
        })
    }

    pub(crate) fn into_master_key(self) -> MasterKey {
        self.master_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use authkeep_crypto::CryptoErrorKind;

    #[test]
    fn from_env_requires_the_variable() {
        std::env::remove_var(MASTER_KEY_ENV);
        let err = VaultConfig::from_env().unwrap_err();
        assert_eq!(err.kind, CryptoErrorKind::Configuration);
    }

    #[test]
    fn debug_never_prints_key_material() {
        let config = VaultConfig::new(
            MasterKey::from_utf8("an-absolutely-secret-master-key!").unwrap(),
        );
        let dbg = format!("{config:?}");
        assert!(!dbg.contains("absolutely"));
    }
}
