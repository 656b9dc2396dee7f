//! Platform registry — the name-unique catalogue of enrollable platforms.

use std::sync::Arc;

use crate::storage::PlatformStore;
use crate::types::{Page, Platform, VaultError, VaultErrorKind};

/// Registry service for platforms.
pub struct PlatformService {
    store: Arc<dyn PlatformStore>,
}

impl PlatformService {
    pub fn new(store: Arc<dyn PlatformStore>) -> Self {
        Self { store }
    }

    /// Register a platform. Names are unique.
    pub async fn create_platform(&self, name: &str) -> Result<Platform, VaultError> {
        if name.trim().is_empty() {
            return Err(VaultError::new(VaultErrorKind::InvalidInput, "platform name is required"));
        }
        if self.store.find_by_name(name).await?.is_some() {
            return Err(VaultError::new(
                VaultErrorKind::Conflict,
                "a platform with this name already exists",
            ));
        }
        let platform = Platform::new(name);
        self.store.save(platform.clone()).await?;
        log::info!("registered platform {} ({})", platform.name, platform.id);
        Ok(platform)
    }

    /// Fetch a platform by id.
    pub async fn get_platform(&self, id: &str) -> Result<Platform, VaultError> {
        self.store
            .load(id)
            .await?
            .ok_or_else(|| VaultError::new(VaultErrorKind::NotFound, "platform not found"))
    }

    /// List platforms, newest first. `page` is 1-based.
    pub async fn list_platforms(&self, page: usize, limit: usize) -> Result<Page<Platform>, VaultError> {
        self.store.list(page, limit).await
    }

    /// Rename a platform, re-checking name uniqueness.
    pub async fn rename_platform(&self, id: &str, name: &str) -> Result<Platform, VaultError> {
        let mut platform = self.get_platform(id).await?;
        if name != platform.name {
            if self.store.find_by_name(name).await?.is_some() {
                return Err(VaultError::new(
                    VaultErrorKind::Conflict,
                    "a platform with this name already exists",
                ));
            }
            platform.name = name.to_string();
            self.store.save(platform.clone()).await?;
        }
        Ok(platform)
    }

    /// Remove a platform. Strict: a missing id is `NotFound`.
    pub async fn delete_platform(&self, id: &str) -> Result<(), VaultError> {
        self.get_platform(id).await?;
        if !self.store.delete(id).await? {
            return Err(VaultError::new(VaultErrorKind::NotFound, "platform not found"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn new_service() -> PlatformService {
        PlatformService::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn create_and_get() {
        let svc = new_service();
        let platform = svc.create_platform("GitHub").await.unwrap();
        let found = svc.get_platform(&platform.id).await.unwrap();
        assert_eq!(found, platform);
    }

    #[tokio::test]
    async fn duplicate_name_conflicts() {
        let svc = new_service();
        svc.create_platform("GitHub").await.unwrap();
        let err = svc.create_platform("GitHub").await.unwrap_err();
        assert_eq!(err.kind, VaultErrorKind::Conflict);
    }

    #[tokio::test]
    async fn empty_name_rejected() {
        let svc = new_service();
        let err = svc.create_platform("  ").await.unwrap_err();
        assert_eq!(err.kind, VaultErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn rename_checks_uniqueness() {
        let svc = new_service();
        let a = svc.create_platform("GitHub").await.unwrap();
        svc.create_platform("GitLab").await.unwrap();

        let err = svc.rename_platform(&a.id, "GitLab").await.unwrap_err();
        assert_eq!(err.kind, VaultErrorKind::Conflict);

        let renamed = svc.rename_platform(&a.id, "Codeberg").await.unwrap();
        assert_eq!(renamed.name, "Codeberg");
        // renaming to the current name is a no-op, not a conflict
        svc.rename_platform(&a.id, "Codeberg").await.unwrap();
    }

    #[tokio::test]
    async fn delete_is_strict() {
        let svc = new_service();
        let platform = svc.create_platform("GitHub").await.unwrap();
        svc.delete_platform(&platform.id).await.unwrap();
        let err = svc.delete_platform(&platform.id).await.unwrap_err();
        assert_eq!(err.kind, VaultErrorKind::NotFound);
    }

    #[tokio::test]
    async fn list_paginates() {
        let svc = new_service();
        for name in ["A", "B", "C"] {
            svc.create_platform(name).await.unwrap();
        }
        let page = svc.list_platforms(1, 2).await.unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.data.len(), 2);
    }
}
