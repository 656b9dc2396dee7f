//! Storage contract and the in-memory reference store.
//!
//! The real persistence layer (a database behind the excluded HTTP app)
//! implements these traits; the services only ever see them. Stores deal in
//! whole records keyed by opaque string ids and know nothing about secret
//! material beyond carrying the ciphertext blob.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::types::{Binding, Page, Platform, VaultError};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Contracts
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Persistence contract for bindings.
#[async_trait]
pub trait BindingStore: Send + Sync {
    /// Load a binding by id.
    async fn load(&self, id: &str) -> Result<Option<Binding>, VaultError>;

    /// Find the binding for a (user, platform, account) triple, if any.
    async fn find_by_account(
        &self,
        user_id: &str,
        platform_id: &str,
        account_name: &str,
    ) -> Result<Option<Binding>, VaultError>;

    /// List a user's bindings, newest first. `page` is 1-based.
    async fn list_by_user(
        &self,
        user_id: &str,
        page: usize,
        limit: usize,
    ) -> Result<Page<Binding>, VaultError>;

    /// Insert or replace a binding.
    async fn save(&self, binding: Binding) -> Result<(), VaultError>;

    /// Delete a binding. Returns `true` if it existed.
    async fn delete(&self, id: &str) -> Result<bool, VaultError>;
}

/// Persistence contract for the platform registry.
#[async_trait]
pub trait PlatformStore: Send + Sync {
    /// Load a platform by id.
    async fn load(&self, id: &str) -> Result<Option<Platform>, VaultError>;

    /// Find a platform by exact name.
    async fn find_by_name(&self, name: &str) -> Result<Option<Platform>, VaultError>;

    /// List platforms, newest first. `page` is 1-based.
    async fn list(&self, page: usize, limit: usize) -> Result<Page<Platform>, VaultError>;

    /// Insert or replace a platform.
    async fn save(&self, platform: Platform) -> Result<(), VaultError>;

    /// Delete a platform. Returns `true` if it existed.
    async fn delete(&self, id: &str) -> Result<bool, VaultError>;
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  In-memory store
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// In-memory store backing tests and local development.
///
/// Each map has its own lock; the services never require cross-record
/// coordination, so there is no lock ordering to worry about.
#[derive(Default)]
pub struct MemoryStore {
    bindings: RwLock<HashMap<String, Binding>>,
    platforms: RwLock<HashMap<String, Platform>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Newest-first, 1-based pagination over an already-filtered set.
fn paginate<T>(mut items: Vec<T>, page: usize, limit: usize, key: impl Fn(&T) -> (chrono::DateTime<chrono::Utc>, String)) -> Page<T> {
    items.sort_by_key(|item| {
        let (created_at, id) = key(item);
        (std::cmp::Reverse(created_at), id)
    });
    let total = items.len();
    let skip = page.saturating_sub(1).saturating_mul(limit);
    let data = items.into_iter().skip(skip).take(limit).collect();
    Page { data, total }
}

#[async_trait]
impl BindingStore for MemoryStore {
    async fn load(&self, id: &str) -> Result<Option<Binding>, VaultError> {
        Ok(self.bindings.read().await.get(id).cloned())
    }

    async fn find_by_account(
        &self,
        user_id: &str,
        platform_id: &str,
        account_name: &str,
    ) -> Result<Option<Binding>, VaultError> {
        Ok(self
            .bindings
            .read()
            .await
            .values()
            .find(|b| {
                b.user_id == user_id
                    && b.platform_id == platform_id
                    && b.account_name == account_name
            })
            .cloned())
    }

    async fn list_by_user(
        &self,
        user_id: &str,
        page: usize,
        limit: usize,
    ) -> Result<Page<Binding>, VaultError> {
        let matching: Vec<Binding> = self
            .bindings
            .read()
            .await
            .values()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        Ok(paginate(matching, page, limit, |b| (b.created_at, b.id.clone())))
    }

    async fn save(&self, binding: Binding) -> Result<(), VaultError> {
        self.bindings
            .write()
            .await
            .insert(binding.id.clone(), binding);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool, VaultError> {
        Ok(self.bindings.write().await.remove(id).is_some())
    }
}

#[async_trait]
impl PlatformStore for MemoryStore {
    async fn load(&self, id: &str) -> Result<Option<Platform>, VaultError> {
        Ok(self.platforms.read().await.get(id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Platform>, VaultError> {
        Ok(self
            .platforms
            .read()
            .await
            .values()
            .find(|p| p.name == name)
            .cloned())
    }

    async fn list(&self, page: usize, limit: usize) -> Result<Page<Platform>, VaultError> {
        let all: Vec<Platform> = self.platforms.read().await.values().cloned().collect();
        Ok(paginate(all, page, limit, |p| (p.created_at, p.id.clone())))
    }

    async fn save(&self, platform: Platform) -> Result<(), VaultError> {
        self.platforms
            .write()
            .await
            .insert(platform.id.clone(), platform);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool, VaultError> {
        Ok(self.platforms.write().await.remove(id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Binding store ────────────────────────────────────────────

    #[tokio::test]
    async fn save_and_load_binding() {
        let store = MemoryStore::new();
        let binding = Binding::new("u1", "p1", "acct", "aa:bb:cc");
        let id = binding.id.clone();
        BindingStore::save(&store, binding).await.unwrap();
        let loaded = BindingStore::load(&store, &id).await.unwrap().unwrap();
        assert_eq!(loaded.account_name, "acct");
    }

    #[tokio::test]
    async fn load_missing_binding_is_none() {
        let store = MemoryStore::new();
        assert!(BindingStore::load(&store, "nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn find_by_account_matches_triple() {
        let store = MemoryStore::new();
        BindingStore::save(&store, Binding::new("u1", "p1", "a", "x"))
            .await
            .unwrap();
        assert!(store.find_by_account("u1", "p1", "a").await.unwrap().is_some());
        assert!(store.find_by_account("u1", "p1", "b").await.unwrap().is_none());
        assert!(store.find_by_account("u2", "p1", "a").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_binding_reports_existence() {
        let store = MemoryStore::new();
        let binding = Binding::new("u1", "p1", "a", "x");
        let id = binding.id.clone();
        BindingStore::save(&store, binding).await.unwrap();
        assert!(BindingStore::delete(&store, &id).await.unwrap());
        assert!(!BindingStore::delete(&store, &id).await.unwrap());
    }

    #[tokio::test]
    async fn list_by_user_filters_and_paginates() {
        let store = MemoryStore::new();
        for i in 0..5 {
            BindingStore::save(&store, Binding::new("u1", "p1", format!("acct{i}"), "x"))
                .await
                .unwrap();
        }
        BindingStore::save(&store, Binding::new("u2", "p1", "other", "x"))
            .await
            .unwrap();

        let page1 = store.list_by_user("u1", 1, 2).await.unwrap();
        assert_eq!(page1.total, 5);
        assert_eq!(page1.data.len(), 2);

        let page3 = store.list_by_user("u1", 3, 2).await.unwrap();
        assert_eq!(page3.data.len(), 1);

        let beyond = store.list_by_user("u1", 4, 2).await.unwrap();
        assert!(beyond.data.is_empty());
        assert_eq!(beyond.total, 5);
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let store = MemoryStore::new();
        let mut older = Binding::new("u1", "p1", "older", "x");
        older.created_at = chrono::Utc::now() - chrono::Duration::minutes(5);
        let newer = Binding::new("u1", "p1", "newer", "x");
        BindingStore::save(&store, older).await.unwrap();
        BindingStore::save(&store, newer).await.unwrap();

        let page = store.list_by_user("u1", 1, 10).await.unwrap();
        assert_eq!(page.data[0].account_name, "newer");
        assert_eq!(page.data[1].account_name, "older");
    }

    // ── Platform store ───────────────────────────────────────────

    #[tokio::test]
    async fn platform_roundtrip_and_name_lookup() {
        let store = MemoryStore::new();
        let platform = Platform::new("GitHub");
        let id = platform.id.clone();
        PlatformStore::save(&store, platform).await.unwrap();

        assert!(PlatformStore::load(&store, &id).await.unwrap().is_some());
        assert!(store.find_by_name("GitHub").await.unwrap().is_some());
        assert!(store.find_by_name("GitLab").await.unwrap().is_none());

        assert!(PlatformStore::delete(&store, &id).await.unwrap());
        assert!(PlatformStore::load(&store, &id).await.unwrap().is_none());
    }
}
