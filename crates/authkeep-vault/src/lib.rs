//! # Authkeep – Binding Lifecycle
//!
//! The storage-facing half of the credential vault:
//!
//! - **Bindings** – a user's enrollment of a shared secret for a platform,
//!   stored encrypted, unique per (user, platform, account)
//! - **Ownership** – every read, write, delete, and code generation verifies
//!   the caller owns the binding before touching secret material
//! - **Platform registry** – name-unique catalogue of enrollable platforms
//! - **Storage contract** – async traits the real persistence layer
//!   implements, plus an in-memory reference store for tests
//!
//! Decryption happens only inside [`bindings::BindingService::generate_code`]
//! and [`bindings::BindingService::verify_code`]; decrypted secrets never
//! leave the service and are never logged.

pub mod bindings;
pub mod platforms;
pub mod storage;
pub mod types;

pub use bindings::{BindingService, VERIFY_WINDOW};
pub use platforms::PlatformService;
pub use storage::{BindingStore, MemoryStore, PlatformStore};
pub use types::{
    Binding, BindingSummary, BindingUpdate, GeneratedOtp, Page, Platform, VaultError,
    VaultErrorKind,
};
