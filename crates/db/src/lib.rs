//! Store interface for onboarding data plus an in-memory implementation.
//!
//! Services depend on the traits in [`stores`] only. [`InMemoryStore`]
//! backs tests and the provisioner binary; a database-backed store would
//! implement the same traits.

pub mod error;
pub mod memory;
pub mod snapshot;
pub mod stores;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryStore;
pub use snapshot::Snapshot;
pub use stores::{
    ApprovalStore, DirectoryStore, ExtensionSeriesStore, OnboardingStore, SessionStore, Store,
};
