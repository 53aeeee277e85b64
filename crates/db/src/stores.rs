//! Store traits, one per aggregate.
//!
//! Writes are last-write-wins, except where a uniqueness rule applies. Those
//! checks belong to the store so they happen in the same step as the write:
//! an extension is never held twice at one location (`save_phone`,
//! `reserve_extension`) and a phone has at most one approval
//! (`open_phone_approval`).

use async_trait::async_trait;
use serde_json::Value;
use voicestack_core::approval::Approval;
use voicestack_core::device::Phone;
use voicestack_core::extensions::ExtensionSeries;
use voicestack_core::location::{Account, Location, User};
use voicestack_core::onboarding::LocationOnboarding;
use voicestack_core::session::OnboardingSession;

use crate::error::StoreResult;

#[async_trait]
pub trait OnboardingStore: Send + Sync {
    async fn get_onboarding(&self, location_id: &str) -> StoreResult<Option<LocationOnboarding>>;

    /// Shallow-merge `patch` (a JSON object in wire format) over the stored
    /// record, creating it with id `onboarding-<locationId>` when absent.
    /// `updatedAt` is always stamped.
    async fn upsert_onboarding(
        &self,
        location_id: &str,
        patch: Value,
    ) -> StoreResult<LocationOnboarding>;
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get_session(&self, location_id: &str) -> StoreResult<Option<OnboardingSession>>;

    /// Replace the session for its location, stamping `updatedAt`.
    async fn upsert_session(&self, session: OnboardingSession) -> StoreResult<OnboardingSession>;
}

/// Accounts, locations, users and phones.
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    async fn get_location(&self, location_id: &str) -> StoreResult<Option<Location>>;

    async fn get_account(&self, account_id: &str) -> StoreResult<Option<Account>>;

    async fn list_locations_for_account(&self, account_id: &str) -> StoreResult<Vec<Location>>;

    async fn list_users(&self, location_id: &str) -> StoreResult<Vec<User>>;

    /// Phones at a location, in insertion order.
    async fn list_phones(&self, location_id: &str) -> StoreResult<Vec<Phone>>;

    async fn get_phone(&self, phone_id: &str) -> StoreResult<Option<Phone>>;

    /// Insert or replace a phone by id.
    ///
    /// Fails with `Conflict` when another phone at the location already
    /// holds the same extension.
    async fn save_phone(&self, phone: Phone) -> StoreResult<Phone>;
}

#[async_trait]
pub trait ApprovalStore: Send + Sync {
    /// All approvals whose metadata points at `location_id`.
    async fn list_approvals(&self, location_id: &str) -> StoreResult<Vec<Approval>>;

    async fn get_approval(&self, approval_id: &str) -> StoreResult<Option<Approval>>;

    /// Insert or replace an approval by id.
    async fn save_approval(&self, approval: Approval) -> StoreResult<Approval>;

    /// Insert `approval` unless one already exists for its phone, in which
    /// case that one is returned untouched.
    async fn open_phone_approval(&self, approval: Approval) -> StoreResult<Approval>;
}

#[async_trait]
pub trait ExtensionSeriesStore: Send + Sync {
    async fn get_series(&self, location_id: &str) -> StoreResult<Option<ExtensionSeries>>;

    /// Store a series. When one already exists for the location the
    /// reserved lists are unioned.
    async fn upsert_series(&self, series: ExtensionSeries) -> StoreResult<ExtensionSeries>;

    /// Atomically add `extension` to the location's reserved list.
    ///
    /// Fails with `Conflict` when it is already reserved or held by a phone
    /// at the location, and with `NotFound` when the location has no series.
    async fn reserve_extension(
        &self,
        location_id: &str,
        extension: &str,
    ) -> StoreResult<ExtensionSeries>;
}

/// Everything the engine needs from persistence.
pub trait Store:
    OnboardingStore + SessionStore + DirectoryStore + ApprovalStore + ExtensionSeriesStore
{
}

impl<T> Store for T where
    T: OnboardingStore + SessionStore + DirectoryStore + ApprovalStore + ExtensionSeriesStore
{
}
