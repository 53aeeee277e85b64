//! Shared fixtures for engine integration tests.
//!
//! Every test gets a fresh [`InMemoryStore`] seeded with account `A1`,
//! location `L1` and user `U1`, and an [`Engine`] running on a fixed clock.
//! [`WrappedStore`] sits in front of the in-memory store when a test needs
//! reads to fail or to yield to the scheduler.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use voicestack_core::approval::Approval;
use voicestack_core::device::{AssignmentType, Phone, PhoneOwnership};
use voicestack_core::extensions::ExtensionSeries;
use voicestack_core::location::{Account, Address, Location, User};
use voicestack_core::onboarding::LocationOnboarding;
use voicestack_core::session::{EditAuthority, OnboardingSession, OnboardingStep};
use voicestack_core::types::{FixedClock, Timestamp};
use voicestack_db::{
    ApprovalStore, DirectoryStore, ExtensionSeriesStore, InMemoryStore, OnboardingStore,
    SessionStore, StoreError, StoreResult,
};
use voicestack_engine::{Engine, EngineConfig};

pub const ACCOUNT: &str = "A1";
pub const LOCATION: &str = "L1";
pub const USER: &str = "U1";

pub fn now() -> Timestamp {
    Utc.with_ymd_and_hms(2026, 6, 1, 14, 0, 0).unwrap()
}

pub struct TestEnv {
    pub engine: Engine,
    pub store: Arc<InMemoryStore>,
}

pub async fn setup() -> TestEnv {
    let clock = Arc::new(FixedClock(now()));
    let store = Arc::new(InMemoryStore::new(clock.clone()));
    seed(&store).await;

    let engine = Engine::new(store.clone(), clock, EngineConfig::default());
    TestEnv { engine, store }
}

/// Like [`setup`], but every read the engine makes yields to the scheduler
/// before returning, so concurrent operations interleave between their
/// reads and writes. `store` is the in-memory store behind the wrapper.
pub async fn setup_yielding() -> TestEnv {
    let clock = Arc::new(FixedClock(now()));
    let store = Arc::new(InMemoryStore::new(clock.clone()));
    seed(&store).await;

    let wrapped = Arc::new(WrappedStore {
        inner: store.clone(),
        broken_phones_at: None,
        yield_after_reads: true,
    });
    let engine = Engine::new(wrapped, clock, EngineConfig::default());
    TestEnv { engine, store }
}

/// Account `A1`, location `L1` and user `U1`.
pub async fn seed(store: &InMemoryStore) {
    store
        .insert_account(Account {
            id: ACCOUNT.into(),
            name: "Bright Smiles Dental".into(),
        })
        .await;
    store.insert_location(location(LOCATION, "Downtown Clinic")).await;
    store
        .insert_user(User {
            id: USER.into(),
            location_id: Some(LOCATION.into()),
            first_name: "Jordan".into(),
            last_name: "Reyes".into(),
            email: "jordan@brightsmiles.example".into(),
            phone: None,
        })
        .await;
}

pub fn location(id: &str, name: &str) -> Location {
    Location {
        id: id.into(),
        account_id: ACCOUNT.into(),
        name: name.into(),
        address: Address {
            line1: "12 Main St".into(),
            line2: None,
            city: "Austin".into(),
            state: "TX".into(),
            zipcode: "78701".into(),
        },
        customer_id: None,
    }
}

/// A supported desk phone for `U1`. The id is left blank so the engine
/// assigns one.
pub fn yealink_for_user(extension: &str) -> Phone {
    Phone {
        id: String::new(),
        location_id: LOCATION.into(),
        brand: "YEALINK".into(),
        model: "T46S".into(),
        ownership: PhoneOwnership::Owned,
        assignment_type: AssignmentType::AssignedToUser,
        assigned_user_id: Some(USER.into()),
        extension: Some(extension.into()),
        device_types: vec!["DESK".into()],
        ..Default::default()
    }
}

/// Answers that pass every submission rule once a supported phone exists.
pub fn complete_answers() -> Value {
    json!({
        "pocName": "Jordan Reyes",
        "pocEmail": "jordan@brightsmiles.example",
        "pocPhone": "512-555-0100",
        "preferredContactMedium": "EMAIL",
        "phoneSystemType": "VOIP",
        "voipType": "RingCentral",
        "usesFax": false,
        "wantsFaxInVoiceStack": false,
        "deviceOwnership": "OWNED",
        "hasYealinkOrPolycom": true,
        "timezone": "America/Chicago",
        "workingHours": [
            { "day": "MONDAY", "isOpen": true, "shifts": [{ "openTime": "08:00", "closeTime": "17:00" }] },
            { "day": "SUNDAY", "isOpen": false }
        ],
        "hasIVR": false,
        "greetingMessage": "Thanks for calling Bright Smiles",
        "directRingUsers": [USER],
        "voicemailScript": "Please leave a message",
        "usesCallQueue": false
    })
}

/// Fill in the questionnaire and add one supported phone.
pub async fn fill_location(env: &TestEnv) {
    env.engine
        .sessions
        .update_onboarding(LOCATION, complete_answers(), EditAuthority::Standard)
        .await
        .unwrap();
    env.engine
        .devices
        .save_phone(yealink_for_user("1001"))
        .await
        .unwrap();
}

/// Walk the wizard through every step up to review.
pub async fn complete_required_steps(env: &TestEnv) {
    for step in OnboardingStep::required_for_submission() {
        env.engine
            .sessions
            .complete_step(LOCATION, step)
            .await
            .unwrap();
    }
}

// ---------------------------------------------------------------------------
// Store wrapper
// ---------------------------------------------------------------------------

pub struct WrappedStore {
    pub inner: Arc<InMemoryStore>,
    /// Phone listings for this location fail with `Conflict`.
    pub broken_phones_at: Option<&'static str>,
    pub yield_after_reads: bool,
}

impl WrappedStore {
    async fn after_read<T>(&self, result: StoreResult<T>) -> StoreResult<T> {
        if self.yield_after_reads {
            tokio::task::yield_now().await;
        }
        result
    }
}

#[async_trait]
impl OnboardingStore for WrappedStore {
    async fn get_onboarding(&self, location_id: &str) -> StoreResult<Option<LocationOnboarding>> {
        self.after_read(self.inner.get_onboarding(location_id).await).await
    }

    async fn upsert_onboarding(
        &self,
        location_id: &str,
        patch: Value,
    ) -> StoreResult<LocationOnboarding> {
        self.inner.upsert_onboarding(location_id, patch).await
    }
}

#[async_trait]
impl SessionStore for WrappedStore {
    async fn get_session(&self, location_id: &str) -> StoreResult<Option<OnboardingSession>> {
        self.after_read(self.inner.get_session(location_id).await).await
    }

    async fn upsert_session(&self, session: OnboardingSession) -> StoreResult<OnboardingSession> {
        self.inner.upsert_session(session).await
    }
}

#[async_trait]
impl DirectoryStore for WrappedStore {
    async fn get_location(&self, location_id: &str) -> StoreResult<Option<Location>> {
        self.after_read(self.inner.get_location(location_id).await).await
    }

    async fn get_account(&self, account_id: &str) -> StoreResult<Option<Account>> {
        self.after_read(self.inner.get_account(account_id).await).await
    }

    async fn list_locations_for_account(&self, account_id: &str) -> StoreResult<Vec<Location>> {
        self.after_read(self.inner.list_locations_for_account(account_id).await)
            .await
    }

    async fn list_users(&self, location_id: &str) -> StoreResult<Vec<User>> {
        self.after_read(self.inner.list_users(location_id).await).await
    }

    async fn list_phones(&self, location_id: &str) -> StoreResult<Vec<Phone>> {
        if self.broken_phones_at == Some(location_id) {
            return Err(StoreError::Conflict("phone table unavailable".into()));
        }
        self.after_read(self.inner.list_phones(location_id).await).await
    }

    async fn get_phone(&self, phone_id: &str) -> StoreResult<Option<Phone>> {
        self.after_read(self.inner.get_phone(phone_id).await).await
    }

    async fn save_phone(&self, phone: Phone) -> StoreResult<Phone> {
        self.inner.save_phone(phone).await
    }
}

#[async_trait]
impl ApprovalStore for WrappedStore {
    async fn list_approvals(&self, location_id: &str) -> StoreResult<Vec<Approval>> {
        self.after_read(self.inner.list_approvals(location_id).await).await
    }

    async fn get_approval(&self, approval_id: &str) -> StoreResult<Option<Approval>> {
        self.after_read(self.inner.get_approval(approval_id).await).await
    }

    async fn save_approval(&self, approval: Approval) -> StoreResult<Approval> {
        self.inner.save_approval(approval).await
    }

    async fn open_phone_approval(&self, approval: Approval) -> StoreResult<Approval> {
        self.inner.open_phone_approval(approval).await
    }
}

#[async_trait]
impl ExtensionSeriesStore for WrappedStore {
    async fn get_series(&self, location_id: &str) -> StoreResult<Option<ExtensionSeries>> {
        self.after_read(self.inner.get_series(location_id).await).await
    }

    async fn upsert_series(&self, series: ExtensionSeries) -> StoreResult<ExtensionSeries> {
        self.inner.upsert_series(series).await
    }

    async fn reserve_extension(
        &self,
        location_id: &str,
        extension: &str,
    ) -> StoreResult<ExtensionSeries> {
        self.inner.reserve_extension(location_id, extension).await
    }
}
