//! In-memory store.
//!
//! All data sits behind a single [`RwLock`], so every trait method is atomic
//! with respect to every other one. Uniqueness checks run under the same
//! write guard as the insert they protect. Reads return clones.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use voicestack_core::approval::Approval;
use voicestack_core::device::Phone;
use voicestack_core::extensions::ExtensionSeries;
use voicestack_core::location::{Account, Location, User};
use voicestack_core::onboarding::LocationOnboarding;
use voicestack_core::session::OnboardingSession;
use voicestack_core::types::{Clock, EntityId, SystemClock};

use crate::error::{StoreError, StoreResult};
use crate::snapshot::Snapshot;
use crate::stores::{
    ApprovalStore, DirectoryStore, ExtensionSeriesStore, OnboardingStore, SessionStore,
};

#[derive(Default)]
struct State {
    accounts: HashMap<EntityId, Account>,
    locations: Vec<Location>,
    users: Vec<User>,
    phones: Vec<Phone>,
    onboardings: HashMap<EntityId, LocationOnboarding>,
    sessions: HashMap<EntityId, OnboardingSession>,
    approvals: Vec<Approval>,
    series: HashMap<EntityId, ExtensionSeries>,
}

impl From<Snapshot> for State {
    fn from(snapshot: Snapshot) -> Self {
        Self {
            accounts: snapshot
                .accounts
                .into_iter()
                .map(|a| (a.id.clone(), a))
                .collect(),
            locations: snapshot.locations,
            users: snapshot.users,
            phones: snapshot.phones,
            onboardings: snapshot
                .onboardings
                .into_iter()
                .map(|o| (o.location_id.clone(), o))
                .collect(),
            sessions: snapshot
                .sessions
                .into_iter()
                .map(|s| (s.location_id.clone(), s))
                .collect(),
            approvals: snapshot.approvals,
            series: snapshot
                .extension_series
                .into_iter()
                .map(|s| (s.location_id.clone(), s))
                .collect(),
        }
    }
}

pub struct InMemoryStore {
    state: RwLock<State>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl InMemoryStore {
    /// An empty store stamping times from `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: RwLock::new(State::default()),
            clock,
        }
    }

    pub fn from_snapshot(snapshot: Snapshot, clock: Arc<dyn Clock>) -> Self {
        tracing::debug!(
            locations = snapshot.locations.len(),
            phones = snapshot.phones.len(),
            onboardings = snapshot.onboardings.len(),
            "Seeding in-memory store",
        );
        Self {
            state: RwLock::new(State::from(snapshot)),
            clock,
        }
    }

    pub async fn insert_account(&self, account: Account) {
        self.state
            .write()
            .await
            .accounts
            .insert(account.id.clone(), account);
    }

    pub async fn insert_location(&self, location: Location) {
        let mut state = self.state.write().await;
        state.locations.retain(|l| l.id != location.id);
        state.locations.push(location);
    }

    pub async fn insert_user(&self, user: User) {
        let mut state = self.state.write().await;
        state.users.retain(|u| u.id != user.id);
        state.users.push(user);
    }
}

#[async_trait]
impl OnboardingStore for InMemoryStore {
    async fn get_onboarding(&self, location_id: &str) -> StoreResult<Option<LocationOnboarding>> {
        Ok(self.state.read().await.onboardings.get(location_id).cloned())
    }

    async fn upsert_onboarding(
        &self,
        location_id: &str,
        patch: Value,
    ) -> StoreResult<LocationOnboarding> {
        let Value::Object(patch) = patch else {
            return Err(StoreError::InvalidPatch(
                "onboarding patch must be a JSON object".to_string(),
            ));
        };
        let now = self.clock.now();

        let mut state = self.state.write().await;
        let current = state
            .onboardings
            .get(location_id)
            .cloned()
            .unwrap_or_else(|| LocationOnboarding::new(location_id, now));
        let id = current.id.clone();

        let Value::Object(mut merged) = serde_json::to_value(&current)? else {
            return Err(StoreError::InvalidPatch(
                "stored onboarding is not an object".to_string(),
            ));
        };
        merged.extend(patch);
        merged.insert("id".to_string(), Value::String(id));
        merged.insert(
            "locationId".to_string(),
            Value::String(location_id.to_string()),
        );
        merged.insert("updatedAt".to_string(), serde_json::to_value(now)?);

        let record: LocationOnboarding =
            serde_json::from_value(Value::Object(merged)).map_err(|e| {
                StoreError::InvalidPatch(format!("onboarding patch does not fit the record: {e}"))
            })?;
        state
            .onboardings
            .insert(location_id.to_string(), record.clone());
        Ok(record)
    }
}

#[async_trait]
impl SessionStore for InMemoryStore {
    async fn get_session(&self, location_id: &str) -> StoreResult<Option<OnboardingSession>> {
        Ok(self.state.read().await.sessions.get(location_id).cloned())
    }

    async fn upsert_session(&self, mut session: OnboardingSession) -> StoreResult<OnboardingSession> {
        session.updated_at = self.clock.now();
        self.state
            .write()
            .await
            .sessions
            .insert(session.location_id.clone(), session.clone());
        Ok(session)
    }
}

#[async_trait]
impl DirectoryStore for InMemoryStore {
    async fn get_location(&self, location_id: &str) -> StoreResult<Option<Location>> {
        let state = self.state.read().await;
        Ok(state.locations.iter().find(|l| l.id == location_id).cloned())
    }

    async fn get_account(&self, account_id: &str) -> StoreResult<Option<Account>> {
        Ok(self.state.read().await.accounts.get(account_id).cloned())
    }

    async fn list_locations_for_account(&self, account_id: &str) -> StoreResult<Vec<Location>> {
        let state = self.state.read().await;
        Ok(state
            .locations
            .iter()
            .filter(|l| l.account_id == account_id)
            .cloned()
            .collect())
    }

    async fn list_users(&self, location_id: &str) -> StoreResult<Vec<User>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .iter()
            .filter(|u| u.location_id.as_deref() == Some(location_id))
            .cloned()
            .collect())
    }

    async fn list_phones(&self, location_id: &str) -> StoreResult<Vec<Phone>> {
        let state = self.state.read().await;
        Ok(state
            .phones
            .iter()
            .filter(|p| p.location_id == location_id)
            .cloned()
            .collect())
    }

    async fn get_phone(&self, phone_id: &str) -> StoreResult<Option<Phone>> {
        let state = self.state.read().await;
        Ok(state.phones.iter().find(|p| p.id == phone_id).cloned())
    }

    async fn save_phone(&self, phone: Phone) -> StoreResult<Phone> {
        let mut state = self.state.write().await;

        if let Some(extension) = phone.extension_number() {
            let series = state.series.get(&phone.location_id);
            let taken = state.phones.iter().any(|p| {
                p.location_id == phone.location_id
                    && p.id != phone.id
                    && p.extension_number().is_some_and(|held| match series {
                        Some(series) => series.same_extension(held, extension),
                        None => held == extension,
                    })
            });
            if taken {
                return Err(StoreError::Conflict(format!(
                    "Extension {extension} is already assigned to another phone at location {}",
                    phone.location_id
                )));
            }
        }

        match state.phones.iter_mut().find(|p| p.id == phone.id) {
            Some(existing) => *existing = phone.clone(),
            None => state.phones.push(phone.clone()),
        }
        Ok(phone)
    }
}

#[async_trait]
impl ApprovalStore for InMemoryStore {
    async fn list_approvals(&self, location_id: &str) -> StoreResult<Vec<Approval>> {
        let state = self.state.read().await;
        Ok(state
            .approvals
            .iter()
            .filter(|a| a.metadata.location_id == location_id)
            .cloned()
            .collect())
    }

    async fn get_approval(&self, approval_id: &str) -> StoreResult<Option<Approval>> {
        let state = self.state.read().await;
        Ok(state.approvals.iter().find(|a| a.id == approval_id).cloned())
    }

    async fn save_approval(&self, approval: Approval) -> StoreResult<Approval> {
        let mut state = self.state.write().await;
        match state.approvals.iter_mut().find(|a| a.id == approval.id) {
            Some(existing) => *existing = approval.clone(),
            None => state.approvals.push(approval.clone()),
        }
        Ok(approval)
    }

    async fn open_phone_approval(&self, approval: Approval) -> StoreResult<Approval> {
        let Some(phone_id) = approval.metadata.phone_id.clone() else {
            return Err(StoreError::InvalidPatch(format!(
                "approval {} is not tied to a phone",
                approval.id
            )));
        };

        let mut state = self.state.write().await;
        if let Some(existing) = state.approvals.iter().find(|a| a.is_for_phone(&phone_id)) {
            return Ok(existing.clone());
        }
        state.approvals.push(approval.clone());
        Ok(approval)
    }
}

#[async_trait]
impl ExtensionSeriesStore for InMemoryStore {
    async fn get_series(&self, location_id: &str) -> StoreResult<Option<ExtensionSeries>> {
        Ok(self.state.read().await.series.get(location_id).cloned())
    }

    async fn upsert_series(&self, series: ExtensionSeries) -> StoreResult<ExtensionSeries> {
        let mut state = self.state.write().await;
        let merged = match state.series.remove(&series.location_id) {
            Some(existing) => existing.merge(series),
            None => series,
        };
        state
            .series
            .insert(merged.location_id.clone(), merged.clone());
        Ok(merged)
    }

    async fn reserve_extension(
        &self,
        location_id: &str,
        extension: &str,
    ) -> StoreResult<ExtensionSeries> {
        let mut state = self.state.write().await;

        let held: HashSet<String> = state
            .phones
            .iter()
            .filter(|p| p.location_id == location_id)
            .filter_map(|p| p.extension_number().map(str::to_string))
            .collect();

        let series = state
            .series
            .get_mut(location_id)
            .ok_or_else(|| StoreError::not_found("Extension series", location_id))?;
        if series.is_taken(extension, &held) {
            return Err(StoreError::Conflict(format!(
                "Extension {extension} is already taken at location {location_id}"
            )));
        }
        let canonical = match series.parse_index(extension) {
            Some(index) => series.format(index),
            None => extension.to_string(),
        };
        series.reserved_extensions.push(canonical);
        Ok(series.clone())
    }
}
