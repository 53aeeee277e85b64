//! Seed data for [`InMemoryStore`](crate::InMemoryStore).

use serde::{Deserialize, Serialize};
use voicestack_core::approval::Approval;
use voicestack_core::device::Phone;
use voicestack_core::extensions::ExtensionSeries;
use voicestack_core::location::{Account, Location, User};
use voicestack_core::onboarding::LocationOnboarding;
use voicestack_core::session::OnboardingSession;

/// A full copy of the store's contents, in wire format.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snapshot {
    pub accounts: Vec<Account>,
    pub locations: Vec<Location>,
    pub users: Vec<User>,
    pub phones: Vec<Phone>,
    pub onboardings: Vec<LocationOnboarding>,
    pub sessions: Vec<OnboardingSession>,
    pub approvals: Vec<Approval>,
    pub extension_series: Vec<ExtensionSeries>,
}

impl Snapshot {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
