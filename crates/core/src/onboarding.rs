//! The location onboarding record and its answer enums.
//!
//! [`LocationOnboarding`] is the mutable questionnaire for one location. Its
//! serialized form is the store's wire format, so field names follow the
//! camelCase spelling used by the wizard.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CoreError;
use crate::types::{EntityId, Timestamp};

// ---------------------------------------------------------------------------
// Onboarding status
// ---------------------------------------------------------------------------

/// Lifecycle status shared by the onboarding record and its session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OnboardingStatus {
    #[default]
    NotStarted,
    InProgress,
    PendingApproval,
    Approved,
    Provisioning,
    Completed,
    Blocked,
    Cancelled,
}

impl OnboardingStatus {
    /// Parse the wire spelling (`"IN_PROGRESS"`, ...).
    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        match s {
            "NOT_STARTED" => Ok(Self::NotStarted),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "PENDING_APPROVAL" => Ok(Self::PendingApproval),
            "APPROVED" => Ok(Self::Approved),
            "PROVISIONING" => Ok(Self::Provisioning),
            "COMPLETED" => Ok(Self::Completed),
            "BLOCKED" => Ok(Self::Blocked),
            "CANCELLED" => Ok(Self::Cancelled),
            _ => Err(CoreError::Validation(format!(
                "Invalid onboarding status '{s}'"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "NOT_STARTED",
            Self::InProgress => "IN_PROGRESS",
            Self::PendingApproval => "PENDING_APPROVAL",
            Self::Approved => "APPROVED",
            Self::Provisioning => "PROVISIONING",
            Self::Completed => "COMPLETED",
            Self::Blocked => "BLOCKED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Statuses in which customer edits are frozen.
    pub fn is_locked(&self) -> bool {
        matches!(self, Self::Approved | Self::Provisioning | Self::Completed)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Whether the submission workflow may move from `self` to `next`.
    ///
    /// The main line is NOT_STARTED → IN_PROGRESS → PENDING_APPROVAL →
    /// APPROVED → PROVISIONING → COMPLETED. A pending submission can be sent
    /// back for changes, any live record can be blocked or cancelled, and a
    /// blocked record resumes as IN_PROGRESS.
    pub fn can_transition_to(&self, next: OnboardingStatus) -> bool {
        use OnboardingStatus::*;

        if self.is_terminal() {
            return false;
        }
        match (*self, next) {
            (_, Blocked) | (_, Cancelled) => *self != next,
            (NotStarted, InProgress)
            | (InProgress, PendingApproval)
            | (PendingApproval, InProgress)
            | (PendingApproval, Approved)
            | (Approved, Provisioning)
            | (Provisioning, Completed)
            | (Blocked, InProgress) => true,
            _ => false,
        }
    }
}

/// Validate a workflow status change, naming both ends on failure.
pub fn validate_status_transition(
    current: OnboardingStatus,
    next: OnboardingStatus,
) -> Result<(), CoreError> {
    if current.can_transition_to(next) {
        Ok(())
    } else {
        Err(CoreError::Conflict(format!(
            "Cannot move onboarding from {} to {}",
            current.as_str(),
            next.as_str()
        )))
    }
}

// ---------------------------------------------------------------------------
// Answer enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContactMedium {
    Email,
    Phone,
    Text,
}

/// The customer's current phone service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhoneSystemType {
    Voip,
    Landline,
    Pbx,
    #[serde(rename = "NONE")]
    NoSystem,
}

impl PhoneSystemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Voip => "VOIP",
            Self::Landline => "LANDLINE",
            Self::Pbx => "PBX",
            Self::NoSystem => "NONE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceOwnership {
    Owned,
    NotOwned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentStrategy {
    PerUser,
    PerExtension,
    Mixed,
}

/// A device picked from the VoiceStack purchase catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogSelection {
    pub brand: String,
    pub model: String,
    pub quantity: i64,
    pub device_types: Vec<String>,
}

// ---------------------------------------------------------------------------
// Call flow
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RingType {
    #[default]
    Users,
    Extensions,
}

/// Where an IVR option sends the caller: a user or an extension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IvrTarget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
}

impl IvrTarget {
    pub fn user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            extension: None,
        }
    }

    pub fn extension(extension: impl Into<String>) -> Self {
        Self {
            user_id: None,
            extension: Some(extension.into()),
        }
    }

    /// The populated identifier, user id first.
    pub fn identifier(&self) -> Option<&str> {
        [self.user_id.as_deref(), self.extension.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|v| !v.is_empty())
    }
}

/// One DTMF menu entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IvrOption {
    pub option_number: String,
    pub ring_type: RingType,
    pub targets: Vec<IvrTarget>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl IvrOption {
    /// Targets that actually name somebody.
    pub fn populated_targets(&self) -> impl Iterator<Item = &IvrTarget> {
        self.targets.iter().filter(|t| t.identifier().is_some())
    }
}

// ---------------------------------------------------------------------------
// Working hours
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub fn label(self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }
}

/// An open period, `HH:mm` strings as entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    pub open_time: String,
    pub close_time: String,
}

impl Shift {
    pub fn new(open_time: impl Into<String>, close_time: impl Into<String>) -> Self {
        Self {
            open_time: open_time.into(),
            close_time: close_time.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayHours {
    pub day: DayOfWeek,
    pub is_open: bool,
    #[serde(default)]
    pub shifts: Vec<Shift>,
}

impl DayHours {
    pub fn open(day: DayOfWeek, shifts: Vec<Shift>) -> Self {
        Self {
            day,
            is_open: true,
            shifts,
        }
    }

    pub fn closed(day: DayOfWeek) -> Self {
        Self {
            day,
            is_open: false,
            shifts: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Device ownership decision
// ---------------------------------------------------------------------------

/// Whether the customer buys phones through the VoiceStack catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseDecision {
    Unanswered,
    Catalog,
    ManualEntry,
}

impl PurchaseDecision {
    fn from_answer(buy_through_voice_stack: Option<bool>) -> Self {
        match buy_through_voice_stack {
            None => Self::Unanswered,
            Some(true) => Self::Catalog,
            Some(false) => Self::ManualEntry,
        }
    }
}

/// Follow-up for customers who already own phones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnedDevices {
    Unanswered,
    YealinkOrPolycom,
    OtherBrand(PurchaseDecision),
}

/// The device-ownership branch of the questionnaire as one value.
///
/// `Legacy` marks records written before the ownership question existed
/// (the key is absent); `Unanswered` marks records where the question is
/// present but still null.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceOwnershipDecision {
    Legacy,
    Unanswered,
    Owned(OwnedDevices),
    NotOwned(PurchaseDecision),
}

impl DeviceOwnershipDecision {
    /// The purchase sub-decision, when this branch asks for one.
    pub fn purchase(&self) -> Option<PurchaseDecision> {
        match self {
            Self::NotOwned(p) | Self::Owned(OwnedDevices::OtherBrand(p)) => Some(*p),
            _ => None,
        }
    }

    /// Devices are described phone by phone.
    pub fn uses_manual_entry(&self) -> bool {
        matches!(self, Self::Owned(OwnedDevices::YealinkOrPolycom))
            || self.purchase() == Some(PurchaseDecision::ManualEntry)
    }

    /// Devices come from catalog selections.
    pub fn uses_catalog(&self) -> bool {
        self.purchase() == Some(PurchaseDecision::Catalog)
    }
}

// ---------------------------------------------------------------------------
// LocationOnboarding
// ---------------------------------------------------------------------------

/// Keep `null` distinct from an absent key: `Some(None)` vs `None`.
fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// The onboarding questionnaire for one location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocationOnboarding {
    pub id: EntityId,
    pub location_id: EntityId,
    pub status: OnboardingStatus,

    // Basic details
    pub poc_name: Option<String>,
    pub poc_email: Option<String>,
    pub poc_phone: Option<String>,
    pub preferred_contact_medium: Option<ContactMedium>,

    // Phone system
    pub phone_system_type: Option<PhoneSystemType>,
    pub phone_system_details: Option<String>,
    pub voip_type: Option<String>,
    pub call_forwarding_supported: Option<bool>,

    // Fax
    pub uses_fax: Option<bool>,
    pub fax_number: Option<String>,
    pub wants_fax_in_voice_stack: Option<bool>,

    // Devices
    #[serde(
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub device_ownership: Option<Option<DeviceOwnership>>,
    pub has_yealink_or_polycom: Option<bool>,
    pub buy_phones_through_voice_stack: Option<bool>,
    pub device_catalog_selections: Vec<CatalogSelection>,
    pub total_devices: Option<u32>,
    pub assignment_strategy: Option<AssignmentStrategy>,

    // Working hours
    pub timezone: Option<String>,
    pub working_hours: Vec<DayHours>,

    // Call flow
    #[serde(rename = "hasIVR")]
    pub has_ivr: Option<bool>,
    pub greeting_message: Option<String>,
    pub ivr_script: Option<String>,
    pub ivr_retry_attempts: Option<i32>,
    pub ivr_wait_time: Option<i32>,
    pub ivr_invalid_selection_script: Option<String>,
    pub ivr_after_retries_target: Option<String>,
    pub ivr_options: Vec<IvrOption>,
    pub direct_ring_users: Vec<String>,
    pub direct_ring_extensions: Vec<String>,
    pub voicemail_script: Option<String>,
    pub shared_voicemail_users: Vec<String>,

    // Call queue
    pub uses_call_queue: Option<bool>,

    // Provenance
    pub copied_from_location_id: Option<EntityId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub submitted_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
}

/// Id synthesized for an onboarding record created on first write.
pub fn onboarding_id(location_id: &str) -> String {
    format!("onboarding-{location_id}")
}

impl LocationOnboarding {
    /// A blank record as created lazily on first write.
    pub fn new(location_id: impl Into<String>, now: Timestamp) -> Self {
        let location_id = location_id.into();
        Self {
            id: onboarding_id(&location_id),
            location_id,
            created_at: now,
            updated_at: now,
            ..Default::default()
        }
    }

    /// Answer (or clear, with `None`) the device-ownership question.
    pub fn set_device_ownership(&mut self, ownership: Option<DeviceOwnership>) {
        self.device_ownership = Some(ownership);
    }

    /// The ownership answer, ignoring the legacy/unanswered distinction.
    pub fn ownership_answer(&self) -> Option<DeviceOwnership> {
        self.device_ownership.flatten()
    }

    pub fn device_decision(&self) -> DeviceOwnershipDecision {
        let purchase = PurchaseDecision::from_answer(self.buy_phones_through_voice_stack);
        match self.device_ownership {
            None => DeviceOwnershipDecision::Legacy,
            Some(None) => DeviceOwnershipDecision::Unanswered,
            Some(Some(DeviceOwnership::NotOwned)) => DeviceOwnershipDecision::NotOwned(purchase),
            Some(Some(DeviceOwnership::Owned)) => {
                DeviceOwnershipDecision::Owned(match self.has_yealink_or_polycom {
                    None => OwnedDevices::Unanswered,
                    Some(true) => OwnedDevices::YealinkOrPolycom,
                    Some(false) => OwnedDevices::OtherBrand(purchase),
                })
            }
        }
    }

    pub fn is_ivr_enabled(&self) -> bool {
        self.has_ivr == Some(true)
    }

    /// The provider name the customer gave for their current system.
    pub fn provider_name(&self) -> Option<&str> {
        match self.phone_system_type {
            Some(PhoneSystemType::Voip) => self
                .voip_type
                .as_deref()
                .or(self.phone_system_details.as_deref()),
            _ => self.phone_system_details.as_deref(),
        }
    }
}
