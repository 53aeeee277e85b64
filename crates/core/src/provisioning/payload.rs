//! Payload wire types.

use serde::{Deserialize, Serialize};

use crate::device::{AssignmentType, PhoneOwnership};
use crate::onboarding::{ContactMedium, DayHours, IvrTarget, OnboardingStatus, PhoneSystemType, RingType};
use crate::types::{EntityId, Timestamp};

/// Default contract version stamped on every payload.
pub const PAYLOAD_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisioningPayload {
    pub location_id: EntityId,
    pub location_name: String,
    pub account_id: EntityId,
    pub account_name: String,
    pub timestamp: Timestamp,
    pub version: String,
    pub location: PayloadLocation,
    pub contacts: PayloadContacts,
    pub phone_system: PayloadPhoneSystem,
    pub devices: Vec<PayloadDevice>,
    pub users: Vec<PayloadUser>,
    pub extensions: Vec<PayloadExtension>,
    pub working_hours: PayloadWorkingHours,
    pub call_flow: PayloadCallFlow,
    pub metadata: PayloadMetadata,
}

// ---------------------------------------------------------------------------
// Location and contacts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadAddress {
    pub line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub zipcode: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadLocation {
    pub id: EntityId,
    pub name: String,
    pub address: PayloadAddress,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimaryContact {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_contact_medium: Option<ContactMedium>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadContacts {
    pub primary: PrimaryContact,
}

// ---------------------------------------------------------------------------
// Phone system
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadFax {
    pub uses_fax: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fax_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wants_fax_in_voice_stack: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadPhoneSystem {
    #[serde(rename = "type")]
    pub system_type: Option<PhoneSystemType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_forwarding_supported: Option<bool>,
    pub fax: PayloadFax,
}

// ---------------------------------------------------------------------------
// Devices, users, extensions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadDevice {
    pub id: EntityId,
    pub brand: String,
    pub model: String,
    pub ownership: PhoneOwnership,
    pub assignment_type: AssignmentType,
    pub assigned_user_id: Option<EntityId>,
    pub mac_address: Option<String>,
    pub serial_number: Option<String>,
    pub extension: Option<String>,
    pub device_types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadUser {
    pub id: EntityId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
}

/// Who an extension rings.
///
/// The wire spellings are fixed by the provisioning contract: an extension
/// held by a phone assigned to an extension is reported as `"device"`, and
/// one on a user-assigned phone with no user yet as `"common"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtensionHolder {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "device")]
    Extension,
    #[serde(rename = "common")]
    Shared,
}

impl ExtensionHolder {
    pub fn wire_value(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Extension => "device",
            Self::Shared => "common",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadExtension {
    pub extension: String,
    pub assigned_to: ExtensionHolder,
    pub device_id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<EntityId>,
}

// ---------------------------------------------------------------------------
// Working hours and call flow
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadWorkingHours {
    pub timezone: Option<String>,
    pub days: Vec<DayHours>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadIvrOption {
    pub option_number: String,
    pub ring_type: RingType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub targets: Vec<IvrTarget>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadIvr {
    pub script: Option<String>,
    pub retry_attempts: Option<i32>,
    pub wait_time: Option<i32>,
    pub invalid_selection_script: Option<String>,
    pub after_retries_target: Option<String>,
    pub options: Vec<PayloadIvrOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadDirectRouting {
    pub users: Vec<EntityId>,
    pub extensions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadVoicemail {
    pub script: Option<String>,
    pub shared_users: Vec<EntityId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadCallFlow {
    #[serde(rename = "hasIVR")]
    pub has_ivr: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub greeting_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ivr: Option<PayloadIvr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direct_routing: Option<PayloadDirectRouting>,
    pub voicemail: PayloadVoicemail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadMetadata {
    pub onboarding_id: EntityId,
    pub status: OnboardingStatus,
    pub submitted_at: Option<Timestamp>,
    pub generated_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copied_from_location_id: Option<EntityId>,
}
