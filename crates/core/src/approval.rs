//! Approval requests raised during onboarding.
//!
//! The only automatic source today is an unsupported phone; each such phone
//! gets at most one approval, keyed by its id. An approval is decided once.

use serde::{Deserialize, Serialize};

use crate::device::Phone;
use crate::error::CoreError;
use crate::types::{EntityId, Timestamp};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalKind {
    UnsupportedDevice,
    ConfigurationException,
}

/// What the approval is about. `location_id` ties it to a location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalMetadata {
    pub location_id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Approval {
    pub id: EntityId,
    pub kind: ApprovalKind,
    pub status: ApprovalStatus,
    pub metadata: ApprovalMetadata,
    #[serde(default)]
    pub notes: Option<String>,
    pub requested_by: String,
    pub requested_at: Timestamp,
    #[serde(default)]
    pub decided_by: Option<String>,
    #[serde(default)]
    pub decided_at: Option<Timestamp>,
    #[serde(default)]
    pub rejection_reason: Option<String>,
}

impl Approval {
    pub fn new(
        id: impl Into<String>,
        kind: ApprovalKind,
        metadata: ApprovalMetadata,
        requested_by: impl Into<String>,
        now: Timestamp,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            status: ApprovalStatus::Pending,
            metadata,
            notes: None,
            requested_by: requested_by.into(),
            requested_at: now,
            decided_by: None,
            decided_at: None,
            rejection_reason: None,
        }
    }

    /// A pending approval for keeping an unsupported phone.
    pub fn for_unsupported_phone(
        id: impl Into<String>,
        phone: &Phone,
        requested_by: impl Into<String>,
        now: Timestamp,
    ) -> Self {
        let mut approval = Self::new(
            id,
            ApprovalKind::UnsupportedDevice,
            ApprovalMetadata {
                location_id: phone.location_id.clone(),
                phone_id: Some(phone.id.clone()),
                brand: Some(phone.brand.clone()),
                model: Some(phone.model.clone()),
            },
            requested_by,
            now,
        );
        approval.notes = Some(format!(
            "{} {} is not a supported device",
            phone.brand, phone.model
        ));
        approval
    }

    pub fn is_pending(&self) -> bool {
        self.status == ApprovalStatus::Pending
    }

    pub fn is_for_phone(&self, phone_id: &str) -> bool {
        self.metadata.phone_id.as_deref() == Some(phone_id)
    }

    fn ensure_pending(&self) -> Result<(), CoreError> {
        if self.is_pending() {
            Ok(())
        } else {
            Err(CoreError::Conflict(format!(
                "Approval {} has already been decided ({})",
                self.id,
                self.status.as_str()
            )))
        }
    }

    pub fn approve(&mut self, actor: impl Into<String>, now: Timestamp) -> Result<(), CoreError> {
        self.ensure_pending()?;
        self.status = ApprovalStatus::Approved;
        self.decided_by = Some(actor.into());
        self.decided_at = Some(now);
        Ok(())
    }

    pub fn reject(
        &mut self,
        actor: impl Into<String>,
        reason: Option<String>,
        now: Timestamp,
    ) -> Result<(), CoreError> {
        self.ensure_pending()?;
        self.status = ApprovalStatus::Rejected;
        self.decided_by = Some(actor.into());
        self.decided_at = Some(now);
        self.rejection_reason = reason;
        Ok(())
    }
}
