//! Wizard progress tracking for one location.
//!
//! The session is a projection of the onboarding record: when none is stored
//! it is rebuilt from which onboarding fields are filled in (see
//! [`reconstruct_progress`]). All mutators here are synchronous and take the
//! current time from the caller.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::onboarding::{DeviceOwnershipDecision, LocationOnboarding, OnboardingStatus};
use crate::types::{is_blank, EntityId, Timestamp};
use crate::validation::ValidationResult;

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

/// Wizard steps. Declaration order is the step order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OnboardingStep {
    BasicDetails,
    PhoneSystem,
    Devices,
    WorkingHours,
    CallFlow,
    CallQueue,
    Users,
    Review,
}

impl OnboardingStep {
    pub const ALL: [OnboardingStep; 8] = [
        Self::BasicDetails,
        Self::PhoneSystem,
        Self::Devices,
        Self::WorkingHours,
        Self::CallFlow,
        Self::CallQueue,
        Self::Users,
        Self::Review,
    ];

    /// Steps that must be complete before submission (everything but review).
    pub fn required_for_submission() -> impl Iterator<Item = OnboardingStep> {
        Self::ALL.into_iter().take_while(|s| *s <= Self::Users)
    }

    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|step| step.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Invalid onboarding step '{s}'")))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::BasicDetails => "BASIC_DETAILS",
            Self::PhoneSystem => "PHONE_SYSTEM",
            Self::Devices => "DEVICES",
            Self::WorkingHours => "WORKING_HOURS",
            Self::CallFlow => "CALL_FLOW",
            Self::CallQueue => "CALL_QUEUE",
            Self::Users => "USERS",
            Self::Review => "REVIEW",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::BasicDetails => "Basic Details",
            Self::PhoneSystem => "Phone System",
            Self::Devices => "Devices",
            Self::WorkingHours => "Working Hours",
            Self::CallFlow => "Call Flow",
            Self::CallQueue => "Call Queue",
            Self::Users => "Users",
            Self::Review => "Review",
        }
    }

    /// The following step, `None` at review.
    pub fn next(self) -> Option<Self> {
        let idx = Self::ALL.iter().position(|s| *s == self)?;
        Self::ALL.get(idx + 1).copied()
    }
}

// ---------------------------------------------------------------------------
// Edit authority
// ---------------------------------------------------------------------------

/// Who is asking to edit. Deciding who holds override authority is up to
/// the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EditAuthority {
    #[default]
    Standard,
    Override,
}

/// Outcome of a successful edit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditPermit {
    /// The record was locked and the edit only went through on override.
    pub requires_override: bool,
}

/// Gate an edit against the lock flag.
pub fn ensure_editable(
    location_id: &str,
    locked: bool,
    authority: EditAuthority,
) -> Result<EditPermit, CoreError> {
    match (locked, authority) {
        (false, _) => Ok(EditPermit {
            requires_override: false,
        }),
        (true, EditAuthority::Override) => Ok(EditPermit {
            requires_override: true,
        }),
        (true, EditAuthority::Standard) => Err(CoreError::Conflict(format!(
            "Onboarding for location {location_id} is locked; an override is required to edit it"
        ))),
    }
}

// ---------------------------------------------------------------------------
// Reconstruction
// ---------------------------------------------------------------------------

/// Completed steps and current step inferred from onboarding data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    pub completed_steps: BTreeSet<OnboardingStep>,
    pub current_step: OnboardingStep,
}

fn step_has_data(step: OnboardingStep, onboarding: &LocationOnboarding, user_count: usize) -> bool {
    match step {
        OnboardingStep::BasicDetails => {
            !is_blank(onboarding.poc_name.as_deref()) && !is_blank(onboarding.poc_email.as_deref())
        }
        OnboardingStep::PhoneSystem => onboarding.phone_system_type.is_some(),
        OnboardingStep::Devices => match onboarding.device_decision() {
            DeviceOwnershipDecision::Legacy => onboarding.total_devices.is_some(),
            DeviceOwnershipDecision::Unanswered => false,
            _ => true,
        },
        OnboardingStep::WorkingHours => !onboarding.working_hours.is_empty(),
        OnboardingStep::CallFlow => onboarding.has_ivr.is_some(),
        OnboardingStep::CallQueue => onboarding.uses_call_queue.is_some(),
        OnboardingStep::Users => user_count > 0,
        OnboardingStep::Review => false,
    }
}

/// Infer progress from field presence, walking steps in order and stopping
/// at the first one without data.
pub fn reconstruct_progress(onboarding: &LocationOnboarding, user_count: usize) -> Progress {
    let mut completed_steps = BTreeSet::new();
    for step in OnboardingStep::ALL {
        if !step_has_data(step, onboarding, user_count) {
            return Progress {
                completed_steps,
                current_step: step,
            };
        }
        completed_steps.insert(step);
    }
    Progress {
        completed_steps,
        current_step: OnboardingStep::Review,
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingSession {
    pub location_id: EntityId,
    pub current_step: OnboardingStep,
    pub completed_steps: BTreeSet<OnboardingStep>,
    pub status: OnboardingStatus,
    pub is_locked: bool,
    pub updated_at: Timestamp,
}

/// Result of the submission readiness check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitCheck {
    pub can_submit: bool,
    pub reasons: Vec<String>,
}

impl OnboardingSession {
    pub fn new(location_id: impl Into<String>, now: Timestamp) -> Self {
        Self {
            location_id: location_id.into(),
            current_step: OnboardingStep::BasicDetails,
            completed_steps: BTreeSet::new(),
            status: OnboardingStatus::NotStarted,
            is_locked: false,
            updated_at: now,
        }
    }

    /// Rebuild a session from onboarding data. Without a record the session
    /// starts fresh.
    pub fn reconstruct(
        location_id: impl Into<String>,
        onboarding: Option<&LocationOnboarding>,
        user_count: usize,
        now: Timestamp,
    ) -> Self {
        let mut session = Self::new(location_id, now);
        let Some(onboarding) = onboarding else {
            return session;
        };

        let progress = reconstruct_progress(onboarding, user_count);
        session.status = match onboarding.status {
            OnboardingStatus::NotStarted if !progress.completed_steps.is_empty() => {
                OnboardingStatus::InProgress
            }
            status => status,
        };
        session.is_locked = session.status.is_locked();
        session.completed_steps = progress.completed_steps;
        session.current_step = progress.current_step;
        session
    }

    /// Locked by flag or by status.
    pub fn locked(&self) -> bool {
        self.is_locked || self.status.is_locked()
    }

    pub fn ensure_editable(&self, authority: EditAuthority) -> Result<EditPermit, CoreError> {
        ensure_editable(&self.location_id, self.locked(), authority)
    }

    /// Move to `step`, marking the step being left as completed.
    pub fn update_step(&mut self, step: OnboardingStep, now: Timestamp) -> Result<(), CoreError> {
        self.ensure_editable(EditAuthority::Standard)?;
        self.completed_steps.insert(self.current_step);
        self.current_step = step;
        self.status = OnboardingStatus::InProgress;
        self.updated_at = now;
        Ok(())
    }

    /// Mark `step` completed; completing the current step advances to the
    /// next one.
    pub fn complete_step(&mut self, step: OnboardingStep, now: Timestamp) -> Result<(), CoreError> {
        self.ensure_editable(EditAuthority::Standard)?;
        self.completed_steps.insert(step);
        if step == self.current_step {
            if let Some(next) = step.next() {
                self.current_step = next;
            }
        }
        self.updated_at = now;
        Ok(())
    }

    /// Set the status. The lock flag can be raised here but never cleared.
    pub fn update_status(&mut self, status: OnboardingStatus, lock: bool, now: Timestamp) {
        self.status = status;
        self.is_locked |= lock;
        self.updated_at = now;
    }

    /// Every reason this session cannot be submitted right now.
    pub fn submission_blockers(
        &self,
        pending_approvals: usize,
        validation: &ValidationResult,
    ) -> Vec<String> {
        let mut reasons = Vec::new();

        if self.locked() {
            reasons.push("Onboarding is locked".to_string());
        }
        for step in OnboardingStep::required_for_submission() {
            if !self.completed_steps.contains(&step) {
                reasons.push(format!("Step '{}' is not complete", step.label()));
            }
        }
        if pending_approvals > 0 {
            reasons.push(format!(
                "{pending_approvals} approval request(s) are still pending"
            ));
        }
        reasons.extend(
            validation
                .errors
                .iter()
                .map(|e| format!("Validation: {}", e.message)),
        );

        reasons
    }

    pub fn can_submit(&self, pending_approvals: usize, validation: &ValidationResult) -> SubmitCheck {
        let reasons = self.submission_blockers(pending_approvals, validation);
        SubmitCheck {
            can_submit: reasons.is_empty(),
            reasons,
        }
    }
}
