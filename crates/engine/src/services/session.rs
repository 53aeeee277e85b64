//! Session state machine and submission workflow.
//!
//! The onboarding record is authoritative; the session is a projection that
//! is rebuilt from it on first access and kept in step with status changes.

use serde::Serialize;
use serde_json::{json, Value};
use voicestack_core::error::CoreError;
use voicestack_core::onboarding::{validate_status_transition, LocationOnboarding, OnboardingStatus};
use voicestack_core::provisioning::ProvisioningPayload;
use voicestack_core::session::{
    ensure_editable, EditAuthority, OnboardingSession, OnboardingStep, SubmitCheck,
};

use super::approvals::ApprovalService;
use super::provisioning::ProvisioningPayloadGenerator;
use super::submission::SubmissionValidator;
use crate::context::EngineContext;
use crate::error::{EngineError, EngineResult};

/// Result of a guarded onboarding edit.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingUpdate {
    pub onboarding: LocationOnboarding,
    /// The record was locked and the edit was applied on override.
    pub requires_override: bool,
}

#[derive(Clone)]
pub struct SessionService {
    ctx: EngineContext,
    validator: SubmissionValidator,
    approvals: ApprovalService,
    provisioning: ProvisioningPayloadGenerator,
}

impl SessionService {
    pub fn new(
        ctx: EngineContext,
        validator: SubmissionValidator,
        approvals: ApprovalService,
        provisioning: ProvisioningPayloadGenerator,
    ) -> Self {
        Self {
            ctx,
            validator,
            approvals,
            provisioning,
        }
    }

    // -----------------------------------------------------------------------
    // Session
    // -----------------------------------------------------------------------

    /// The stored session, or one reconstructed from onboarding data and
    /// persisted.
    pub async fn get_or_create_session(&self, location_id: &str) -> EngineResult<OnboardingSession> {
        if let Some(session) = self.ctx.store.get_session(location_id).await? {
            return Ok(session);
        }

        let onboarding = self.ctx.store.get_onboarding(location_id).await?;
        let user_count = self.ctx.store.list_users(location_id).await?.len();
        let session =
            OnboardingSession::reconstruct(location_id, onboarding.as_ref(), user_count, self.ctx.now());
        let session = self.ctx.store.upsert_session(session).await?;

        tracing::debug!(
            location_id,
            current_step = session.current_step.as_str(),
            completed = session.completed_steps.len(),
            status = session.status.as_str(),
            "Session reconstructed",
        );
        Ok(session)
    }

    pub async fn update_step(
        &self,
        location_id: &str,
        step: OnboardingStep,
    ) -> EngineResult<OnboardingSession> {
        let mut session = self.get_or_create_session(location_id).await?;
        let from = session.current_step;
        session.update_step(step, self.ctx.now())?;
        let session = self.ctx.store.upsert_session(session).await?;

        tracing::info!(
            location_id,
            from = from.as_str(),
            to = step.as_str(),
            "Onboarding step changed",
        );
        Ok(session)
    }

    pub async fn complete_step(
        &self,
        location_id: &str,
        step: OnboardingStep,
    ) -> EngineResult<OnboardingSession> {
        let mut session = self.get_or_create_session(location_id).await?;
        session.complete_step(step, self.ctx.now())?;
        let session = self.ctx.store.upsert_session(session).await?;

        tracing::info!(
            location_id,
            step = step.as_str(),
            current_step = session.current_step.as_str(),
            "Onboarding step completed",
        );
        Ok(session)
    }

    /// Set the session status directly. `lock` can only raise the lock flag.
    pub async fn update_status(
        &self,
        location_id: &str,
        status: OnboardingStatus,
        lock: bool,
    ) -> EngineResult<OnboardingSession> {
        let mut session = self.get_or_create_session(location_id).await?;
        session.update_status(status, lock, self.ctx.now());
        let session = self.ctx.store.upsert_session(session).await?;

        tracing::info!(
            location_id,
            status = status.as_str(),
            is_locked = session.is_locked,
            "Session status updated",
        );
        Ok(session)
    }

    /// Every reason the location cannot be submitted, collected in one pass.
    pub async fn can_submit(&self, location_id: &str) -> EngineResult<SubmitCheck> {
        let session = self.get_or_create_session(location_id).await?;
        let pending = self.approvals.pending_approvals(location_id).await?.len();
        let validation = self
            .validator
            .validate_onboarding_for_submission(location_id)
            .await?;
        Ok(session.can_submit(pending, &validation))
    }

    // -----------------------------------------------------------------------
    // Guarded edits
    // -----------------------------------------------------------------------

    /// Shallow-merge `patch` into the onboarding record if the location is
    /// editable by `authority`.
    ///
    /// The status field belongs to the submission workflow and cannot be
    /// patched. A first edit moves a NOT_STARTED record to IN_PROGRESS. No
    /// session is created here, so a later first access still rebuilds
    /// progress from the saved data.
    pub async fn update_onboarding(
        &self,
        location_id: &str,
        patch: Value,
        authority: EditAuthority,
    ) -> EngineResult<OnboardingUpdate> {
        if self.ctx.store.get_location(location_id).await?.is_none() {
            return Err(EngineError::not_found("Location", location_id));
        }
        let Value::Object(mut fields) = patch else {
            return Err(CoreError::Validation("Onboarding patch must be a JSON object".into()).into());
        };
        if fields.contains_key("status") {
            return Err(CoreError::Validation(
                "Onboarding status can only change through the submission workflow".into(),
            )
            .into());
        }

        let session = self.ctx.store.get_session(location_id).await?;
        let current = self.ctx.store.get_onboarding(location_id).await?;
        let status = current.as_ref().map(|o| o.status).unwrap_or_default();
        let locked = session.as_ref().is_some_and(OnboardingSession::locked) || status.is_locked();
        let permit = ensure_editable(location_id, locked, authority)?;

        if status == OnboardingStatus::NotStarted {
            fields.insert("status".into(), json!(OnboardingStatus::InProgress));
        }
        let onboarding = self
            .ctx
            .store
            .upsert_onboarding(location_id, Value::Object(fields))
            .await?;

        if let Some(mut session) = session.filter(|s| s.status == OnboardingStatus::NotStarted) {
            session.update_status(OnboardingStatus::InProgress, false, self.ctx.now());
            self.ctx.store.upsert_session(session).await?;
        }

        if permit.requires_override {
            tracing::warn!(
                location_id,
                status = onboarding.status.as_str(),
                "Locked onboarding edited on override",
            );
        } else {
            tracing::info!(location_id, "Onboarding updated");
        }
        Ok(OnboardingUpdate {
            onboarding,
            requires_override: permit.requires_override,
        })
    }

    // -----------------------------------------------------------------------
    // Submission workflow
    // -----------------------------------------------------------------------

    /// Submit for approval. Fails with every outstanding reason when the
    /// location is not ready.
    pub async fn submit(&self, location_id: &str) -> EngineResult<OnboardingSession> {
        let check = self.can_submit(location_id).await?;
        if !check.can_submit {
            tracing::info!(
                location_id,
                reasons = check.reasons.len(),
                "Submission blocked",
            );
            return Err(EngineError::SubmissionBlocked {
                reasons: check.reasons,
            });
        }

        let now = self.ctx.now();
        self.transition(
            location_id,
            OnboardingStatus::PendingApproval,
            false,
            json!({ "submittedAt": now }),
        )
        .await
    }

    /// Approve a pending submission. The location is locked from here on.
    pub async fn approve_onboarding(&self, location_id: &str) -> EngineResult<OnboardingSession> {
        self.transition(location_id, OnboardingStatus::Approved, true, json!({}))
            .await
    }

    /// Send a pending submission back to the customer.
    pub async fn return_for_changes(&self, location_id: &str) -> EngineResult<OnboardingSession> {
        self.transition(location_id, OnboardingStatus::InProgress, false, json!({}))
            .await
    }

    /// Generate the payload for an approved location and move it to
    /// PROVISIONING. Nothing changes if the payload fails its self-check.
    pub async fn start_provisioning(&self, location_id: &str) -> EngineResult<ProvisioningPayload> {
        let session = self.get_or_create_session(location_id).await?;
        let current = self.current_status(location_id, &session).await?;
        validate_status_transition(current, OnboardingStatus::Provisioning)?;

        let generated = self.provisioning.generate_and_validate(location_id).await?;
        if !generated.validation.valid {
            return Err(EngineError::InvalidPayload {
                errors: generated.validation.errors,
            });
        }

        self.transition(location_id, OnboardingStatus::Provisioning, true, json!({}))
            .await?;
        Ok(generated.payload)
    }

    pub async fn complete(&self, location_id: &str) -> EngineResult<OnboardingSession> {
        let now = self.ctx.now();
        self.transition(
            location_id,
            OnboardingStatus::Completed,
            true,
            json!({ "completedAt": now }),
        )
        .await
    }

    pub async fn block(&self, location_id: &str) -> EngineResult<OnboardingSession> {
        self.transition(location_id, OnboardingStatus::Blocked, false, json!({}))
            .await
    }

    pub async fn cancel(&self, location_id: &str) -> EngineResult<OnboardingSession> {
        self.transition(location_id, OnboardingStatus::Cancelled, false, json!({}))
            .await
    }

    /// Workflow status: the onboarding record's, unless it has not left
    /// NOT_STARTED yet, in which case the session's view is newer.
    async fn current_status(
        &self,
        location_id: &str,
        session: &OnboardingSession,
    ) -> EngineResult<OnboardingStatus> {
        let stored = self
            .ctx
            .store
            .get_onboarding(location_id)
            .await?
            .map(|o| o.status)
            .unwrap_or_default();
        Ok(match stored {
            OnboardingStatus::NotStarted => session.status,
            status => status,
        })
    }

    async fn transition(
        &self,
        location_id: &str,
        next: OnboardingStatus,
        lock: bool,
        extra: Value,
    ) -> EngineResult<OnboardingSession> {
        let mut session = self.get_or_create_session(location_id).await?;
        let current = self.current_status(location_id, &session).await?;
        validate_status_transition(current, next)?;

        let mut patch = json!({ "status": next });
        if let (Value::Object(fields), Value::Object(extra)) = (&mut patch, extra) {
            fields.extend(extra);
        }
        self.ctx.store.upsert_onboarding(location_id, patch).await?;

        session.update_status(next, lock, self.ctx.now());
        let session = self.ctx.store.upsert_session(session).await?;

        tracing::info!(
            location_id,
            from = current.as_str(),
            to = next.as_str(),
            is_locked = session.is_locked,
            "Onboarding status changed",
        );
        Ok(session)
    }
}
