use uuid::Uuid;
use voicestack_core::approval::{Approval, ApprovalKind, ApprovalMetadata};
use voicestack_core::device::Phone;

use crate::context::EngineContext;
use crate::error::{EngineError, EngineResult};

/// Actor recorded on approvals the engine opens by itself.
pub const SYSTEM_ACTOR: &str = "system";

#[derive(Clone)]
pub struct ApprovalService {
    ctx: EngineContext,
}

impl ApprovalService {
    pub fn new(ctx: EngineContext) -> Self {
        Self { ctx }
    }

    pub async fn request_approval(
        &self,
        kind: ApprovalKind,
        metadata: ApprovalMetadata,
        requested_by: &str,
        notes: Option<String>,
    ) -> EngineResult<Approval> {
        let mut approval = Approval::new(
            Uuid::new_v4().to_string(),
            kind,
            metadata,
            requested_by,
            self.ctx.now(),
        );
        approval.notes = notes;
        let approval = self.ctx.store.save_approval(approval).await?;

        tracing::info!(
            approval_id = %approval.id,
            location_id = %approval.metadata.location_id,
            requested_by,
            "Approval requested",
        );
        Ok(approval)
    }

    /// The approval for an unsupported phone, opening one if the phone has
    /// none yet.
    pub async fn ensure_for_unsupported_phone(&self, phone: &Phone) -> EngineResult<Approval> {
        let candidate = Approval::for_unsupported_phone(
            Uuid::new_v4().to_string(),
            phone,
            SYSTEM_ACTOR,
            self.ctx.now(),
        );
        let candidate_id = candidate.id.clone();
        let approval = self.ctx.store.open_phone_approval(candidate).await?;

        if approval.id == candidate_id {
            tracing::info!(
                approval_id = %approval.id,
                location_id = %phone.location_id,
                phone_id = %phone.id,
                brand = %phone.brand,
                model = %phone.model,
                "Approval opened for unsupported device",
            );
        }
        Ok(approval)
    }

    pub async fn approve(&self, approval_id: &str, actor: &str) -> EngineResult<Approval> {
        let mut approval = self.load(approval_id).await?;
        approval.approve(actor, self.ctx.now())?;
        let approval = self.ctx.store.save_approval(approval).await?;

        tracing::info!(approval_id, actor, "Approval approved");
        Ok(approval)
    }

    pub async fn reject(
        &self,
        approval_id: &str,
        actor: &str,
        reason: Option<String>,
    ) -> EngineResult<Approval> {
        let mut approval = self.load(approval_id).await?;
        approval.reject(actor, reason, self.ctx.now())?;
        let approval = self.ctx.store.save_approval(approval).await?;

        tracing::info!(approval_id, actor, "Approval rejected");
        Ok(approval)
    }

    pub async fn pending_approvals(&self, location_id: &str) -> EngineResult<Vec<Approval>> {
        Ok(self
            .ctx
            .store
            .list_approvals(location_id)
            .await?
            .into_iter()
            .filter(Approval::is_pending)
            .collect())
    }

    async fn load(&self, approval_id: &str) -> EngineResult<Approval> {
        self.ctx
            .store
            .get_approval(approval_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Approval", approval_id))
    }
}
