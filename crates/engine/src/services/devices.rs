use uuid::Uuid;
use voicestack_core::device::{DeviceValidation, Phone};

use super::approvals::ApprovalService;
use crate::context::EngineContext;
use crate::error::{EngineError, EngineResult};

/// Device support checks and phone writes.
///
/// Derived phone fields are always recomputed here before a phone reaches
/// the store, whatever the caller sent.
#[derive(Clone)]
pub struct DeviceService {
    ctx: EngineContext,
    approvals: ApprovalService,
}

impl DeviceService {
    pub fn new(ctx: EngineContext, approvals: ApprovalService) -> Self {
        Self { ctx, approvals }
    }

    pub fn validate_device(&self, brand: &str, model: &str) -> DeviceValidation {
        self.ctx.catalog.validate_device(brand, model)
    }

    /// Re-check a stored phone, write the derived fields back and open an
    /// approval if it is unsupported.
    pub async fn validate_and_mark_device(&self, phone_id: &str) -> EngineResult<DeviceValidation> {
        let mut phone = self
            .ctx
            .store
            .get_phone(phone_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Phone", phone_id))?;

        let validation = self.validate_device(&phone.brand, &phone.model);
        phone.refresh_derived(&self.ctx.catalog);
        let phone = self.ctx.store.save_phone(phone).await?;

        if !validation.is_supported {
            tracing::warn!(
                phone_id,
                location_id = %phone.location_id,
                brand = %phone.brand,
                model = %phone.model,
                "Unsupported device",
            );
            self.approvals.ensure_for_unsupported_phone(&phone).await?;
        }
        Ok(validation)
    }

    /// Create or update a phone.
    ///
    /// Assigns an id when missing and recomputes support and warnings. The
    /// store rejects an extension already held by another phone at the
    /// location.
    pub async fn save_phone(&self, mut phone: Phone) -> EngineResult<Phone> {
        if self.ctx.store.get_location(&phone.location_id).await?.is_none() {
            return Err(EngineError::not_found("Location", &phone.location_id));
        }
        if phone.id.trim().is_empty() {
            phone.id = format!("phone-{}", Uuid::new_v4());
        }

        phone.refresh_derived(&self.ctx.catalog);
        let phone = self.ctx.store.save_phone(phone).await?;

        tracing::info!(
            phone_id = %phone.id,
            location_id = %phone.location_id,
            is_unsupported = phone.is_unsupported,
            has_warnings = phone.has_warnings,
            "Phone saved",
        );

        if phone.is_unsupported {
            self.approvals.ensure_for_unsupported_phone(&phone).await?;
        }
        Ok(phone)
    }
}
