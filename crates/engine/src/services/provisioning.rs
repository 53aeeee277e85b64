use serde::Serialize;
use voicestack_core::provisioning::{
    build_payload, validate_payload, PayloadSource, PayloadValidation, ProvisioningPayload,
};

use crate::context::EngineContext;
use crate::error::{EngineError, EngineResult};

/// A payload together with its structural check.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedPayload {
    pub payload: ProvisioningPayload,
    pub validation: PayloadValidation,
}

#[derive(Clone)]
pub struct ProvisioningPayloadGenerator {
    ctx: EngineContext,
}

impl ProvisioningPayloadGenerator {
    pub fn new(ctx: EngineContext) -> Self {
        Self { ctx }
    }

    /// Build the payload for a location.
    ///
    /// Fails with `NotFound` when the location, its account or its
    /// onboarding record is missing.
    pub async fn generate(&self, location_id: &str) -> EngineResult<ProvisioningPayload> {
        let store = &self.ctx.store;

        let location = store
            .get_location(location_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Location", location_id))?;
        let account = store
            .get_account(&location.account_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Account", &location.account_id))?;
        let onboarding = store
            .get_onboarding(location_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Onboarding", location_id))?;
        let phones = store.list_phones(location_id).await?;
        let users = store.list_users(location_id).await?;

        let payload = build_payload(
            PayloadSource {
                account: &account,
                location: &location,
                onboarding: &onboarding,
                phones: &phones,
                users: &users,
            },
            &self.ctx.config.payload_version,
            self.ctx.now(),
        );

        tracing::info!(
            location_id,
            account_id = %account.id,
            devices = payload.devices.len(),
            users = payload.users.len(),
            extensions = payload.extensions.len(),
            "Provisioning payload generated",
        );
        Ok(payload)
    }

    pub fn validate(&self, payload: &ProvisioningPayload) -> PayloadValidation {
        validate_payload(payload)
    }

    pub async fn generate_and_validate(&self, location_id: &str) -> EngineResult<GeneratedPayload> {
        let payload = self.generate(location_id).await?;
        let validation = self.validate(&payload);
        if !validation.valid {
            tracing::warn!(
                location_id,
                errors = ?validation.errors,
                "Provisioning payload failed validation",
            );
        }
        Ok(GeneratedPayload {
            payload,
            validation,
        })
    }
}
