use voicestack_core::warnings::{
    aggregate_account_warnings, location_warnings, AccountWarnings, LocationWarnings,
};

use super::approvals::ApprovalService;
use crate::context::EngineContext;
use crate::error::EngineResult;

/// Dashboard blockers and warnings.
///
/// Never fails: a location whose data cannot be loaded reports the
/// all-clear default and a warning is logged.
#[derive(Clone)]
pub struct WarningsCalculator {
    ctx: EngineContext,
    approvals: ApprovalService,
}

impl WarningsCalculator {
    pub fn new(ctx: EngineContext, approvals: ApprovalService) -> Self {
        Self { ctx, approvals }
    }

    pub async fn calculate_location_warnings(&self, location_id: &str) -> LocationWarnings {
        match self.try_location_warnings(location_id).await {
            Ok(warnings) => warnings,
            Err(e) => {
                tracing::warn!(error = %e, location_id, "Failed to calculate location warnings");
                LocationWarnings::default()
            }
        }
    }

    pub async fn calculate_account_warnings(&self, account_id: &str) -> AccountWarnings {
        let locations = match self.ctx.store.list_locations_for_account(account_id).await {
            Ok(locations) => locations,
            Err(e) => {
                tracing::warn!(error = %e, account_id, "Failed to list account locations");
                return AccountWarnings::default();
            }
        };

        let mut per_location = Vec::with_capacity(locations.len());
        for location in &locations {
            per_location.push(self.calculate_location_warnings(&location.id).await);
        }
        aggregate_account_warnings(&per_location)
    }

    async fn try_location_warnings(&self, location_id: &str) -> EngineResult<LocationWarnings> {
        let onboarding = self.ctx.store.get_onboarding(location_id).await?;
        let phones = self.ctx.store.list_phones(location_id).await?;
        let pending = self.approvals.pending_approvals(location_id).await?.len();
        Ok(location_warnings(onboarding.as_ref(), &phones, pending))
    }
}
