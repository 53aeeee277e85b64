use voicestack_core::onboarding::LocationOnboarding;
use voicestack_core::skip_rules::{self, SkipRule};

use crate::context::EngineContext;
use crate::error::EngineResult;

/// Decides which wizard questions can be hidden for a location.
#[derive(Clone)]
pub struct SkipRuleEngine {
    ctx: EngineContext,
}

impl SkipRuleEngine {
    pub fn new(ctx: EngineContext) -> Self {
        Self { ctx }
    }

    /// Rules for the location's current answers. A location without an
    /// onboarding record is evaluated as if nothing were answered.
    pub async fn get_skip_rules(&self, location_id: &str) -> EngineResult<Vec<SkipRule>> {
        let onboarding = self
            .ctx
            .store
            .get_onboarding(location_id)
            .await?
            .unwrap_or_default();
        let rules = skip_rules::get_skip_rules(&onboarding, &self.ctx.knowledge);

        tracing::debug!(
            location_id,
            skipped = rules.iter().filter(|r| r.should_skip).count(),
            "Skip rules evaluated",
        );
        Ok(rules)
    }

    /// The known call-forwarding answer for the location's provider, if any.
    pub async fn known_call_forwarding(&self, location_id: &str) -> EngineResult<Option<bool>> {
        let onboarding: LocationOnboarding = self
            .ctx
            .store
            .get_onboarding(location_id)
            .await?
            .unwrap_or_default();
        Ok(skip_rules::known_call_forwarding(
            &onboarding,
            &self.ctx.knowledge,
        ))
    }
}
