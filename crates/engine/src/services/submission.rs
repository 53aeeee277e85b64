use voicestack_core::onboarding::LocationOnboarding;
use voicestack_core::validation::{self, ValidationResult};

use crate::context::EngineContext;
use crate::error::EngineResult;

/// Runs the submission rule set against a location's stored data.
#[derive(Clone)]
pub struct SubmissionValidator {
    ctx: EngineContext,
}

impl SubmissionValidator {
    pub fn new(ctx: EngineContext) -> Self {
        Self { ctx }
    }

    /// Validate the location for submission.
    ///
    /// Only store failures are returned as errors. A location with no
    /// onboarding record is validated as a blank questionnaire.
    pub async fn validate_onboarding_for_submission(
        &self,
        location_id: &str,
    ) -> EngineResult<ValidationResult> {
        let onboarding = match self.ctx.store.get_onboarding(location_id).await? {
            Some(onboarding) => onboarding,
            None => LocationOnboarding::new(location_id, self.ctx.now()),
        };
        let phones = self.ctx.store.list_phones(location_id).await?;

        let result = validation::validate_onboarding_for_submission(&onboarding, &phones);
        tracing::debug!(
            location_id,
            is_valid = result.is_valid,
            errors = result.errors.len(),
            warnings = result.warnings.len(),
            "Submission validation finished",
        );
        Ok(result)
    }
}
