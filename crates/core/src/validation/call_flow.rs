//! Call-flow checks for both routing modes: IVR menu or direct ring.

use super::result::{IssueCategory, ValidationResult};
use crate::onboarding::LocationOnboarding;
use crate::types::is_blank;

pub const NO_GREETING: &str = "No greeting message has been provided";
pub const IVR_SCRIPT_REQUIRED: &str = "IVR script is required when IVR is enabled";
pub const IVR_RETRY_NEGATIVE: &str = "IVR retry attempts cannot be negative";
pub const IVR_WAIT_NEGATIVE: &str = "IVR wait time cannot be negative";
pub const IVR_AFTER_RETRIES_REQUIRED: &str =
    "A destination after IVR retries is required when retry attempts are configured";
pub const IVR_OPTION_REQUIRED: &str = "At least one IVR option is required when IVR is enabled";
pub const DIRECT_TARGET_REQUIRED: &str =
    "At least one direct routing target (user or extension) is required when IVR is disabled";
pub const NO_VOICEMAIL_SCRIPT: &str = "No voicemail script has been provided";

/// Validate the call flow.
///
/// Anything other than an explicit `hasIVR = true` is checked as direct
/// routing. Duplicate option digits are not checked.
pub fn validate_call_flow(onboarding: &LocationOnboarding) -> ValidationResult {
    let mut result = ValidationResult::new();

    if is_blank(onboarding.greeting_message.as_deref()) {
        result.warning(IssueCategory::CallFlow, "greetingMessage", NO_GREETING);
    }

    if onboarding.is_ivr_enabled() {
        validate_ivr(onboarding, &mut result);
    } else {
        validate_direct_routing(onboarding, &mut result);
    }

    result
}

fn validate_ivr(onboarding: &LocationOnboarding, result: &mut ValidationResult) {
    if is_blank(onboarding.ivr_script.as_deref()) {
        result.error(IssueCategory::CallFlow, "ivrScript", IVR_SCRIPT_REQUIRED);
    }
    if onboarding.ivr_retry_attempts.is_some_and(|n| n < 0) {
        result.error(IssueCategory::CallFlow, "ivrRetryAttempts", IVR_RETRY_NEGATIVE);
    }
    if onboarding.ivr_wait_time.is_some_and(|n| n < 0) {
        result.error(IssueCategory::CallFlow, "ivrWaitTime", IVR_WAIT_NEGATIVE);
    }
    if onboarding.ivr_retry_attempts.is_some_and(|n| n > 0)
        && is_blank(onboarding.ivr_after_retries_target.as_deref())
    {
        result.error(
            IssueCategory::CallFlow,
            "ivrAfterRetriesTarget",
            IVR_AFTER_RETRIES_REQUIRED,
        );
    }

    if onboarding.ivr_options.is_empty() {
        result.error(IssueCategory::CallFlow, "ivrOptions", IVR_OPTION_REQUIRED);
        return;
    }

    for (idx, option) in onboarding.ivr_options.iter().enumerate() {
        let position = idx + 1;
        if option.option_number.trim().is_empty() {
            result.error(
                IssueCategory::CallFlow,
                "ivrOptions",
                format!("IVR option {position} requires an option number"),
            );
        }
        if option.populated_targets().next().is_none() {
            result.error(
                IssueCategory::CallFlow,
                "ivrOptions",
                format!("IVR option {position} requires at least one user or extension target"),
            );
        }
    }
}

fn validate_direct_routing(onboarding: &LocationOnboarding, result: &mut ValidationResult) {
    if onboarding.direct_ring_users.is_empty() && onboarding.direct_ring_extensions.is_empty() {
        result.error(
            IssueCategory::CallFlow,
            "directRingUsers",
            DIRECT_TARGET_REQUIRED,
        );
    }
    if is_blank(onboarding.voicemail_script.as_deref()) {
        result.warning(IssueCategory::CallFlow, "voicemailScript", NO_VOICEMAIL_SCRIPT);
    }
}
