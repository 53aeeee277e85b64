//! Questions the wizard can hide because the answer is already known or
//! the question does not apply.

use serde::Serialize;

use crate::onboarding::{LocationOnboarding, PhoneSystemType};

// ---------------------------------------------------------------------------
// Field names
// ---------------------------------------------------------------------------

pub const FIELD_CALL_FORWARDING: &str = "callForwardingSupported";
pub const FIELD_WANTS_FAX_IN_VOICE_STACK: &str = "wantsFaxInVoiceStack";

/// Every IVR detail question, hidden together when IVR is declined.
pub const IVR_FIELDS: &[&str] = &[
    "ivrScript",
    "ivrRetryAttempts",
    "ivrWaitTime",
    "ivrInvalidSelectionScript",
    "ivrAfterRetriesTarget",
    "ivrOptions",
];

// ---------------------------------------------------------------------------
// Knowledge table
// ---------------------------------------------------------------------------

/// A provider whose call-forwarding support is known in advance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderFact {
    pub system_type: PhoneSystemType,
    pub provider: String,
    pub supports_call_forwarding: bool,
}

const DEFAULT_PROVIDER_FACTS: &[(PhoneSystemType, &str, bool)] = &[
    (PhoneSystemType::Voip, "RingCentral", true),
    (PhoneSystemType::Voip, "8x8", true),
    (PhoneSystemType::Voip, "Nextiva", true),
    (PhoneSystemType::Voip, "Vonage", true),
    (PhoneSystemType::Voip, "Ooma", true),
    (PhoneSystemType::Voip, "Grasshopper", true),
    (PhoneSystemType::Voip, "Google Voice", false),
    (PhoneSystemType::Landline, "AT&T", true),
    (PhoneSystemType::Landline, "Verizon", true),
    (PhoneSystemType::Landline, "Comcast Business", true),
    (PhoneSystemType::Landline, "Spectrum Business", false),
];

/// Static table of what is known about common providers.
#[derive(Debug, Clone)]
pub struct ProviderKnowledge {
    facts: Vec<ProviderFact>,
}

impl Default for ProviderKnowledge {
    fn default() -> Self {
        Self {
            facts: DEFAULT_PROVIDER_FACTS
                .iter()
                .map(|(system_type, provider, supports)| ProviderFact {
                    system_type: *system_type,
                    provider: provider.to_string(),
                    supports_call_forwarding: *supports,
                })
                .collect(),
        }
    }
}

impl ProviderKnowledge {
    pub fn new(facts: Vec<ProviderFact>) -> Self {
        Self { facts }
    }

    /// Case-insensitive lookup on provider name within a system type.
    pub fn call_forwarding(&self, system_type: PhoneSystemType, provider: &str) -> Option<bool> {
        let provider = provider.trim();
        self.facts
            .iter()
            .find(|f| f.system_type == system_type && f.provider.eq_ignore_ascii_case(provider))
            .map(|f| f.supports_call_forwarding)
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkipRule {
    pub field: String,
    pub should_skip: bool,
    pub reason: String,
}

impl SkipRule {
    fn new(field: &str, should_skip: bool, reason: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            should_skip,
            reason: reason.into(),
        }
    }
}

/// Evaluate every skip rule against the current onboarding snapshot.
///
/// One rule is returned per governed field, whether or not it is skipped.
pub fn get_skip_rules(onboarding: &LocationOnboarding, knowledge: &ProviderKnowledge) -> Vec<SkipRule> {
    let mut rules = Vec::with_capacity(IVR_FIELDS.len() + 2);

    let known = onboarding
        .phone_system_type
        .zip(onboarding.provider_name())
        .and_then(|(system_type, provider)| {
            knowledge
                .call_forwarding(system_type, provider)
                .map(|supported| (provider, supported))
        });
    rules.push(match known {
        Some((provider, supported)) => SkipRule::new(
            FIELD_CALL_FORWARDING,
            true,
            format!(
                "{provider} is known to {} call forwarding",
                if supported { "support" } else { "not support" }
            ),
        ),
        None => SkipRule::new(
            FIELD_CALL_FORWARDING,
            false,
            "Call forwarding support is not known for this provider",
        ),
    });

    // Only an explicit "no" hides the IVR questions.
    let ivr_declined = onboarding.has_ivr == Some(false);
    for field in IVR_FIELDS {
        rules.push(if ivr_declined {
            SkipRule::new(field, true, "IVR is not enabled")
        } else {
            SkipRule::new(field, false, "IVR is enabled or not yet answered")
        });
    }

    rules.push(match onboarding.uses_fax {
        Some(false) => SkipRule::new(
            FIELD_WANTS_FAX_IN_VOICE_STACK,
            false,
            "Customer does not use fax today",
        ),
        Some(true) => SkipRule::new(
            FIELD_WANTS_FAX_IN_VOICE_STACK,
            true,
            "Customer already uses fax",
        ),
        None => SkipRule::new(
            FIELD_WANTS_FAX_IN_VOICE_STACK,
            true,
            "Fax usage has not been answered",
        ),
    });

    rules
}

/// The known call-forwarding answer, for pre-filling a skipped question.
pub fn known_call_forwarding(
    onboarding: &LocationOnboarding,
    knowledge: &ProviderKnowledge,
) -> Option<bool> {
    let system_type = onboarding.phone_system_type?;
    knowledge.call_forwarding(system_type, onboarding.provider_name()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule<'a>(rules: &'a [SkipRule], field: &str) -> &'a SkipRule {
        rules.iter().find(|r| r.field == field).unwrap()
    }

    #[test]
    fn test_known_provider_skips_call_forwarding_case_insensitively() {
        let onboarding = LocationOnboarding {
            phone_system_type: Some(PhoneSystemType::Voip),
            voip_type: Some("ringcentral".into()),
            ..Default::default()
        };
        let rules = get_skip_rules(&onboarding, &ProviderKnowledge::default());
        let cf = rule(&rules, FIELD_CALL_FORWARDING);
        assert!(cf.should_skip);
        assert!(cf.reason.contains("support call forwarding"));
    }

    #[test]
    fn test_provider_under_wrong_system_type_is_unknown() {
        let onboarding = LocationOnboarding {
            phone_system_type: Some(PhoneSystemType::Landline),
            phone_system_details: Some("RingCentral".into()),
            ..Default::default()
        };
        let rules = get_skip_rules(&onboarding, &ProviderKnowledge::default());
        assert!(!rule(&rules, FIELD_CALL_FORWARDING).should_skip);
    }

    #[test]
    fn test_known_negative_answer_is_still_skipped() {
        let onboarding = LocationOnboarding {
            phone_system_type: Some(PhoneSystemType::Landline),
            phone_system_details: Some(" spectrum business ".into()),
            ..Default::default()
        };
        let knowledge = ProviderKnowledge::default();
        assert!(rule(&get_skip_rules(&onboarding, &knowledge), FIELD_CALL_FORWARDING).should_skip);
        assert_eq!(known_call_forwarding(&onboarding, &knowledge), Some(false));
    }

    #[test]
    fn test_ivr_fields_skip_only_on_explicit_false() {
        let knowledge = ProviderKnowledge::default();
        let mut onboarding = LocationOnboarding::default();

        let rules = get_skip_rules(&onboarding, &knowledge);
        assert!(IVR_FIELDS.iter().all(|f| !rule(&rules, f).should_skip));

        onboarding.has_ivr = Some(false);
        let rules = get_skip_rules(&onboarding, &knowledge);
        assert!(IVR_FIELDS.iter().all(|f| rule(&rules, f).should_skip));

        onboarding.has_ivr = Some(true);
        let rules = get_skip_rules(&onboarding, &knowledge);
        assert!(IVR_FIELDS.iter().all(|f| !rule(&rules, f).should_skip));
    }

    #[test]
    fn test_fax_question_asked_only_when_fax_not_used() {
        let knowledge = ProviderKnowledge::default();
        let mut onboarding = LocationOnboarding::default();
        assert!(rule(&get_skip_rules(&onboarding, &knowledge), FIELD_WANTS_FAX_IN_VOICE_STACK).should_skip);

        onboarding.uses_fax = Some(true);
        assert!(rule(&get_skip_rules(&onboarding, &knowledge), FIELD_WANTS_FAX_IN_VOICE_STACK).should_skip);

        onboarding.uses_fax = Some(false);
        assert!(!rule(&get_skip_rules(&onboarding, &knowledge), FIELD_WANTS_FAX_IN_VOICE_STACK).should_skip);
    }
}
