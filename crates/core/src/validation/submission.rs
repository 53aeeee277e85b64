//! The full rule set run before an onboarding can be submitted for approval.

use super::call_flow::validate_call_flow;
use super::result::{IssueCategory, ValidationResult};
use super::working_hours::validate_working_hours_overlaps;
use crate::device::{AssignmentType, Phone};
use crate::onboarding::{
    DeviceOwnershipDecision, LocationOnboarding, OwnedDevices, PurchaseDecision,
};
use crate::types::is_blank;

pub const POC_NAME_REQUIRED: &str = "Point of contact name is required";
pub const POC_EMAIL_REQUIRED: &str = "Point of contact email is required";
pub const POC_PHONE_REQUIRED: &str = "Point of contact phone is required";
pub const PHONE_SYSTEM_REQUIRED: &str = "Phone system type is required";
pub const FAX_USAGE_REQUIRED: &str = "Please indicate whether you use fax";
pub const FAX_NUMBER_REQUIRED: &str = "Fax number is required when you use fax";
pub const FAX_IN_VOICE_STACK_REQUIRED: &str =
    "VoiceStack fax question must be answered when you do not use fax";
pub const OWNERSHIP_REQUIRED: &str = "Device ownership must be answered";
pub const YEALINK_OR_POLYCOM_REQUIRED: &str =
    "Please indicate whether your phones are Yealink or Polycom";
pub const PURCHASE_DECISION_REQUIRED: &str =
    "Please indicate whether you want to buy phones through VoiceStack";
pub const CATALOG_SELECTION_REQUIRED: &str =
    "At least one device must be selected from the catalog";
pub const PHONE_REQUIRED: &str = "At least one phone must be added";

/// Run every submission rule, in order, against one snapshot.
///
/// Pure: the same snapshot always produces the same result.
pub fn validate_onboarding_for_submission(
    onboarding: &LocationOnboarding,
    phones: &[Phone],
) -> ValidationResult {
    let mut result = ValidationResult::new();

    validate_basic_details(onboarding, &mut result);

    if onboarding.phone_system_type.is_none() {
        result.error(IssueCategory::PhoneSystem, "phoneSystemType", PHONE_SYSTEM_REQUIRED);
    }

    validate_fax(onboarding, &mut result);

    let decision = onboarding.device_decision();
    validate_ownership(decision, &mut result);
    if decision.uses_catalog() {
        validate_catalog_selections(onboarding, &mut result);
    }
    if decision.uses_manual_entry() {
        validate_phones(phones, &mut result);
    }

    result.merge(validate_call_flow(onboarding));
    result.merge(validate_working_hours_overlaps(&onboarding.working_hours));

    result
}

fn validate_basic_details(onboarding: &LocationOnboarding, result: &mut ValidationResult) {
    let required = [
        (onboarding.poc_name.as_deref(), "pocName", POC_NAME_REQUIRED),
        (onboarding.poc_email.as_deref(), "pocEmail", POC_EMAIL_REQUIRED),
        (onboarding.poc_phone.as_deref(), "pocPhone", POC_PHONE_REQUIRED),
    ];
    for (value, field, message) in required {
        if is_blank(value) {
            result.error(IssueCategory::BasicDetails, field, message);
        }
    }
}

fn validate_fax(onboarding: &LocationOnboarding, result: &mut ValidationResult) {
    match onboarding.uses_fax {
        None => result.error(IssueCategory::Fax, "usesFax", FAX_USAGE_REQUIRED),
        Some(true) => {
            if is_blank(onboarding.fax_number.as_deref()) {
                result.error(IssueCategory::Fax, "faxNumber", FAX_NUMBER_REQUIRED);
            }
        }
        Some(false) => {
            if onboarding.wants_fax_in_voice_stack.is_none() {
                result.error(
                    IssueCategory::Fax,
                    "wantsFaxInVoiceStack",
                    FAX_IN_VOICE_STACK_REQUIRED,
                );
            }
        }
    }
}

fn validate_ownership(decision: DeviceOwnershipDecision, result: &mut ValidationResult) {
    match decision {
        DeviceOwnershipDecision::Legacy | DeviceOwnershipDecision::Unanswered => {
            result.error(IssueCategory::Devices, "deviceOwnership", OWNERSHIP_REQUIRED);
        }
        DeviceOwnershipDecision::Owned(OwnedDevices::Unanswered) => {
            result.error(
                IssueCategory::Devices,
                "hasYealinkOrPolycom",
                YEALINK_OR_POLYCOM_REQUIRED,
            );
        }
        DeviceOwnershipDecision::Owned(OwnedDevices::YealinkOrPolycom) => {}
        DeviceOwnershipDecision::Owned(OwnedDevices::OtherBrand(purchase))
        | DeviceOwnershipDecision::NotOwned(purchase) => {
            if purchase == PurchaseDecision::Unanswered {
                result.error(
                    IssueCategory::Devices,
                    "buyPhonesThroughVoiceStack",
                    PURCHASE_DECISION_REQUIRED,
                );
            }
        }
    }
}

fn validate_catalog_selections(onboarding: &LocationOnboarding, result: &mut ValidationResult) {
    const FIELD: &str = "deviceCatalogSelections";

    if onboarding.device_catalog_selections.is_empty() {
        result.error(IssueCategory::Devices, FIELD, CATALOG_SELECTION_REQUIRED);
        return;
    }

    for (idx, selection) in onboarding.device_catalog_selections.iter().enumerate() {
        let position = idx + 1;
        if selection.brand.trim().is_empty() || selection.model.trim().is_empty() {
            result.error(
                IssueCategory::Devices,
                FIELD,
                format!("Catalog selection {position} requires a brand and model"),
            );
        }
        if selection.quantity <= 0 {
            result.error(
                IssueCategory::Devices,
                FIELD,
                format!("Catalog selection {position} must have a quantity greater than zero"),
            );
        }
        if selection.device_types.is_empty() {
            result.warning(
                IssueCategory::Devices,
                FIELD,
                format!("Catalog selection {position} has no device types selected"),
            );
        }
    }
}

fn validate_phones(phones: &[Phone], result: &mut ValidationResult) {
    const FIELD: &str = "phones";

    if phones.is_empty() {
        result.error(IssueCategory::Devices, FIELD, PHONE_REQUIRED);
        return;
    }

    for (idx, phone) in phones.iter().enumerate() {
        let label = phone.label(idx);
        if phone.device_types.is_empty() {
            result.error(
                IssueCategory::Devices,
                FIELD,
                format!("{label} requires at least one device type"),
            );
        }
        match phone.assignment_type {
            AssignmentType::AssignedToUser if phone.user_id().is_none() => result.error(
                IssueCategory::Devices,
                FIELD,
                format!("{label} must be assigned to a user"),
            ),
            AssignmentType::AssignedToExtension if phone.extension_number().is_none() => result
                .error(
                    IssueCategory::Devices,
                    FIELD,
                    format!("{label} must be assigned to an extension"),
                ),
            _ => {}
        }
        if phone.is_unsupported {
            result.error(
                IssueCategory::Devices,
                FIELD,
                format!(
                    "{label} is not a supported device. Please purchase a supported device or \
                     choose a different model"
                ),
            );
        }
        if phone.has_warnings {
            result.warning(
                IssueCategory::Devices,
                FIELD,
                format!(
                    "{label}: {}",
                    phone.warning_reason.as_deref().unwrap_or("has warnings")
                ),
            );
        }
    }
}
