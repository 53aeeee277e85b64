//! Structural self-check of a generated payload.
//!
//! This only checks that the payload has the minimum a provisioner needs.
//! The full onboarding rules run earlier, before submission.

use serde::Serialize;

use super::payload::ProvisioningPayload;

pub const LOCATION_NAME_REQUIRED: &str = "Location name is required";
pub const PRIMARY_EMAIL_REQUIRED: &str = "Primary contact email is required";
pub const DEVICE_REQUIRED: &str = "At least one device is required";
pub const PHONE_SYSTEM_TYPE_REQUIRED: &str = "Phone system type is required";
pub const IVR_BLOCK_REQUIRED: &str = "IVR configuration is required when IVR is enabled";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PayloadValidation {
    pub valid: bool,
    pub errors: Vec<String>,
}

pub fn validate_payload(payload: &ProvisioningPayload) -> PayloadValidation {
    let mut errors = Vec::new();

    if payload.location_name.trim().is_empty() {
        errors.push(LOCATION_NAME_REQUIRED.to_string());
    }
    if payload.contacts.primary.email.trim().is_empty() {
        errors.push(PRIMARY_EMAIL_REQUIRED.to_string());
    }
    if payload.devices.is_empty() {
        errors.push(DEVICE_REQUIRED.to_string());
    }
    if payload.phone_system.system_type.is_none() {
        errors.push(PHONE_SYSTEM_TYPE_REQUIRED.to_string());
    }
    if payload.call_flow.has_ivr && payload.call_flow.ivr.is_none() {
        errors.push(IVR_BLOCK_REQUIRED.to_string());
    }

    PayloadValidation {
        valid: errors.is_empty(),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provisioning::payload::*;
    use crate::types::Timestamp;

    fn payload() -> ProvisioningPayload {
        ProvisioningPayload {
            location_id: "L1".into(),
            location_name: "Downtown".into(),
            account_id: "A1".into(),
            account_name: "Acme".into(),
            timestamp: Timestamp::default(),
            version: PAYLOAD_VERSION.into(),
            location: PayloadLocation {
                id: "L1".into(),
                name: "Downtown".into(),
                address: PayloadAddress {
                    line1: "1 Main St".into(),
                    line2: None,
                    city: "Austin".into(),
                    state: "TX".into(),
                    zipcode: "78701".into(),
                },
            },
            contacts: PayloadContacts {
                primary: PrimaryContact {
                    name: "Dana".into(),
                    email: "dana@example.com".into(),
                    phone: "555-0100".into(),
                    preferred_contact_medium: None,
                },
            },
            phone_system: PayloadPhoneSystem {
                system_type: Some(crate::onboarding::PhoneSystemType::Pbx),
                provider: None,
                call_forwarding_supported: None,
                fax: PayloadFax {
                    uses_fax: false,
                    fax_number: None,
                    wants_fax_in_voice_stack: Some(false),
                },
            },
            devices: vec![PayloadDevice {
                id: "phone-1".into(),
                brand: "YEALINK".into(),
                model: "T46S".into(),
                ownership: Default::default(),
                assignment_type: Default::default(),
                assigned_user_id: None,
                mac_address: None,
                serial_number: None,
                extension: None,
                device_types: vec![],
            }],
            users: vec![],
            extensions: vec![],
            working_hours: PayloadWorkingHours {
                timezone: None,
                days: vec![],
            },
            call_flow: PayloadCallFlow {
                has_ivr: false,
                greeting_message: None,
                ivr: None,
                direct_routing: None,
                voicemail: PayloadVoicemail::default(),
            },
            metadata: PayloadMetadata {
                onboarding_id: "onboarding-L1".into(),
                status: Default::default(),
                submitted_at: None,
                generated_at: Timestamp::default(),
                copied_from_location_id: None,
            },
        }
    }

    #[test]
    fn test_minimal_payload_is_valid() {
        let result = validate_payload(&payload());
        assert!(result.valid, "{:?}", result.errors);
    }

    #[test]
    fn test_every_structural_gap_is_reported() {
        let mut p = payload();
        p.location_name = " ".into();
        p.contacts.primary.email.clear();
        p.devices.clear();
        p.phone_system.system_type = None;
        let result = validate_payload(&p);
        assert!(!result.valid);
        assert_eq!(
            result.errors,
            vec![
                LOCATION_NAME_REQUIRED,
                PRIMARY_EMAIL_REQUIRED,
                DEVICE_REQUIRED,
                PHONE_SYSTEM_TYPE_REQUIRED
            ]
        );
    }

    #[test]
    fn test_ivr_flag_requires_ivr_block() {
        let mut p = payload();
        p.call_flow.has_ivr = true;
        assert_eq!(validate_payload(&p).errors, vec![IVR_BLOCK_REQUIRED]);
        p.call_flow.ivr = Some(PayloadIvr {
            script: Some("Welcome".into()),
            retry_attempts: None,
            wait_time: None,
            invalid_selection_script: None,
            after_retries_target: None,
            options: vec![],
        });
        assert!(validate_payload(&p).valid);
    }
}
