//! Assemble a [`ProvisioningPayload`] from loaded records.
//!
//! Deterministic for fixed inputs: the only time-dependent fields are
//! `timestamp` and `metadata.generatedAt`, both taken from `now`.

use std::collections::HashSet;

use super::payload::*;
use crate::device::{AssignmentType, Phone};
use crate::location::{Account, Location, User};
use crate::onboarding::LocationOnboarding;
use crate::types::Timestamp;

/// Everything the generator reads, already loaded from the store.
#[derive(Debug, Clone, Copy)]
pub struct PayloadSource<'a> {
    pub account: &'a Account,
    pub location: &'a Location,
    pub onboarding: &'a LocationOnboarding,
    pub phones: &'a [Phone],
    /// Users that phones may be assigned to.
    pub users: &'a [User],
}

pub fn build_payload(source: PayloadSource<'_>, version: &str, now: Timestamp) -> ProvisioningPayload {
    let PayloadSource {
        account,
        location,
        onboarding,
        phones,
        users,
    } = source;

    ProvisioningPayload {
        location_id: location.id.clone(),
        location_name: location.name.clone(),
        account_id: account.id.clone(),
        account_name: account.name.clone(),
        timestamp: now,
        version: version.to_string(),
        location: PayloadLocation {
            id: location.id.clone(),
            name: location.name.clone(),
            address: PayloadAddress {
                line1: location.address.line1.clone(),
                line2: location.address.line2.clone(),
                city: location.address.city.clone(),
                state: location.address.state.clone(),
                zipcode: location.address.zipcode.clone(),
            },
        },
        contacts: PayloadContacts {
            primary: PrimaryContact {
                name: onboarding.poc_name.clone().unwrap_or_default(),
                email: onboarding.poc_email.clone().unwrap_or_default(),
                phone: onboarding.poc_phone.clone().unwrap_or_default(),
                preferred_contact_medium: onboarding.preferred_contact_medium,
            },
        },
        phone_system: PayloadPhoneSystem {
            system_type: onboarding.phone_system_type,
            provider: onboarding.provider_name().map(str::to_string),
            call_forwarding_supported: onboarding.call_forwarding_supported,
            fax: PayloadFax {
                uses_fax: onboarding.uses_fax.unwrap_or(false),
                fax_number: onboarding.fax_number.clone(),
                wants_fax_in_voice_stack: onboarding.wants_fax_in_voice_stack,
            },
        },
        devices: phones.iter().map(device).collect(),
        users: assigned_users(phones, users),
        extensions: phones.iter().filter_map(extension).collect(),
        working_hours: PayloadWorkingHours {
            timezone: onboarding.timezone.clone(),
            days: onboarding.working_hours.clone(),
        },
        call_flow: call_flow(onboarding),
        metadata: PayloadMetadata {
            onboarding_id: onboarding.id.clone(),
            status: onboarding.status,
            submitted_at: onboarding.submitted_at,
            generated_at: now,
            copied_from_location_id: onboarding.copied_from_location_id.clone(),
        },
    }
}

fn device(phone: &Phone) -> PayloadDevice {
    PayloadDevice {
        id: phone.id.clone(),
        brand: phone.brand.clone(),
        model: phone.model.clone(),
        ownership: phone.ownership,
        assignment_type: phone.assignment_type,
        assigned_user_id: phone.assigned_user_id.clone(),
        mac_address: phone.mac_address.clone(),
        serial_number: phone.serial_number.clone(),
        extension: phone.extension.clone(),
        device_types: phone.device_types.clone(),
    }
}

/// Users with a user-assigned phone, in phone order. A user holding several
/// phones appears once, with the extension of the first.
fn assigned_users(phones: &[Phone], users: &[User]) -> Vec<PayloadUser> {
    let mut seen = HashSet::new();
    phones
        .iter()
        .filter(|p| p.assignment_type == AssignmentType::AssignedToUser)
        .filter_map(|p| {
            let user_id = p.user_id()?;
            let user = users.iter().find(|u| u.id == user_id)?;
            Some((p, user))
        })
        .filter(|(_, user)| seen.insert(user.id.clone()))
        .map(|(phone, user)| PayloadUser {
            id: user.id.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            extension: phone.extension.clone(),
        })
        .collect()
}

fn extension_holder(phone: &Phone) -> ExtensionHolder {
    match phone.assignment_type {
        AssignmentType::AssignedToExtension => ExtensionHolder::Extension,
        AssignmentType::AssignedToUser if phone.user_id().is_some() => ExtensionHolder::User,
        AssignmentType::AssignedToUser => ExtensionHolder::Shared,
    }
}

fn extension(phone: &Phone) -> Option<PayloadExtension> {
    let extension = phone.extension.clone()?;
    let assigned_to = extension_holder(phone);
    Some(PayloadExtension {
        extension,
        assigned_to,
        device_id: phone.id.clone(),
        user_id: match assigned_to {
            ExtensionHolder::User => phone.user_id().map(str::to_string),
            _ => None,
        },
    })
}

fn call_flow(onboarding: &LocationOnboarding) -> PayloadCallFlow {
    let has_ivr = onboarding.is_ivr_enabled();

    let ivr = has_ivr.then(|| PayloadIvr {
        script: onboarding.ivr_script.clone(),
        retry_attempts: onboarding.ivr_retry_attempts,
        wait_time: onboarding.ivr_wait_time,
        invalid_selection_script: onboarding.ivr_invalid_selection_script.clone(),
        after_retries_target: onboarding.ivr_after_retries_target.clone(),
        options: onboarding
            .ivr_options
            .iter()
            .map(|o| PayloadIvrOption {
                option_number: o.option_number.clone(),
                ring_type: o.ring_type,
                label: o.label.clone(),
                targets: o.populated_targets().cloned().collect(),
            })
            .collect(),
    });

    let direct_routing = (!has_ivr).then(|| PayloadDirectRouting {
        users: onboarding.direct_ring_users.clone(),
        extensions: onboarding.direct_ring_extensions.clone(),
    });

    PayloadCallFlow {
        has_ivr,
        greeting_message: onboarding.greeting_message.clone(),
        ivr,
        direct_routing,
        voicemail: PayloadVoicemail {
            script: onboarding.voicemail_script.clone(),
            shared_users: onboarding.shared_voicemail_users.clone(),
        },
    }
}
