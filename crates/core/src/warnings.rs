//! Dashboard blockers and warnings.
//!
//! Blockers stop a location from moving forward (pending approvals,
//! unsupported phones). Warnings flag data that is probably incomplete but
//! does not block anything on its own.

use serde::Serialize;

use crate::device::Phone;
use crate::onboarding::{
    DeviceOwnershipDecision, LocationOnboarding, OwnedDevices, PurchaseDecision,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationBlockers {
    pub pending_approvals: usize,
    pub has_unsupported_phones: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationWarningFlags {
    pub missing_devices: bool,
    pub incomplete_call_flow: bool,
}

/// Blockers and warnings for one location. The default is the "nothing to
/// report" value used whenever the inputs cannot be computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationWarnings {
    pub blockers: LocationBlockers,
    pub warnings: LocationWarningFlags,
}

/// Compute a location's warnings from already-loaded inputs.
///
/// Without an onboarding record only the phone- and approval-derived
/// blockers can be known; both warning flags stay `false`.
pub fn location_warnings(
    onboarding: Option<&LocationOnboarding>,
    phones: &[Phone],
    pending_approvals: usize,
) -> LocationWarnings {
    LocationWarnings {
        blockers: LocationBlockers {
            pending_approvals,
            has_unsupported_phones: phones.iter().any(|p| p.is_unsupported),
        },
        warnings: LocationWarningFlags {
            missing_devices: onboarding.is_some_and(|o| missing_devices(o, phones.len())),
            incomplete_call_flow: onboarding.is_some_and(incomplete_call_flow),
        },
    }
}

/// Whether the location looks like it has no devices described yet.
///
/// Unanswered questions never count as missing: there is nothing to judge
/// until the customer has picked a branch.
pub fn missing_devices(onboarding: &LocationOnboarding, phone_count: usize) -> bool {
    let purchase_flow_missing = |purchase: PurchaseDecision| match purchase {
        PurchaseDecision::Unanswered => false,
        PurchaseDecision::ManualEntry => phone_count == 0,
        PurchaseDecision::Catalog => onboarding.device_catalog_selections.is_empty(),
    };

    match onboarding.device_decision() {
        DeviceOwnershipDecision::Legacy => match onboarding.total_devices {
            Some(total) => total == 0,
            None => phone_count == 0,
        },
        DeviceOwnershipDecision::Unanswered => false,
        DeviceOwnershipDecision::Owned(OwnedDevices::Unanswered) => false,
        DeviceOwnershipDecision::Owned(OwnedDevices::YealinkOrPolycom) => phone_count == 0,
        DeviceOwnershipDecision::Owned(OwnedDevices::OtherBrand(purchase))
        | DeviceOwnershipDecision::NotOwned(purchase) => purchase_flow_missing(purchase),
    }
}

/// Whether calls have nowhere to go yet.
pub fn incomplete_call_flow(onboarding: &LocationOnboarding) -> bool {
    if onboarding.is_ivr_enabled() {
        onboarding.ivr_options.is_empty()
            || onboarding.ivr_options.iter().any(|o| o.targets.is_empty())
    } else {
        onboarding.direct_ring_users.is_empty() && onboarding.direct_ring_extensions.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Account rollup
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountBlockers {
    /// Total pending approvals across all locations.
    pub pending_approvals: usize,
    /// Number of locations with at least one unsupported phone.
    pub locations_with_unsupported_phones: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountWarningCounts {
    pub locations_missing_devices: usize,
    pub locations_with_incomplete_call_flow: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountWarnings {
    pub location_count: usize,
    pub blockers: AccountBlockers,
    pub warnings: AccountWarningCounts,
}

/// Roll location results up to account level; flags become location counts.
pub fn aggregate_account_warnings<'a>(
    locations: impl IntoIterator<Item = &'a LocationWarnings>,
) -> AccountWarnings {
    locations
        .into_iter()
        .fold(AccountWarnings::default(), |mut acc, loc| {
            acc.location_count += 1;
            acc.blockers.pending_approvals += loc.blockers.pending_approvals;
            acc.blockers.locations_with_unsupported_phones +=
                usize::from(loc.blockers.has_unsupported_phones);
            acc.warnings.locations_missing_devices += usize::from(loc.warnings.missing_devices);
            acc.warnings.locations_with_incomplete_call_flow +=
                usize::from(loc.warnings.incomplete_call_flow);
            acc
        })
}
