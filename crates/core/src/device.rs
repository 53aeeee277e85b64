//! Phones at a location and the supported-device rules.
//!
//! Support is brand-gated: only Yealink and Polycom are supported, and for
//! those brands the model must be on the active model list. Warnings are a
//! separate, non-blocking check about how complete a phone record is.

use serde::{Deserialize, Serialize};

use crate::types::{is_blank, EntityId};

// ---------------------------------------------------------------------------
// Phone record
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhoneOwnership {
    #[default]
    Owned,
    Leased,
}

impl PhoneOwnership {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owned => "OWNED",
            Self::Leased => "LEASED",
        }
    }
}

/// How a phone is assigned. Legacy `COMMON` records read as
/// `ASSIGNED_TO_EXTENSION`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentType {
    #[default]
    AssignedToUser,
    #[serde(alias = "COMMON")]
    AssignedToExtension,
}

impl AssignmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AssignedToUser => "ASSIGNED_TO_USER",
            Self::AssignedToExtension => "ASSIGNED_TO_EXTENSION",
        }
    }
}

/// A desk phone at a location.
///
/// `is_unsupported`, `has_warnings` and `warning_reason` are derived; they
/// are overwritten by [`DeviceCatalog::validate_device`] and
/// [`compute_device_warnings`] on every write and never trusted as input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Phone {
    pub id: EntityId,
    pub location_id: EntityId,
    pub brand: String,
    pub model: String,
    pub ownership: PhoneOwnership,
    pub assignment_type: AssignmentType,
    pub assigned_user_id: Option<EntityId>,
    pub mac_address: Option<String>,
    pub serial_number: Option<String>,
    pub extension: Option<String>,
    pub is_unsupported: bool,
    pub device_types: Vec<String>,
    pub has_warnings: bool,
    pub warning_reason: Option<String>,
}

impl Phone {
    /// The assigned user, if any non-blank id is set.
    pub fn user_id(&self) -> Option<&str> {
        self.assigned_user_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
    }

    /// The extension, if any non-blank value is set.
    pub fn extension_number(&self) -> Option<&str> {
        self.extension.as_deref().filter(|e| !e.trim().is_empty())
    }

    /// Short label used in validation messages, e.g. `Phone 2 (YEALINK T46S)`.
    pub fn label(&self, index: usize) -> String {
        format!("Phone {} ({} {})", index + 1, self.brand, self.model)
    }

    /// Overwrite every derived field from the authoritative ones.
    pub fn refresh_derived(&mut self, catalog: &DeviceCatalog) {
        self.is_unsupported = !catalog.validate_device(&self.brand, &self.model).is_supported;
        let warnings = compute_device_warnings(self);
        self.has_warnings = warnings.has_warnings;
        self.warning_reason = warnings.reason;
    }
}

// ---------------------------------------------------------------------------
// Supported devices
// ---------------------------------------------------------------------------

/// Brands VoiceStack provisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SupportedBrand {
    Yealink,
    Polycom,
}

impl SupportedBrand {
    /// Exact match on the brand enum spelling; anything else is not a
    /// supported brand.
    pub fn parse(brand: &str) -> Option<Self> {
        match brand {
            "YEALINK" => Some(Self::Yealink),
            "POLYCOM" => Some(Self::Polycom),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yealink => "YEALINK",
            Self::Polycom => "POLYCOM",
        }
    }
}

pub const DEFAULT_YEALINK_MODELS: &[&str] = &[
    "T33G", "T43U", "T46S", "T46U", "T48S", "T48U", "T53W", "T54W", "T57W", "W60P",
];

pub const DEFAULT_POLYCOM_MODELS: &[&str] = &[
    "VVX 250", "VVX 350", "VVX 450", "CCX 400", "CCX 500", "CCX 600", "SoundPoint IP 331",
];

/// An entry in the supported model list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportedModel {
    pub brand: SupportedBrand,
    pub model: String,
    pub active: bool,
}

/// Outcome of checking one brand/model pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceValidation {
    /// Both brand and model were provided.
    pub is_valid: bool,
    pub is_supported: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// The supported model list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceCatalog {
    models: Vec<SupportedModel>,
}

impl Default for DeviceCatalog {
    fn default() -> Self {
        Self::from_lists(DEFAULT_YEALINK_MODELS, DEFAULT_POLYCOM_MODELS)
    }
}

impl DeviceCatalog {
    pub fn new(models: Vec<SupportedModel>) -> Self {
        Self { models }
    }

    /// Build a catalog where every listed model is active.
    pub fn from_lists<Y, P>(yealink: &[Y], polycom: &[P]) -> Self
    where
        Y: AsRef<str>,
        P: AsRef<str>,
    {
        let entry = |brand, model: &str| SupportedModel {
            brand,
            model: model.to_string(),
            active: true,
        };
        let models = yealink
            .iter()
            .map(|m| entry(SupportedBrand::Yealink, m.as_ref()))
            .chain(polycom.iter().map(|m| entry(SupportedBrand::Polycom, m.as_ref())))
            .collect();
        Self { models }
    }

    /// Active models for a brand, in list order.
    pub fn active_models(&self, brand: SupportedBrand) -> impl Iterator<Item = &str> {
        self.models
            .iter()
            .filter(move |m| m.brand == brand && m.active)
            .map(|m| m.model.as_str())
    }

    /// Classify a brand/model pair. Pure and idempotent.
    ///
    /// Brands other than `YEALINK`/`POLYCOM` are unsupported whatever the
    /// model says. For supported brands the model must match an active entry
    /// exactly (case-sensitive).
    pub fn validate_device(&self, brand: &str, model: &str) -> DeviceValidation {
        let is_valid = !brand.trim().is_empty() && !model.trim().is_empty();

        let Some(supported) = SupportedBrand::parse(brand) else {
            let shown = if brand.trim().is_empty() { "Unknown" } else { brand };
            return DeviceValidation {
                is_valid,
                is_supported: false,
                message: Some(format!(
                    "{shown} devices are not supported. Only Yealink and Polycom phones can be \
                     provisioned; purchase a supported device or choose a different model."
                )),
            };
        };

        if self.active_models(supported).any(|m| m == model) {
            DeviceValidation {
                is_valid,
                is_supported: true,
                message: None,
            }
        } else {
            DeviceValidation {
                is_valid,
                is_supported: false,
                message: Some(format!(
                    "{} {model} is not a supported model. Please purchase a supported device or \
                     choose a different model.",
                    supported.as_str()
                )),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Warnings
// ---------------------------------------------------------------------------

pub const WARNING_NO_DEVICE_TYPES: &str = "No device types selected";
pub const WARNING_NO_USER: &str = "No user assigned";
pub const WARNING_NO_EXTENSION: &str = "No extension assigned";

/// Non-blocking completeness warnings for one phone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceWarnings {
    pub has_warnings: bool,
    pub reason: Option<String>,
}

/// Compute completeness warnings; reasons are joined with `"; "`.
pub fn compute_device_warnings(phone: &Phone) -> DeviceWarnings {
    let mut reasons: Vec<&str> = Vec::new();

    if phone.device_types.is_empty() {
        reasons.push(WARNING_NO_DEVICE_TYPES);
    }
    match phone.assignment_type {
        AssignmentType::AssignedToUser if is_blank(phone.assigned_user_id.as_deref()) => {
            reasons.push(WARNING_NO_USER)
        }
        AssignmentType::AssignedToExtension if is_blank(phone.extension.as_deref()) => {
            reasons.push(WARNING_NO_EXTENSION)
        }
        _ => {}
    }

    DeviceWarnings {
        has_warnings: !reasons.is_empty(),
        reason: (!reasons.is_empty()).then(|| reasons.join("; ")),
    }
}
