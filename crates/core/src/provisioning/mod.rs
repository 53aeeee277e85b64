//! Provisioning payload handed to the downstream provisioning system.
//!
//! The payload is a projection of location, account, onboarding, phones and
//! users. Its JSON shape is an external contract: field names and enum
//! spellings must not drift.

pub mod generator;
pub mod payload;
pub mod validate;

pub use generator::{build_payload, PayloadSource};
pub use payload::{ExtensionHolder, ProvisioningPayload, PAYLOAD_VERSION};
pub use validate::{validate_payload, PayloadValidation};
