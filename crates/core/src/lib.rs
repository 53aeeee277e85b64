//! Onboarding rules for the VoiceStack business phone system.
//!
//! Everything in this crate is pure: callers load records from a store and
//! pass them in, and nothing here performs I/O.

pub mod approval;
pub mod device;
pub mod error;
pub mod extensions;
pub mod location;
pub mod onboarding;
pub mod provisioning;
pub mod session;
pub mod skip_rules;
pub mod types;
pub mod validation;
pub mod warnings;
