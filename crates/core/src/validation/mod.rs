//! Onboarding validation engine.
//!
//! Validators never fail: they return a [`ValidationResult`] with blocking
//! errors and non-blocking warnings so callers can show partial feedback.

pub mod call_flow;
pub mod result;
pub mod submission;
pub mod working_hours;

pub use call_flow::validate_call_flow;
pub use result::{IssueCategory, ValidationIssue, ValidationResult};
pub use submission::validate_onboarding_for_submission;
pub use working_hours::validate_working_hours_overlaps;
