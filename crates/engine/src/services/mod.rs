pub mod approvals;
pub mod devices;
pub mod extensions;
pub mod provisioning;
pub mod session;
pub mod skip_rules;
pub mod submission;
pub mod warnings;

pub use approvals::{ApprovalService, SYSTEM_ACTOR};
pub use devices::DeviceService;
pub use extensions::ExtensionAllocator;
pub use provisioning::{GeneratedPayload, ProvisioningPayloadGenerator};
pub use session::{OnboardingUpdate, SessionService};
pub use skip_rules::SkipRuleEngine;
pub use submission::SubmissionValidator;
pub use warnings::WarningsCalculator;
