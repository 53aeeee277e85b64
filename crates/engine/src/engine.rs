use std::sync::Arc;

use voicestack_core::types::Clock;
use voicestack_db::Store;

use crate::config::EngineConfig;
use crate::context::EngineContext;
use crate::services::{
    ApprovalService, DeviceService, ExtensionAllocator, ProvisioningPayloadGenerator,
    SessionService, SkipRuleEngine, SubmissionValidator, WarningsCalculator,
};

/// All onboarding services wired over one store.
#[derive(Clone)]
pub struct Engine {
    pub ctx: EngineContext,
    pub skip_rules: SkipRuleEngine,
    pub devices: DeviceService,
    pub extensions: ExtensionAllocator,
    pub warnings: WarningsCalculator,
    pub validator: SubmissionValidator,
    pub approvals: ApprovalService,
    pub sessions: SessionService,
    pub provisioning: ProvisioningPayloadGenerator,
}

impl Engine {
    pub fn new(store: Arc<dyn Store>, clock: Arc<dyn Clock>, config: EngineConfig) -> Self {
        let ctx = EngineContext::new(store, clock, config);

        let approvals = ApprovalService::new(ctx.clone());
        let validator = SubmissionValidator::new(ctx.clone());
        let provisioning = ProvisioningPayloadGenerator::new(ctx.clone());

        Self {
            skip_rules: SkipRuleEngine::new(ctx.clone()),
            devices: DeviceService::new(ctx.clone(), approvals.clone()),
            extensions: ExtensionAllocator::new(ctx.clone()),
            warnings: WarningsCalculator::new(ctx.clone(), approvals.clone()),
            sessions: SessionService::new(
                ctx.clone(),
                validator.clone(),
                approvals.clone(),
                provisioning.clone(),
            ),
            validator,
            approvals,
            provisioning,
            ctx,
        }
    }
}
