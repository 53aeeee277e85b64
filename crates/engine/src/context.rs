use std::sync::Arc;

use voicestack_core::device::DeviceCatalog;
use voicestack_core::skip_rules::ProviderKnowledge;
use voicestack_core::types::{Clock, Timestamp};
use voicestack_db::Store;

use crate::config::EngineConfig;

/// Shared dependencies handed to every service.
///
/// Cheaply cloneable; everything inside is behind an `Arc`.
#[derive(Clone)]
pub struct EngineContext {
    pub store: Arc<dyn Store>,
    pub clock: Arc<dyn Clock>,
    pub config: Arc<EngineConfig>,
    pub catalog: Arc<DeviceCatalog>,
    pub knowledge: Arc<ProviderKnowledge>,
}

impl EngineContext {
    pub fn new(store: Arc<dyn Store>, clock: Arc<dyn Clock>, config: EngineConfig) -> Self {
        let catalog = Arc::new(config.device_catalog());
        Self {
            store,
            clock,
            config: Arc::new(config),
            catalog,
            knowledge: Arc::new(ProviderKnowledge::default()),
        }
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }
}
