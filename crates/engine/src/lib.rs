//! Onboarding services for VoiceStack locations.
//!
//! [`Engine`] wires every service over a shared [`EngineContext`]: a
//! [`voicestack_db::Store`], a clock and the loaded [`EngineConfig`].
//! Services load records, call into `voicestack_core` and write results
//! back; the rules themselves live in the core crate.

pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod services;

pub use config::{ConfigError, EngineConfig};
pub use context::EngineContext;
pub use engine::Engine;
pub use error::{EngineError, EngineResult};
