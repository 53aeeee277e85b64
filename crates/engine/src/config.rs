use std::sync::LazyLock;

use regex::Regex;
use voicestack_core::device::{DeviceCatalog, DEFAULT_POLYCOM_MODELS, DEFAULT_YEALINK_MODELS};
use voicestack_core::provisioning::PAYLOAD_VERSION;

pub const ENV_YEALINK_MODELS: &str = "VOICESTACK_YEALINK_MODELS";
pub const ENV_POLYCOM_MODELS: &str = "VOICESTACK_POLYCOM_MODELS";
pub const ENV_PAYLOAD_VERSION: &str = "VOICESTACK_PAYLOAD_VERSION";

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+\.\d+$").expect("valid regex"));

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is set but lists no models")]
    EmptyModelList { var: &'static str },

    #[error("{var} must be a MAJOR.MINOR.PATCH version, got '{value}'")]
    InvalidVersion { var: &'static str, value: String },
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Active Yealink models (exact, case-sensitive spellings).
    pub yealink_models: Vec<String>,
    /// Active Polycom models.
    pub polycom_models: Vec<String>,
    /// `version` stamped on generated payloads.
    pub payload_version: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            yealink_models: DEFAULT_YEALINK_MODELS.iter().map(|m| m.to_string()).collect(),
            polycom_models: DEFAULT_POLYCOM_MODELS.iter().map(|m| m.to_string()).collect(),
            payload_version: PAYLOAD_VERSION.to_string(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default             |
    /// |------------------------------|---------------------|
    /// | `VOICESTACK_YEALINK_MODELS`  | built-in model list |
    /// | `VOICESTACK_POLYCOM_MODELS`  | built-in model list |
    /// | `VOICESTACK_PAYLOAD_VERSION` | `1.0.0`             |
    ///
    /// Model lists are comma-separated.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let yealink_models = match lookup(ENV_YEALINK_MODELS) {
            Some(raw) => parse_model_list(ENV_YEALINK_MODELS, &raw)?,
            None => defaults.yealink_models,
        };
        let polycom_models = match lookup(ENV_POLYCOM_MODELS) {
            Some(raw) => parse_model_list(ENV_POLYCOM_MODELS, &raw)?,
            None => defaults.polycom_models,
        };
        let payload_version = match lookup(ENV_PAYLOAD_VERSION) {
            Some(raw) => {
                let value = raw.trim().to_string();
                if !VERSION_RE.is_match(&value) {
                    return Err(ConfigError::InvalidVersion {
                        var: ENV_PAYLOAD_VERSION,
                        value,
                    });
                }
                value
            }
            None => defaults.payload_version,
        };

        Ok(Self {
            yealink_models,
            polycom_models,
            payload_version,
        })
    }

    pub fn device_catalog(&self) -> DeviceCatalog {
        DeviceCatalog::from_lists(self.yealink_models.as_slice(), self.polycom_models.as_slice())
    }
}

fn parse_model_list(var: &'static str, raw: &str) -> Result<Vec<String>, ConfigError> {
    let models: Vec<String> = raw
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if models.is_empty() {
        return Err(ConfigError::EmptyModelList { var });
    }
    Ok(models)
}
