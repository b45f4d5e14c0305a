//! Dispatcher configuration.
//!
//! Defaults reproduce the protocol's observed behavior exactly; deployments
//! can extend the wrap policy or quiet the skip logging through a
//! `bpmgate.toml` file or `BPMGATE_`-prefixed environment variables.

use serde::{Deserialize, Serialize};

use crate::dispatch::command::{KnownService, MarshallingFormat};
use crate::dispatch::response::WrapPolicy;

/// One (service, format) combination whose successful results get the
/// type-carrying wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrapRule {
    pub service: KnownService,
    pub format: MarshallingFormat,
}

/// Runtime configuration for [`crate::dispatch::BatchDispatcher`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Wrap-policy rules; defaults to query results marshalled with JAXB.
    pub wrap_rules: Vec<WrapRule>,

    /// Emit a debug log for command kinds the dispatcher skips.
    pub log_skipped_commands: bool,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            wrap_rules: vec![WrapRule {
                service: KnownService::QueryDataService,
                format: MarshallingFormat::Jaxb,
            }],
            log_skipped_commands: true,
        }
    }
}

impl DispatcherConfig {
    /// Load configuration from `bpmgate.toml` (optional) and `BPMGATE_*`
    /// environment overrides, falling back to defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name("bpmgate").required(false))
            .add_source(config::Environment::with_prefix("BPMGATE").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// Materialize the wrap policy for the dispatcher.
    pub fn wrap_policy(&self) -> WrapPolicy {
        WrapPolicy::from_rules(self.wrap_rules.iter().map(|rule| (rule.service, rule.format)))
    }
}
