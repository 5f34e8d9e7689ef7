//! # nfrelay Configuration System
//!
//! Layered configuration for the relay. Later layers win:
//!
//! 1. Built-in defaults
//! 2. An optional YAML file
//! 3. `NFRELAY_<SECTION>__<KEY>` environment variables
//! 4. Command-line overrides
//!
//! The merged result is validated before it is handed out.

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

mod error;
mod listener;
mod output;
mod pipeline;
mod telemetry;
mod validation;

pub use error::ConfigError;
pub use listener::ListenerConfig;
pub use output::{OutputConfig, OutputMethod};
pub use pipeline::{EnrichmentConfig, PipelineConfig};
pub use telemetry::TelemetryConfig;

pub const ENV_PREFIX: &str = "NFRELAY_";

/// Top‑level configuration container for the relay.
#[derive(Debug, Serialize, Deserialize, Validate, Default, Clone, PartialEq)]
pub struct RelayConfig {
    /// Where NetFlow datagrams are received.
    #[validate(nested)]
    #[serde(default)]
    pub listener: ListenerConfig,

    /// Which sink consumes decoded records.
    #[validate(nested)]
    #[serde(default)]
    pub output: OutputConfig,

    #[validate(nested)]
    #[serde(default)]
    pub pipeline: PipelineConfig,

    #[validate(nested)]
    #[serde(default)]
    pub enrichment: EnrichmentConfig,

    #[validate(nested)]
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Values given on the command line. `None` leaves the lower layers alone.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub listen: Option<String>,
    pub method: Option<String>,
    pub destination: Option<String>,
    /// Plain bytes or a human size such as `"256KiB"`.
    pub receive_buffer: Option<String>,
}

impl RelayConfig {
    /// Load defaults, then `path` if given, then the environment, then
    /// `overrides`.
    pub fn load(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(RelayConfig::default()));

        if let Some(path) = path {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(PathBuf::from(path)));
            }
            figment = figment.merge(Yaml::file(path));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        Self::from_figment(overrides.apply(figment))
    }

    /// Load configuration from a specific path, without command-line overrides.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::load(Some(path.as_ref()), &ConfigOverrides::default())
    }

    fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.check()?;
        Ok(config)
    }

    /// Field validation plus the cross-field rules `validator` cannot express.
    pub fn check(&self) -> Result<(), ConfigError> {
        self.validate()?;
        if self.output.method == OutputMethod::Udp && self.output.destination.is_none() {
            return Err(ConfigError::MissingDestination);
        }
        Ok(())
    }
}

impl ConfigOverrides {
    fn apply(&self, mut figment: Figment) -> Figment {
        if let Some(listen) = &self.listen {
            figment = figment.merge(("listener.listen", listen));
        }
        if let Some(buffer) = &self.receive_buffer {
            figment = figment.merge(("listener.receive_buffer_bytes", buffer));
        }
        if let Some(method) = &self.method {
            figment = figment.merge(("output.method", method));
        }
        if let Some(destination) = &self.destination {
            figment = figment.merge(("output.destination", destination));
        }
        figment
    }
}
