//! Logging and metrics configuration.

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

use crate::validation;

#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
pub struct TelemetryConfig {
    /// Default `tracing` filter; `RUST_LOG` takes precedence.
    #[validate(custom(function = validation::validate_log_filter))]
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Seconds between metrics summaries in the log. 0 disables them.
    #[serde(default = "default_metrics_interval")]
    pub metrics_interval_secs: u64,
}

fn default_log_filter() -> String {
    "info".into()
}

fn default_metrics_interval() -> u64 {
    60
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            metrics_interval_secs: default_metrics_interval(),
        }
    }
}
