//! Output sink selection.

use std::fmt;

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

use crate::validation;

#[derive(Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputMethod {
    /// JSON lines on stdout.
    #[default]
    Stdout,
    /// InfluxDB line protocol over UDP.
    Udp,
}

impl fmt::Display for OutputMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputMethod::Stdout => f.write_str("stdout"),
            OutputMethod::Udp => f.write_str("udp"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
pub struct OutputConfig {
    #[serde(default)]
    pub method: OutputMethod,

    /// `host:port` of the line-protocol collector. Required for `udp`.
    #[validate(custom(function = validation::validate_host_port))]
    #[serde(default)]
    pub destination: Option<String>,

    /// Deadline for a single UDP send.
    #[validate(range(min = 1, max = 60000))]
    #[serde(default = "default_write_timeout")]
    pub write_timeout_ms: u64,
}

fn default_write_timeout() -> u64 {
    3000
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            method: OutputMethod::default(),
            destination: None,
            write_timeout_ms: default_write_timeout(),
        }
    }
}
