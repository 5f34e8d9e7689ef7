//! Decode pipeline tuning.

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Records the output channel holds before decode tasks block.
    #[validate(range(min = 1, max = 1048576))]
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,

    /// Drop datagrams whose header version is not 5.
    #[serde(default)]
    pub strict_version: bool,
}

fn default_channel_capacity() -> usize {
    100
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
            strict_version: false,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
pub struct EnrichmentConfig {
    /// Lifetime of a reverse-DNS cache entry, successful or not.
    #[validate(range(min = 1))]
    #[serde(default = "default_dns_ttl")]
    pub dns_ttl_secs: u64,
}

fn default_dns_ttl() -> u64 {
    86400
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            dns_ttl_secs: default_dns_ttl(),
        }
    }
}
