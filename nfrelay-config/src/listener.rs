//! Collector socket configuration.

use serde::{Deserialize, Deserializer, Serialize};
use validator::{self, Validate};

use crate::validation;

/// UDP listener configuration.
#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
pub struct ListenerConfig {
    /// Address and port to receive NetFlow packets on.
    #[validate(custom(function = validation::validate_host_port))]
    #[serde(default = "default_listen")]
    pub listen: String,

    /// `SO_RCVBUF` for the listening socket, in bytes.
    #[validate(range(min = 1024, max = 1073741824))]
    #[serde(default = "default_receive_buffer", deserialize_with = "deserialize_size")]
    pub receive_buffer_bytes: usize,
}

fn default_listen() -> String {
    "0.0.0.0:2055".into()
}

fn default_receive_buffer() -> usize {
    212992
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            receive_buffer_bytes: default_receive_buffer(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SizeValue {
    Num(usize),
    Str(String),
}

/// Custom deserializer to allow human‑friendly sizes (e.g. "256KiB") or direct numbers.
fn deserialize_size<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    match SizeValue::deserialize(deserializer)? {
        SizeValue::Num(n) => Ok(n),
        SizeValue::Str(s) => parse_size(&s).map_err(serde::de::Error::custom),
    }
}

pub(crate) fn parse_size(s: &str) -> Result<usize, String> {
    let s = s.trim();
    let split = s
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(s.len());
    let (num_part, unit_part) = s.split_at(split);
    let number: f64 = num_part
        .parse()
        .map_err(|_| format!("invalid size '{}'", s))?;
    let multiplier = match unit_part.trim().to_lowercase().as_str() {
        "kb" | "kib" | "k" => 1024.0,
        "mb" | "mib" | "m" => 1024.0 * 1024.0,
        "gb" | "gib" | "g" => 1024.0 * 1024.0 * 1024.0,
        "" | "b" => 1.0,
        other => return Err(format!("unknown size unit '{}'", other)),
    };
    Ok((number * multiplier) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes() {
        assert_eq!(parse_size("212992"), Ok(212992));
        assert_eq!(parse_size("256KiB"), Ok(262144));
        assert_eq!(parse_size("1.5 MiB"), Ok(1572864));
        assert!(parse_size("lots").is_err());
        assert!(parse_size("4 parsecs").is_err());
    }

    #[test]
    fn default_validates() {
        assert!(ListenerConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_tiny_buffer() {
        let config = ListenerConfig {
            receive_buffer_bytes: 16,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
