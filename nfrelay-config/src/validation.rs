//! Custom validation functions for configuration.

use validator::ValidationError;

/// Validate a `host:port` pair. The host may be a name, an IPv4 address or a
/// bracketed IPv6 address; it is not resolved here.
pub fn validate_host_port(value: &str) -> Result<(), ValidationError> {
    let Some((host, port)) = value.rsplit_once(':') else {
        return Err(ValidationError::new("missing_port"));
    };
    if host.is_empty() || port.parse::<u16>().is_err() {
        return Err(ValidationError::new("invalid_host_port"));
    }
    if host.contains(':') && !(host.starts_with('[') && host.ends_with(']')) {
        return Err(ValidationError::new("unbracketed_ipv6"));
    }
    Ok(())
}

/// Validate a tracing filter directive list such as `info,nfrelay_engine=debug`.
pub fn validate_log_filter(filter: &str) -> Result<(), ValidationError> {
    if filter.trim().is_empty() {
        return Err(ValidationError::new("empty_log_filter"));
    }
    Ok(())
}
