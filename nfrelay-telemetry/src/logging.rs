//! ## nfrelay-telemetry::logging
//! Structured logging with `tracing`.
//!
//! Logs always go to stderr: stdout belongs to the JSON record sink.

use tracing_subscriber::filter::ParseError;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Clone)]
pub struct EventLogger;

impl EventLogger {
    /// Installs the global subscriber. `RUST_LOG` wins over `default_filter`
    /// when set.
    pub fn init(default_filter: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => Self::filter(default_filter)?,
        };

        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_thread_names(true)
            .try_init()
    }

    /// Parses a directive list such as `info,nfrelay_engine=debug`.
    pub fn filter(directives: &str) -> Result<EnvFilter, ParseError> {
        EnvFilter::try_new(directives)
    }
}
