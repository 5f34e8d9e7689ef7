use thiserror::Error;
use tokio::task::JoinError;

use nfrelay_capture::CaptureError;
use nfrelay_config::ConfigError;
use nfrelay_core::EventError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    #[error("Output channel error: {0}")]
    Channel(#[from] EventError),

    #[error("Sink task failed: {0}")]
    Task(#[from] JoinError),

    #[error("Output sink stopped while the relay was running")]
    SinkStopped,
}
