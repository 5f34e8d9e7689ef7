//! # nfrelay Sinks
//!
//! Consumers of the output channel. Exactly one sink drains the channel per
//! run: JSON lines on stdout, or InfluxDB line protocol over UDP.

pub mod line_protocol;
pub mod stdout;
pub mod udp;

use std::io;
use std::time::Duration;

use nfrelay_core::RecordReceiver;
use thiserror::Error;

pub use line_protocol::format_record;
pub use stdout::StdoutSink;
pub use udp::UdpSink;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("write failed: {0}")]
    Io(#[from] io::Error),
    #[error("send timed out after {0:?}")]
    Timeout(Duration),
    #[error("could not resolve destination {destination}: {reason}")]
    Resolve { destination: String, reason: String },
}

/// The sink selected at startup.
#[derive(Debug)]
pub enum OutputSink {
    Stdout(StdoutSink),
    Udp(UdpSink),
}

impl OutputSink {
    /// Drains `receiver` until every sender is gone.
    pub async fn run(self, receiver: RecordReceiver) {
        match self {
            OutputSink::Stdout(mut sink) => sink.run(receiver).await,
            OutputSink::Udp(sink) => sink.run(receiver).await,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            OutputSink::Stdout(_) => "stdout",
            OutputSink::Udp(_) => "udp",
        }
    }
}
