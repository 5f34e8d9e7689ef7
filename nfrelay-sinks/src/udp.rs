//! Line-protocol-over-UDP sink.
//!
//! The destination is resolved once. A failed send drops the record and
//! forces a fresh socket; records are never retried.

use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;

use nfrelay_core::RecordReceiver;
use nfrelay_telemetry::MetricsRecorder;
use tokio::net::UdpSocket;
use tracing::{error, info, warn};

use crate::line_protocol::format_record;
use crate::SinkError;

pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(3);
const REDIAL_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub struct UdpSink {
    destination: String,
    write_timeout: Duration,
    metrics: MetricsRecorder,
}

impl UdpSink {
    pub fn new(destination: impl Into<String>, metrics: MetricsRecorder) -> Self {
        Self {
            destination: destination.into(),
            write_timeout: DEFAULT_WRITE_TIMEOUT,
            metrics,
        }
    }

    pub fn with_write_timeout(mut self, write_timeout: Duration) -> Self {
        self.write_timeout = write_timeout;
        self
    }

    /// Sends every record as one datagram until the channel closes.
    ///
    /// If the destination cannot be resolved the sink stays alive without
    /// reading, so producers eventually block on a full channel.
    pub async fn run(self, mut receiver: RecordReceiver) {
        let target = match self.resolve().await {
            Ok(target) => target,
            Err(e) => {
                error!("udp sink disabled: {}", e);
                let _parked = receiver;
                std::future::pending::<()>().await;
                return;
            }
        };
        info!("udp sink sending line protocol to {}", target);

        loop {
            let socket = match dial(target).await {
                Ok(socket) => socket,
                Err(e) => {
                    error!("udp sink connection to {} failed: {}", target, e);
                    tokio::time::sleep(REDIAL_DELAY).await;
                    continue;
                }
            };

            loop {
                let Some(record) = receiver.recv().await else {
                    info!("output channel closed, udp sink stopping");
                    return;
                };
                let line = format_record(&record);
                if let Err(e) = self.send(&socket, line.as_bytes()).await {
                    self.metrics.sink_errors.inc();
                    warn!("udp sink dropped record: {}", e);
                    break;
                }
                self.metrics.records_written.inc();
            }
        }
    }

    async fn resolve(&self) -> Result<SocketAddr, SinkError> {
        let mut addrs = tokio::net::lookup_host(self.destination.as_str())
            .await
            .map_err(|e| SinkError::Resolve {
                destination: self.destination.clone(),
                reason: e.to_string(),
            })?;
        addrs.next().ok_or_else(|| SinkError::Resolve {
            destination: self.destination.clone(),
            reason: "no addresses returned".to_string(),
        })
    }

    async fn send(&self, socket: &UdpSocket, payload: &[u8]) -> Result<(), SinkError> {
        match tokio::time::timeout(self.write_timeout, socket.send(payload)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(SinkError::Io(e)),
            Err(_) => Err(SinkError::Timeout(self.write_timeout)),
        }
    }
}

/// Binds an ephemeral socket of `target`'s family and connects it.
async fn dial(target: SocketAddr) -> io::Result<UdpSocket> {
    let local: SocketAddr = match target {
        SocketAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
        SocketAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
    };
    let socket = UdpSocket::bind(local).await?;
    socket.connect(target).await?;
    Ok(socket)
}
