//! Per-datagram decode task.
//!
//! Every received datagram gets its own task. Records from one datagram are
//! enqueued in wire order; datagrams interleave freely.

use std::time::Instant;

use tracing::{debug, error, instrument};

use nfrelay_capture::Datagram;
use nfrelay_core::RecordSender;
use nfrelay_enrichment::Enricher;
use nfrelay_protocols::NetflowV5Parser;
use nfrelay_telemetry::MetricsRecorder;

/// Everything a decode task needs. Cloned into each task.
#[derive(Debug, Clone)]
pub struct Pipeline {
    parser: NetflowV5Parser,
    enricher: Enricher,
    output: RecordSender,
    metrics: MetricsRecorder,
}

impl Pipeline {
    pub fn new(
        parser: NetflowV5Parser,
        enricher: Enricher,
        output: RecordSender,
        metrics: MetricsRecorder,
    ) -> Self {
        Self {
            parser,
            enricher,
            output,
            metrics,
        }
    }

    /// Decodes, enriches and enqueues every record in `datagram`, returning
    /// how many were enqueued.
    ///
    /// A bad header drops the whole datagram. A truncated record stops the
    /// datagram there; records before it are kept.
    #[instrument(
        level = "debug",
        name = "handle_datagram",
        skip_all,
        fields(source = %datagram.source, len = datagram.payload.len())
    )]
    pub async fn handle_datagram(&self, datagram: Datagram) -> usize {
        let started = Instant::now();
        self.metrics.datagrams_received.inc();

        let (header, records) = match self.parser.parse(&datagram.payload) {
            Ok(parsed) => parsed,
            Err(e) => {
                self.metrics.datagrams_rejected.inc();
                error!("dropping datagram from {}: {}", datagram.source, e);
                return 0;
            }
        };

        let mut enqueued = 0;
        for record in records {
            let flow = match record {
                Ok(flow) => flow,
                Err(e) => {
                    self.metrics.datagrams_truncated.inc();
                    error!("datagram from {} cut short: {}", datagram.source, e);
                    break;
                }
            };

            let decoded = self.enricher.enrich(&header, &flow, datagram.source).await;
            if self.output.send(decoded).await.is_err() {
                debug!("output channel closed, abandoning datagram");
                break;
            }
            self.metrics.records_decoded.inc();
            enqueued += 1;
        }

        self.metrics
            .datagram_latency
            .observe(started.elapsed().as_secs_f64());
        enqueued
    }

    /// Returns a receiver callback that spawns one decode task per datagram.
    pub fn dispatcher(self) -> impl FnMut(Datagram) + Send + 'static {
        move |datagram| {
            let pipeline = self.clone();
            tokio::spawn(async move {
                pipeline.handle_datagram(datagram).await;
            });
        }
    }
}
