//! ## nfrelay-telemetry::metrics
//! **Prometheus counters for the relay pipeline**

use prometheus::{Histogram, HistogramOpts, IntCounter, Registry};
use tracing::info;

#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    pub registry: Registry,
    pub datagrams_received: IntCounter,
    pub datagrams_rejected: IntCounter,
    pub datagrams_truncated: IntCounter,
    pub records_decoded: IntCounter,
    pub records_written: IntCounter,
    pub sink_errors: IntCounter,
    pub datagram_latency: Histogram,
}

impl MetricsRecorder {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let datagrams_received =
            IntCounter::new("nfrelay_datagrams_received_total", "UDP datagrams received")?;
        let datagrams_rejected = IntCounter::new(
            "nfrelay_datagrams_rejected_total",
            "Datagrams dropped because the header could not be decoded",
        )?;
        let datagrams_truncated = IntCounter::new(
            "nfrelay_datagrams_truncated_total",
            "Datagrams whose flow records ended early",
        )?;
        let records_decoded = IntCounter::new(
            "nfrelay_records_decoded_total",
            "Flow records decoded, enriched and enqueued",
        )?;
        let records_written = IntCounter::new(
            "nfrelay_records_written_total",
            "Flow records written by the active sink",
        )?;
        let sink_errors = IntCounter::new(
            "nfrelay_sink_errors_total",
            "Records the sink failed to serialize or send",
        )?;
        let datagram_latency = Histogram::with_opts(
            HistogramOpts::new(
                "nfrelay_datagram_seconds",
                "Time from receipt to the last record of a datagram being enqueued",
            )
            .buckets(vec![0.0001, 0.001, 0.01, 0.1, 1.0, 10.0]),
        )?;

        registry.register(Box::new(datagrams_received.clone()))?;
        registry.register(Box::new(datagrams_rejected.clone()))?;
        registry.register(Box::new(datagrams_truncated.clone()))?;
        registry.register(Box::new(records_decoded.clone()))?;
        registry.register(Box::new(records_written.clone()))?;
        registry.register(Box::new(sink_errors.clone()))?;
        registry.register(Box::new(datagram_latency.clone()))?;

        Ok(Self {
            registry,
            datagrams_received,
            datagrams_rejected,
            datagrams_truncated,
            records_decoded,
            records_written,
            sink_errors,
            datagram_latency,
        })
    }

    /// Renders every registered metric in the Prometheus text format.
    pub fn gather_metrics(&self) -> Result<String, prometheus::Error> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    /// Logs the current counter values at info level.
    pub fn log_summary(&self) {
        info!(
            datagrams = self.datagrams_received.get(),
            rejected = self.datagrams_rejected.get(),
            truncated = self.datagrams_truncated.get(),
            decoded = self.records_decoded.get(),
            written = self.records_written.get(),
            sink_errors = self.sink_errors.get(),
            "metrics summary"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn test_gather_includes_counters() {
        let metrics = MetricsRecorder::new().unwrap();
        metrics.datagrams_received.inc();
        metrics.records_decoded.inc_by(30);
        metrics.datagrams_truncated.inc();

        let text = metrics.gather_metrics().unwrap();
        assert!(text.contains("nfrelay_datagrams_received_total 1"));
        assert!(text.contains("nfrelay_datagrams_truncated_total 1"));
        assert!(text.contains("nfrelay_records_decoded_total 30"));
        assert!(text.contains("nfrelay_datagram_seconds_bucket"));
    }

    #[test]
    fn test_clones_share_counters() {
        let metrics = MetricsRecorder::new().unwrap();
        let clone = metrics.clone();
        clone.sink_errors.inc();
        assert_eq!(metrics.sink_errors.get(), 1);
    }

    #[test]
    #[traced_test]
    fn test_summary_is_logged() {
        let metrics = MetricsRecorder::new().unwrap();
        metrics.datagrams_received.inc_by(2);
        metrics.log_summary();
        assert!(logs_contain("metrics summary"));
        assert!(logs_contain("datagrams=2"));
    }
}
