//! Relay runtime.
//!
//! One receive loop, one decode task per datagram, one bounded channel and
//! one sink task. The relay runs until the process is stopped.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{info, info_span, instrument, Instrument};

use nfrelay_capture::UdpReceiver;
use nfrelay_config::{ConfigError, OutputMethod, RelayConfig};
use nfrelay_core::output_channel;
use nfrelay_enrichment::{DnsCache, Enricher, ReverseResolver, SystemResolver};
use nfrelay_protocols::NetflowV5Parser;
use nfrelay_sinks::{OutputSink, StdoutSink, UdpSink};
use nfrelay_telemetry::MetricsRecorder;

use crate::error::EngineError;
use crate::pipeline::Pipeline;

pub struct Relay {
    config: RelayConfig,
    metrics: MetricsRecorder,
    resolver: Arc<dyn ReverseResolver>,
}

impl Relay {
    pub fn new(config: RelayConfig, metrics: MetricsRecorder) -> Self {
        Self {
            config,
            metrics,
            resolver: Arc::new(SystemResolver),
        }
    }

    /// Replaces the system resolver used for hostname enrichment.
    pub fn with_resolver(mut self, resolver: Arc<dyn ReverseResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Binds the listener and serves until the process stops.
    #[instrument(
        level = "info",
        name = "relay",
        skip_all,
        fields(listen = %self.config.listener.listen, method = %self.config.output.method)
    )]
    pub async fn run(self) -> Result<(), EngineError> {
        let receiver = self.bind().await?;
        self.serve(receiver).await
    }

    /// Binds the configured listen address. Failure here is fatal.
    pub async fn bind(&self) -> Result<UdpReceiver, EngineError> {
        let listener = &self.config.listener;
        Ok(UdpReceiver::bind(&listener.listen, listener.receive_buffer_bytes).await?)
    }

    /// Runs the pipeline on an already bound receiver.
    ///
    /// Only returns if the sink task ends, which is an error while the
    /// pipeline still holds a sender.
    pub async fn serve(self, receiver: UdpReceiver) -> Result<(), EngineError> {
        let (sender, records) = output_channel(self.config.pipeline.channel_capacity)?;
        let sink = self.build_sink()?;
        info!(
            "relaying NetFlow v5 to {} {}",
            sink.name(),
            self.config.output.destination.as_deref().unwrap_or("")
        );

        let sink_task = tokio::spawn(sink.run(records).instrument(info_span!("sink_task")));
        let summary_task = self.spawn_metrics_summary();

        let dns = DnsCache::with_ttl(
            Arc::clone(&self.resolver),
            Duration::from_secs(self.config.enrichment.dns_ttl_secs),
        );
        let pipeline = Pipeline::new(
            NetflowV5Parser::with_strict_version(self.config.pipeline.strict_version),
            Enricher::new(Arc::new(dns)),
            sender,
            self.metrics.clone(),
        );

        let result = tokio::select! {
            _ = receiver.run(pipeline.dispatcher()).instrument(info_span!("receive_loop")) => Ok(()),
            joined = sink_task => match joined {
                Ok(()) => Err(EngineError::SinkStopped),
                Err(e) => Err(EngineError::Task(e)),
            },
        };

        if let Some(task) = summary_task {
            task.abort();
        }
        result
    }

    fn build_sink(&self) -> Result<OutputSink, EngineError> {
        let output = &self.config.output;
        match output.method {
            OutputMethod::Stdout => Ok(OutputSink::Stdout(StdoutSink::new(self.metrics.clone()))),
            OutputMethod::Udp => {
                let destination = output
                    .destination
                    .clone()
                    .ok_or(ConfigError::MissingDestination)?;
                let sink = UdpSink::new(destination, self.metrics.clone())
                    .with_write_timeout(Duration::from_millis(output.write_timeout_ms));
                Ok(OutputSink::Udp(sink))
            }
        }
    }

    fn spawn_metrics_summary(&self) -> Option<JoinHandle<()>> {
        let interval_secs = self.config.telemetry.metrics_interval_secs;
        if interval_secs == 0 {
            return None;
        }
        let metrics = self.metrics.clone();
        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
            ticker.tick().await;
            loop {
                ticker.tick().await;
                metrics.log_summary();
            }
        }))
    }
}

impl std::fmt::Debug for Relay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Relay")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
