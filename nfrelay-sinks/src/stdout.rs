//! JSON-lines sink.

use nfrelay_core::{DecodedRecord, RecordReceiver};
use nfrelay_telemetry::MetricsRecorder;
use tokio::io::{AsyncWrite, AsyncWriteExt, Stdout};
use tracing::{error, info};

use crate::SinkError;

/// Writes every record as one JSON object per line, flushing after each.
pub struct StdoutSink<W = Stdout> {
    writer: W,
    metrics: MetricsRecorder,
}

impl StdoutSink<Stdout> {
    pub fn new(metrics: MetricsRecorder) -> Self {
        Self::with_writer(tokio::io::stdout(), metrics)
    }
}

impl<W> StdoutSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn with_writer(writer: W, metrics: MetricsRecorder) -> Self {
        Self { writer, metrics }
    }

    /// Drains `receiver` until it closes. A record that fails to serialize or
    /// write is logged and skipped.
    pub async fn run(&mut self, mut receiver: RecordReceiver) {
        while let Some(record) = receiver.recv().await {
            match self.write_record(&record).await {
                Ok(()) => self.metrics.records_written.inc(),
                Err(e) => {
                    self.metrics.sink_errors.inc();
                    error!("stdout sink dropped record: {}", e);
                }
            }
        }
        info!("output channel closed, stdout sink stopping");
    }

    pub async fn write_record(&mut self, record: &DecodedRecord) -> Result<(), SinkError> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');
        self.writer.write_all(&line).await?;
        self.writer.flush().await?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W> std::fmt::Debug for StdoutSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StdoutSink").finish_non_exhaustive()
    }
}
