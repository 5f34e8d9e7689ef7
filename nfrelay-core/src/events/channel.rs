//! Bounded output channel between decode tasks and the sink.
//!
//! Many producers, exactly one consumer. `send` waits for capacity instead of
//! failing, so a slow sink throttles the decode tasks feeding it. Nothing is
//! dropped while the receiver is alive.

use thiserror::Error;
use tokio::sync::mpsc;

use super::record::DecodedRecord;

/// Output channel error conditions.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EventError {
    #[error("Output channel capacity exceeded")]
    QueueFull,
    #[error("Output channel closed")]
    Closed,
    #[error("Invalid capacity (must be at least 1)")]
    InvalidCapacity,
}

/// Creates the output channel with room for `capacity` records.
pub fn output_channel(capacity: usize) -> Result<(RecordSender, RecordReceiver), EventError> {
    if capacity == 0 {
        return Err(EventError::InvalidCapacity);
    }
    let (tx, rx) = mpsc::channel(capacity);
    Ok((RecordSender { tx }, RecordReceiver { rx }))
}

/// Producer handle. Cheap to clone, one per decode task.
#[derive(Clone, Debug)]
pub struct RecordSender {
    tx: mpsc::Sender<DecodedRecord>,
}

impl RecordSender {
    /// Enqueues a record, waiting while the channel is full.
    #[inline]
    pub async fn send(&self, record: DecodedRecord) -> Result<(), EventError> {
        self.tx.send(record).await.map_err(|_| EventError::Closed)
    }

    /// Enqueues a record only if there is room right now.
    #[inline]
    pub fn try_send(&self, record: DecodedRecord) -> Result<(), EventError> {
        self.tx.try_send(record).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => EventError::QueueFull,
            mpsc::error::TrySendError::Closed(_) => EventError::Closed,
        })
    }

    /// Number of records that can be enqueued without waiting.
    pub fn available(&self) -> usize {
        self.tx.capacity()
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer handle. Owned by the single active sink.
#[derive(Debug)]
pub struct RecordReceiver {
    rx: mpsc::Receiver<DecodedRecord>,
}

impl RecordReceiver {
    /// Waits for the next record. Returns `None` once every sender is gone
    /// and the queue is drained.
    #[inline]
    pub async fn recv(&mut self) -> Option<DecodedRecord> {
        self.rx.recv().await
    }

    /// Returns `None` if the queue is empty right now.
    #[inline]
    pub fn try_recv(&mut self) -> Option<DecodedRecord> {
        self.rx.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn test_record(seq: u32) -> DecodedRecord {
        let mut record = DecodedRecord::default();
        record.header.flow_seq_num = seq;
        record
    }

    #[test]
    fn rejects_zero_capacity() {
        assert!(matches!(
            output_channel(0),
            Err(EventError::InvalidCapacity)
        ));
    }

    #[test]
    fn signals_queue_full() {
        let (tx, _rx) = output_channel(2).unwrap();
        tx.try_send(test_record(1)).unwrap();
        tx.try_send(test_record(2)).unwrap();
        assert_eq!(tx.available(), 0);
        assert_eq!(tx.try_send(test_record(3)), Err(EventError::QueueFull));
    }

    #[test]
    fn maintains_ordering() {
        let (tx, mut rx) = output_channel(4).unwrap();
        tx.try_send(test_record(1)).unwrap();
        tx.try_send(test_record(2)).unwrap();
        assert_eq!(rx.try_recv().unwrap().header.flow_seq_num, 1);
        assert_eq!(rx.try_recv().unwrap().header.flow_seq_num, 2);
        assert!(rx.try_recv().is_none());
    }

    #[tokio::test]
    async fn send_blocks_while_full() {
        let (tx, mut rx) = output_channel(1).unwrap();
        tx.send(test_record(1)).await.unwrap();

        // Nobody is draining: the second send must stay pending, not fail.
        let blocked = tokio::time::timeout(Duration::from_millis(50), tx.send(test_record(2))).await;
        assert!(blocked.is_err());

        let producer = {
            let tx = tx.clone();
            tokio::spawn(async move { tx.send(test_record(2)).await })
        };
        assert_eq!(rx.recv().await.unwrap().header.flow_seq_num, 1);
        producer.await.unwrap().unwrap();
        assert_eq!(rx.recv().await.unwrap().header.flow_seq_num, 2);
    }

    #[tokio::test]
    async fn closed_after_receiver_dropped() {
        let (tx, rx) = output_channel(1).unwrap();
        drop(rx);
        assert!(tx.is_closed());
        assert_eq!(tx.send(test_record(1)).await, Err(EventError::Closed));
    }

    #[tokio::test]
    async fn recv_ends_when_senders_gone() {
        let (tx, mut rx) = output_channel(4).unwrap();
        tx.send(test_record(7)).await.unwrap();
        drop(tx);
        assert_eq!(rx.recv().await.unwrap().header.flow_seq_num, 7);
        assert!(rx.recv().await.is_none());
    }
}
