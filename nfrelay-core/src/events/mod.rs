//! ## nfrelay-core::events
//! **Decoded flow records and the producer/consumer channel between decode
//! tasks and the sink.**

pub mod channel;
pub mod record;

pub use channel::{output_channel, EventError, RecordReceiver, RecordSender};
pub use record::DecodedRecord;
