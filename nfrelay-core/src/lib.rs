//! # nfrelay-core
//!
//! Shared pipeline types: the enriched flow record and the bounded channel
//! that carries records from decode tasks to the single active sink.
//!
//! ### Key Submodules:
//! - `events`: `DecodedRecord` and the `tokio::sync::mpsc` backed output channel

pub mod events;

pub mod prelude {
    pub use crate::events::*;
}

pub use events::{output_channel, DecodedRecord, EventError, RecordReceiver, RecordSender};
