//! # nfrelay Engine
//!
//! Wires the receiver, the per-datagram decode tasks, the output channel and
//! the selected sink into one running relay.

pub mod error;
pub mod pipeline;
pub mod runtime;

pub use error::EngineError;
pub use pipeline::Pipeline;
pub use runtime::Relay;
