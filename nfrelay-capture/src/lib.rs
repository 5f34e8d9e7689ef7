//! nfrelay‑capture
//!
//! Receives flow-export datagrams on a UDP socket and hands each one, with
//! its sender, to a dispatch callback.

pub mod datagram;
pub mod receiver;

pub use datagram::Datagram;
pub use receiver::{CaptureError, UdpReceiver, MAX_DATAGRAM_LEN};
