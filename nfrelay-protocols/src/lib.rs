//! # nfrelay Protocol Parsers
//!
//! Crate for decoding flow-export wire formats. Only the fixed-layout
//! NetFlow v5 format is supported.

pub mod netflow_v5;

pub use netflow_v5::{
    encode_packet, FlowRecords, NetflowV5Parser, PacketHeader, ParseError, RawFlowRecord,
    Sampling, HEADER_LEN, RECORD_LEN,
};
