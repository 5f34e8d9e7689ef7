//! Enriched flow record handed from decode tasks to the sink.

use nfrelay_protocols::{PacketHeader, RawFlowRecord};
use serde::Serialize;

/// A NetFlow v5 record with its packet header and the derived fields.
///
/// Serializes as one flat object: `header` and `flow` are flattened so their
/// fields sit next to the derived ones. `header.sampling_interval` carries the
/// decoded 14-bit interval, not the packed wire value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DecodedRecord {
    #[serde(flatten)]
    pub header: PacketHeader,

    #[serde(flatten)]
    pub flow: RawFlowRecord,

    /// Address of the exporter as seen by the collector (no port).
    pub host: String,

    pub sampling_algorithm: u8,

    pub ipv4_src_addr: String,
    pub ipv4_dst_addr: String,
    pub ipv4_next_hop: String,

    /// Reverse-DNS name of `ipv4_src_addr`, or the address itself.
    pub src_host_name: String,
    /// Reverse-DNS name of `ipv4_dst_addr`, or the address itself.
    pub dst_host_name: String,

    /// Seconds between the flow's first and last packet.
    pub duration: u32,
}

impl DecodedRecord {
    /// Export timestamp of the originating packet in nanoseconds.
    #[inline]
    pub fn timestamp_ns(&self) -> u64 {
        self.header.export_timestamp_ns()
    }
}
