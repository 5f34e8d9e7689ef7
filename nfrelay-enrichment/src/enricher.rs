//! ## nfrelay-enrichment::enricher
//! Derives the decoded fields of a flow record.
//!
//! Enrichment never fails: a record always comes out, at worst with its
//! addresses standing in for hostnames.

use std::net::SocketAddr;
use std::sync::Arc;

use nfrelay_core::DecodedRecord;
use nfrelay_protocols::{PacketHeader, RawFlowRecord};

use crate::dns::DnsCache;

#[derive(Debug, Clone)]
pub struct Enricher {
    dns: Arc<DnsCache>,
}

impl Enricher {
    pub fn new(dns: Arc<DnsCache>) -> Self {
        Self { dns }
    }

    pub fn dns(&self) -> &DnsCache {
        &self.dns
    }

    /// Builds the decoded record for `flow`, exported by `exporter` under
    /// `header`.
    pub async fn enrich(
        &self,
        header: &PacketHeader,
        flow: &RawFlowRecord,
        exporter: SocketAddr,
    ) -> DecodedRecord {
        let ipv4_src_addr = flow.src_addr().to_string();
        let ipv4_dst_addr = flow.dst_addr().to_string();
        let ipv4_next_hop = flow.next_hop().to_string();

        let sampling = header.sampling();
        let header = PacketHeader {
            sampling_interval: sampling.interval,
            ..*header
        };

        let src_host_name = self.dns.get(&ipv4_src_addr).await;
        let dst_host_name = self.dns.get(&ipv4_dst_addr).await;

        DecodedRecord {
            header,
            flow: *flow,
            host: exporter.ip().to_string(),
            sampling_algorithm: sampling.algorithm,
            ipv4_src_addr,
            ipv4_dst_addr,
            ipv4_next_hop,
            src_host_name,
            dst_host_name,
            duration: flow.duration(),
        }
    }
}
