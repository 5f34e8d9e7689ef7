//! ## nfrelay-protocols::netflow_v5
//! Fixed-offset NetFlow v5 decoder.
//!
//! A datagram is one 24-byte header followed by `flow_records` 48-byte flow
//! records, all big-endian. Records are decoded lazily through
//! [`FlowRecords`] so a truncated tail still yields every complete record in
//! front of it.

use std::net::Ipv4Addr;

use bytes::{Buf, BufMut, Bytes, BytesMut};
use serde::Serialize;
use thiserror::Error;

/// Size of the packet header on the wire.
pub const HEADER_LEN: usize = 24;
/// Size of one flow record on the wire.
pub const RECORD_LEN: usize = 48;

const NETFLOW_V5_VERSION: u16 = 5;

/// Errors that can occur while decoding a NetFlow v5 datagram.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("datagram too short for NetFlow v5 header: {remaining} bytes, need 24")]
    TruncatedHeader { remaining: usize },
    #[error("flow record {index} truncated: {remaining} bytes left, need 48")]
    TruncatedRecord { index: u16, remaining: usize },
    #[error("unsupported NetFlow version {0}")]
    UnsupportedVersion(u16),
}

/// NetFlow v5 packet header.
///
/// `sampling_interval` holds the packed wire form until enrichment replaces
/// it with the decoded 14-bit interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PacketHeader {
    pub version: u16,
    pub flow_records: u16,
    pub uptime: u32,
    pub unix_sec: u32,
    pub unix_nsec: u32,
    pub flow_seq_num: u32,
    pub engine_type: u8,
    #[serde(rename = "EngineID")]
    pub engine_id: u8,
    pub sampling_interval: u16,
}

impl PacketHeader {
    /// Reads a header from the front of `buf`, advancing it by [`HEADER_LEN`].
    pub fn decode<B: Buf>(buf: &mut B) -> Result<Self, ParseError> {
        if buf.remaining() < HEADER_LEN {
            return Err(ParseError::TruncatedHeader {
                remaining: buf.remaining(),
            });
        }

        Ok(Self {
            version: buf.get_u16(),
            flow_records: buf.get_u16(),
            uptime: buf.get_u32(),
            unix_sec: buf.get_u32(),
            unix_nsec: buf.get_u32(),
            flow_seq_num: buf.get_u32(),
            engine_type: buf.get_u8(),
            engine_id: buf.get_u8(),
            sampling_interval: buf.get_u16(),
        })
    }

    pub fn encode(&self, out: &mut BytesMut) {
        out.reserve(HEADER_LEN);
        out.put_u16(self.version);
        out.put_u16(self.flow_records);
        out.put_u32(self.uptime);
        out.put_u32(self.unix_sec);
        out.put_u32(self.unix_nsec);
        out.put_u32(self.flow_seq_num);
        out.put_u8(self.engine_type);
        out.put_u8(self.engine_id);
        out.put_u16(self.sampling_interval);
    }

    /// Decodes the packed sampling field.
    #[inline]
    pub fn sampling(&self) -> Sampling {
        Sampling::from_packed(self.sampling_interval)
    }

    /// Export time in nanoseconds since the Unix epoch.
    #[inline]
    pub fn export_timestamp_ns(&self) -> u64 {
        u64::from(self.unix_sec) * 1_000_000_000 + u64::from(self.unix_nsec)
    }
}

/// Sampling mode and interval unpacked from the header's 16-bit field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sampling {
    /// Bits 15..14.
    pub algorithm: u8,
    /// Bits 13..0.
    pub interval: u16,
}

impl Sampling {
    #[inline]
    pub fn from_packed(raw: u16) -> Self {
        Self {
            algorithm: ((raw >> 14) & 0x3) as u8,
            interval: raw & 0x3FFF,
        }
    }
}

/// One NetFlow v5 flow record. Pad bytes are consumed on decode and written
/// as zero on encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawFlowRecord {
    pub ipv4_src_addr_int: u32,
    pub ipv4_dst_addr_int: u32,
    pub ipv4_next_hop_int: u32,
    pub input_snmp: u16,
    pub output_snmp: u16,
    pub in_pkts: u32,
    pub in_bytes: u32,
    pub first_int: u32,
    pub last_int: u32,
    pub l4_src_port: u16,
    pub l4_dst_port: u16,
    #[serde(rename = "TCPFlags")]
    pub tcp_flags: u8,
    pub protocol: u8,
    pub src_tos: u8,
    pub src_as: u16,
    pub dst_as: u16,
    pub src_mask: u8,
    pub dst_mask: u8,
}

impl RawFlowRecord {
    /// Reads one record from the front of `buf`. Returns `None` without
    /// consuming anything if fewer than [`RECORD_LEN`] bytes remain.
    pub fn decode<B: Buf>(buf: &mut B) -> Option<Self> {
        if buf.remaining() < RECORD_LEN {
            return None;
        }

        let ipv4_src_addr_int = buf.get_u32();
        let ipv4_dst_addr_int = buf.get_u32();
        let ipv4_next_hop_int = buf.get_u32();
        let input_snmp = buf.get_u16();
        let output_snmp = buf.get_u16();
        let in_pkts = buf.get_u32();
        let in_bytes = buf.get_u32();
        let first_int = buf.get_u32();
        let last_int = buf.get_u32();
        let l4_src_port = buf.get_u16();
        let l4_dst_port = buf.get_u16();
        buf.advance(1); // pad1
        let tcp_flags = buf.get_u8();
        let protocol = buf.get_u8();
        let src_tos = buf.get_u8();
        let src_as = buf.get_u16();
        let dst_as = buf.get_u16();
        let src_mask = buf.get_u8();
        let dst_mask = buf.get_u8();
        buf.advance(2); // pad2

        Some(Self {
            ipv4_src_addr_int,
            ipv4_dst_addr_int,
            ipv4_next_hop_int,
            input_snmp,
            output_snmp,
            in_pkts,
            in_bytes,
            first_int,
            last_int,
            l4_src_port,
            l4_dst_port,
            tcp_flags,
            protocol,
            src_tos,
            src_as,
            dst_as,
            src_mask,
            dst_mask,
        })
    }

    pub fn encode(&self, out: &mut BytesMut) {
        out.reserve(RECORD_LEN);
        out.put_u32(self.ipv4_src_addr_int);
        out.put_u32(self.ipv4_dst_addr_int);
        out.put_u32(self.ipv4_next_hop_int);
        out.put_u16(self.input_snmp);
        out.put_u16(self.output_snmp);
        out.put_u32(self.in_pkts);
        out.put_u32(self.in_bytes);
        out.put_u32(self.first_int);
        out.put_u32(self.last_int);
        out.put_u16(self.l4_src_port);
        out.put_u16(self.l4_dst_port);
        out.put_u8(0);
        out.put_u8(self.tcp_flags);
        out.put_u8(self.protocol);
        out.put_u8(self.src_tos);
        out.put_u16(self.src_as);
        out.put_u16(self.dst_as);
        out.put_u8(self.src_mask);
        out.put_u8(self.dst_mask);
        out.put_u16(0);
    }

    #[inline]
    pub fn src_addr(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.ipv4_src_addr_int)
    }

    #[inline]
    pub fn dst_addr(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.ipv4_dst_addr_int)
    }

    #[inline]
    pub fn next_hop(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.ipv4_next_hop_int)
    }

    /// Flow duration in seconds. The uptime counter wraps at 2^32 ms, so the
    /// subtraction wraps too.
    #[inline]
    pub fn duration(&self) -> u32 {
        self.last_int.wrapping_sub(self.first_int) / 1000
    }
}

/// Iterator over the flow records following a header.
///
/// Yields at most `flow_records` items. The first truncated record produces a
/// single [`ParseError::TruncatedRecord`] and ends iteration.
#[derive(Debug, Clone)]
pub struct FlowRecords<'a> {
    buf: &'a [u8],
    index: u16,
    count: u16,
    done: bool,
}

impl<'a> FlowRecords<'a> {
    fn new(buf: &'a [u8], count: u16) -> Self {
        Self {
            buf,
            index: 0,
            count,
            done: false,
        }
    }
}

impl Iterator for FlowRecords<'_> {
    type Item = Result<RawFlowRecord, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.index >= self.count {
            return None;
        }

        let index = self.index;
        self.index += 1;
        match RawFlowRecord::decode(&mut self.buf) {
            Some(record) => Some(Ok(record)),
            None => {
                self.done = true;
                Some(Err(ParseError::TruncatedRecord {
                    index,
                    remaining: self.buf.len(),
                }))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        let left = usize::from(self.count - self.index);
        (left.min(self.buf.len() / RECORD_LEN), Some(left))
    }
}

/// Stateless NetFlow v5 datagram parser.
///
/// The version field is not checked unless the parser is built with
/// [`NetflowV5Parser::strict`].
#[derive(Default, Debug, Copy, Clone)]
pub struct NetflowV5Parser {
    strict_version: bool,
}

impl NetflowV5Parser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parser that rejects datagrams whose version field is not 5.
    pub fn strict() -> Self {
        Self {
            strict_version: true,
        }
    }

    pub fn with_strict_version(strict_version: bool) -> Self {
        Self { strict_version }
    }

    /// Parses the header and returns it with an iterator over the records.
    pub fn parse<'a>(&self, data: &'a [u8]) -> Result<(PacketHeader, FlowRecords<'a>), ParseError> {
        let mut buf = data;
        let header = PacketHeader::decode(&mut buf)?;
        if self.strict_version && header.version != NETFLOW_V5_VERSION {
            return Err(ParseError::UnsupportedVersion(header.version));
        }
        Ok((header, FlowRecords::new(buf, header.flow_records)))
    }
}

/// Encodes a header followed by `records` into one datagram payload.
///
/// The header's `flow_records` is written as given, so callers can build
/// packets that declare more records than they carry.
pub fn encode_packet(header: &PacketHeader, records: &[RawFlowRecord]) -> Bytes {
    let mut out = BytesMut::with_capacity(HEADER_LEN + records.len() * RECORD_LEN);
    header.encode(&mut out);
    for record in records {
        record.encode(&mut out);
    }
    out.freeze()
}
