//! InfluxDB line protocol rendering.

use std::borrow::Cow;
use std::fmt::Write;

use nfrelay_core::DecodedRecord;

pub const MEASUREMENT: &str = "netflow";

/// Renders one record as a single line-protocol point, without a trailing
/// newline. One point per datagram on the wire.
pub fn format_record(record: &DecodedRecord) -> String {
    let flow = &record.flow;
    let mut line = String::with_capacity(256);
    // Writing into a String cannot fail.
    let _ = write!(
        line,
        "{MEASUREMENT},host={},srcAddr={},dstAddr={},srcHostName={},dstHostName={},\
         protocol={},srcPort={},dstPort={},input={},output={} \
         inBytes={},inPackets={},duration={} {}",
        escape_tag(&record.host),
        escape_tag(&record.ipv4_src_addr),
        escape_tag(&record.ipv4_dst_addr),
        escape_tag(&record.src_host_name),
        escape_tag(&record.dst_host_name),
        flow.protocol,
        flow.l4_src_port,
        flow.l4_dst_port,
        flow.input_snmp,
        flow.output_snmp,
        flow.in_bytes,
        flow.in_pkts,
        record.duration,
        record.timestamp_ns(),
    );
    line
}

/// Backslash-escapes the characters line protocol treats as delimiters in
/// tag values.
pub fn escape_tag(value: &str) -> Cow<'_, str> {
    if !value.contains([',', '=', ' ']) {
        return Cow::Borrowed(value);
    }
    let mut escaped = String::with_capacity(value.len() + 4);
    for c in value.chars() {
        if matches!(c, ',' | '=' | ' ') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    Cow::Owned(escaped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nfrelay_protocols::{PacketHeader, RawFlowRecord};

    fn sample_record() -> DecodedRecord {
        DecodedRecord {
            header: PacketHeader {
                version: 5,
                flow_records: 1,
                unix_sec: 1_700_000_000,
                unix_nsec: 5,
                ..Default::default()
            },
            flow: RawFlowRecord {
                protocol: 6,
                l4_src_port: 443,
                l4_dst_port: 51000,
                input_snmp: 1,
                output_snmp: 2,
                in_bytes: 1500,
                in_pkts: 3,
                ..Default::default()
            },
            host: "192.0.2.10".into(),
            ipv4_src_addr: "10.0.0.1".into(),
            ipv4_dst_addr: "10.0.0.2".into(),
            src_host_name: "a.example".into(),
            dst_host_name: "10.0.0.2".into(),
            duration: 7,
            ..Default::default()
        }
    }

    #[test]
    fn test_formats_point() {
        assert_eq!(
            format_record(&sample_record()),
            "netflow,host=192.0.2.10,srcAddr=10.0.0.1,dstAddr=10.0.0.2,\
             srcHostName=a.example,dstHostName=10.0.0.2,protocol=6,srcPort=443,\
             dstPort=51000,input=1,output=2 inBytes=1500,inPackets=3,duration=7 \
             1700000000000000005"
        );
    }

    #[test]
    fn test_timestamp_does_not_overflow() {
        let mut record = sample_record();
        record.header.unix_sec = u32::MAX;
        record.header.unix_nsec = 999_999_999;
        let line = format_record(&record);
        assert!(line.ends_with(" 4294967295999999999"));
    }

    #[test]
    fn test_escapes_tag_delimiters() {
        assert_eq!(escape_tag("plain.example"), "plain.example");
        assert_eq!(escape_tag("a b,c=d"), "a\\ b\\,c\\=d");

        let mut record = sample_record();
        record.src_host_name = "odd name".into();
        assert!(format_record(&record).contains("srcHostName=odd\\ name,"));
    }
}
