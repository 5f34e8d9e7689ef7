#[macro_use]
extern crate criterion;

use criterion::{black_box, Criterion, Throughput};

use nfrelay_protocols::{encode_packet, NetflowV5Parser, PacketHeader, RawFlowRecord};

// A full-size export: 30 records is the most a v5 datagram carries.
fn full_export() -> bytes::Bytes {
    let header = PacketHeader {
        version: 5,
        flow_records: 30,
        uptime: 86_400_000,
        unix_sec: 1_700_000_000,
        sampling_interval: 0x4064,
        ..Default::default()
    };
    let records: Vec<RawFlowRecord> = (0..30u32)
        .map(|i| RawFlowRecord {
            ipv4_src_addr_int: 0x0A00_0000 + i,
            ipv4_dst_addr_int: 0xC0A8_0000 + i,
            in_pkts: i,
            in_bytes: i * 1500,
            first_int: 1_000,
            last_int: 31_000,
            l4_dst_port: 443,
            protocol: 6,
            ..Default::default()
        })
        .collect();
    encode_packet(&header, &records)
}

fn benchmark_netflow_v5_parsing(c: &mut Criterion) {
    let parser = NetflowV5Parser::new();
    let data = full_export();

    let mut group = c.benchmark_group("netflow_v5");
    group.throughput(Throughput::Elements(30));
    group.bench_function("parse_30_records", |b| {
        b.iter(|| {
            let (header, records) = parser.parse(black_box(&data)).unwrap();
            black_box(header);
            for record in records {
                black_box(record.unwrap());
            }
        })
    });
    group.finish();
}

criterion_group!(benches, benchmark_netflow_v5_parsing);
criterion_main!(benches);
