#[macro_use]
extern crate criterion;

use criterion::Criterion;

use nfrelay_core::events::{output_channel, DecodedRecord};

fn bench_output_channel_push_pop(c: &mut Criterion) {
    let mut group = c.benchmark_group("output_channel_throughput");

    for capacity in [1, 100, 16384] {
        group.throughput(criterion::Throughput::Elements(1));
        group.bench_function(format!("capacity_{}", capacity), |b| {
            let (tx, mut rx) = output_channel(capacity).unwrap();
            let record = DecodedRecord {
                host: "192.0.2.1".into(),
                ipv4_src_addr: "10.0.0.1".into(),
                ipv4_dst_addr: "10.0.0.2".into(),
                ..Default::default()
            };
            b.iter(|| {
                tx.try_send(record.clone()).unwrap();
                rx.try_recv().unwrap();
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_output_channel_push_pop);
criterion_main!(benches);
