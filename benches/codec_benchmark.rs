use bytes::BytesMut;
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rak_encap::{EncapsulatedPacket, Reliability};

fn packet() -> EncapsulatedPacket {
    EncapsulatedPacket::new(Reliability::ReliableOrdered, vec![0x42; 512])
        .with_message_index(1234)
        .with_ordering(56, 0)
        .with_split(4, 7, 1)
}

fn bench_wire(c: &mut Criterion) {
    let pkt = packet();
    let encoded = pkt.to_wire_bytes();

    c.bench_function("wire_encode", |b| {
        let mut buf = BytesMut::with_capacity(pkt.get_total_length());
        b.iter(|| {
            buf.clear();
            black_box(&pkt).encode_wire(&mut buf);
        })
    });

    c.bench_function("wire_decode", |b| {
        b.iter(|| EncapsulatedPacket::decode_wire(black_box(&encoded)).unwrap())
    });
}

fn bench_internal(c: &mut Criterion) {
    let pkt = packet().with_ack_receipt(99);
    let encoded = pkt.to_internal_bytes();

    c.bench_function("internal_encode", |b| {
        let mut buf = BytesMut::with_capacity(pkt.internal_length());
        b.iter(|| {
            buf.clear();
            black_box(&pkt).encode_internal(&mut buf);
        })
    });

    c.bench_function("internal_decode", |b| {
        b.iter(|| EncapsulatedPacket::decode_internal(black_box(&encoded)).unwrap())
    });
}

criterion_group!(benches, bench_wire, bench_internal);
criterion_main!(benches);
