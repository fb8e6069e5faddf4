//! Field decoding benchmarks for pxread
//!
//! These benchmarks measure the scalar codecs and the full record decoding
//! loop, which dominate table scan throughput.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use pxread::records::{decode_bcd_text, decode_number, decode_short};
use pxread::{decode_record, FieldDescriptor, FieldType, TableDescriptor};

fn bench_scalar_codecs(c: &mut Criterion) {
    let mut group = c.benchmark_group("scalar_codecs");

    group.bench_function("short", |b| {
        b.iter(|| black_box(decode_short(black_box([0x87, 0xE1]))));
    });

    group.bench_function("number", |b| {
        let raw = [0xC0, 0x5E, 0xDD, 0x2F, 0x1A, 0x9F, 0xBE, 0x77];
        b.iter(|| black_box(decode_number(black_box(raw))));
    });

    group.bench_function("bcd", |b| {
        let mut raw = [0u8; 17];
        raw[0] = 0x82;
        raw[15] = 0x23;
        raw[16] = 0x45;
        b.iter(|| black_box(decode_bcd_text(black_box(&raw), 2)));
    });

    group.finish();
}

fn bench_record_decode(c: &mut Criterion) {
    let fields = vec![
        FieldDescriptor::new("id", FieldType::AutoIncrement, 4),
        FieldDescriptor::new("name", FieldType::Alpha, 24),
        FieldDescriptor::new("qty", FieldType::Short, 2),
        FieldDescriptor::new("total", FieldType::Number, 8),
        FieldDescriptor::new("paid", FieldType::Logical, 1),
        FieldDescriptor::new("ordered", FieldType::Date, 4),
    ];
    let table = TableDescriptor::new("orders.db", fields);

    let mut record = Vec::new();
    record.extend_from_slice(&[0, 0, 1, 0]);
    record.extend_from_slice(b"a fairly typical name\0\0\0");
    record.extend_from_slice(&[0x87, 0xE1]);
    record.extend_from_slice(&[0xC0, 0x5E, 0xDD, 0x2F, 0x1A, 0x9F, 0xBE, 0x77]);
    record.push(0x81);
    record.extend_from_slice(&[0x00, 0x0B, 0x3C, 0x4A]);

    c.bench_function("decode_record_6_fields", |b| {
        b.iter(|| black_box(decode_record(black_box(&record), &table).unwrap()));
    });
}

criterion_group!(benches, bench_scalar_codecs, bench_record_decode);
criterion_main!(benches);
