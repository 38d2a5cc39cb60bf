#![allow(unused)]
extern crate asval;

use asval::codec::{MsgPackSerializer, Serializer};
use asval::{ArrayList, List, Map, Value};
use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::hint::black_box;

/// A record-like map: short string keys with scalar and list values
fn sample_record() -> Value {
    let map = Map::hashmap(32).unwrap();
    for i in 0..24 {
        let value = match i % 3 {
            0 => Value::integer(i * 1_000_003),
            1 => Value::string(format!("value number {i}")),
            _ => {
                let list: ArrayList = (0..8).map(Value::integer).collect();
                Value::List(List::owned(list))
            }
        };
        map.set(Value::string(format!("bin{i}")), value).unwrap();
    }
    Value::Map(map)
}

/// Benchmark encoding and decoding a record-sized map
fn bench_record(c: &mut Criterion) {
    let serializer = MsgPackSerializer::new();
    let record = sample_record();
    let bytes = serializer.serialize_to_vec(&record).unwrap();

    let mut group = c.benchmark_group("msgpack_record");
    group.throughput(Throughput::Bytes(bytes.len() as u64));
    group.bench_function("serialize", |b| {
        let mut out = Vec::with_capacity(bytes.len());
        b.iter(|| {
            out.clear();
            serializer.serialize(black_box(&record), &mut out).unwrap();
            black_box(out.len())
        });
    });
    group.bench_function("deserialize", |b| {
        b.iter(|| {
            let value = serializer.deserialize(black_box(&bytes)).unwrap();
            black_box(value)
        });
    });
    group.finish();
}

criterion_group!(benches, bench_record);
criterion_main!(benches);
