//! Benchmarks for row encoding and adapter operations

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dstates_bench::row::{decode_row, decode_row_filtered, encode_row};
use dstates_bench::{Config, DataStatesDb, Field, StoreRegistry};
use tempfile::TempDir;

const FIELD_COUNT: usize = 10;
const FIELD_LENGTH: usize = 100;

fn sample_row() -> Vec<Field> {
    (0..FIELD_COUNT)
        .map(|i| Field::new(format!("field{}", i), vec![b'a' + i as u8; FIELD_LENGTH]))
        .collect()
}

fn row_benchmarks(c: &mut Criterion) {
    let row = sample_row();
    let encoded = encode_row(&row).unwrap();
    let wanted = vec![b"field3".to_vec(), b"field7".to_vec()];

    c.bench_function("encode_row", |b| b.iter(|| encode_row(black_box(&row)).unwrap()));
    c.bench_function("decode_row", |b| b.iter(|| decode_row(black_box(&encoded)).unwrap()));
    c.bench_function("decode_row_filtered", |b| {
        b.iter(|| decode_row_filtered(black_box(&encoded), &wanted).unwrap())
    });
}

fn adapter_benchmarks(c: &mut Criterion) {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .db_path(temp_dir.path().join("bench.db"))
        .field_count(FIELD_COUNT)
        .build();
    let db = DataStatesDb::init(Arc::new(StoreRegistry::versioned()), &config).unwrap();

    for i in 0..1000 {
        db.insert("usertable", format!("user{}", i).as_bytes(), &sample_row())
            .unwrap();
    }

    let mut n = 0usize;
    c.bench_function("adapter_read", |b| {
        b.iter(|| {
            n = (n + 1) % 1000;
            db.read("usertable", format!("user{}", n).as_bytes(), None).unwrap()
        })
    });

    let mut n = 0usize;
    c.bench_function("adapter_update", |b| {
        b.iter(|| {
            n = (n + 1) % 1000;
            let value = vec![b'a' + (n % 26) as u8; FIELD_LENGTH];
            db.update(
                "usertable",
                format!("user{}", n).as_bytes(),
                &[Field::new("field4", value)],
            )
            .unwrap()
        })
    });

    db.cleanup().unwrap();
}

criterion_group!(benches, row_benchmarks, adapter_benchmarks);
criterion_main!(benches);
