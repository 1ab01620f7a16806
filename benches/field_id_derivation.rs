//! Child id derivation benchmarks
//!
//! - `derive/*`: one id from a typed key (hashing plus key encoding)
//! - `scan/*`: a full window scan against an in-memory store
//!
//! ## Running
//!
//! ```bash
//! cargo bench --bench field_id_derivation
//! ```

use childfield::{
    derive_child_id_for_index, scan_window, scan_window_sparse, IndexWindow, KeyType, MemoryStore,
    ObjectId, ObjectVersion, ScalarKind, TypeTag,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

const PARENT: &str = "0x260d9bb579adc62ce0d2a094c39cd062cd0db1fc0fbbc7922e8dd88e39a0da4b";
const I32_TYPE: &str =
    "0x70285592c97965e811e0c6f98dccc3a9c2b4ad854b3594faab9597ada267b860::i32::I32";

fn parent() -> ObjectId {
    PARENT.parse().unwrap()
}

fn i32_key() -> KeyType {
    let tag: TypeTag = I32_TYPE.parse().unwrap();
    KeyType::from_tag(tag, vec![ScalarKind::U32]).unwrap()
}

fn derive_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("derive");
    let parent = parent();
    let u64_key = KeyType::primitive(ScalarKind::U64);
    let i32_key = i32_key();

    group.throughput(Throughput::Elements(1));
    group.bench_function("u64_key", |b| {
        let mut index = 0u64;
        b.iter(|| {
            index = index.wrapping_add(1);
            black_box(derive_child_id_for_index(&parent, &u64_key, index).unwrap())
        });
    });
    group.bench_function("i32_wrapper_key", |b| {
        let mut index = 0u64;
        b.iter(|| {
            index = (index + 1) % u64::from(u32::MAX);
            black_box(derive_child_id_for_index(&parent, &i32_key, index).unwrap())
        });
    });
    group.finish();
}

fn scan_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan");
    let parent = parent();
    let key = KeyType::primitive(ScalarKind::U64);

    let store = MemoryStore::new();
    for index in (0..2_000u64).step_by(4) {
        store
            .insert_child(
                &parent,
                &key,
                &key.key_for_index(index).unwrap(),
                ObjectVersion::new(1),
                vec![0u8; 64],
            )
            .unwrap();
    }

    for radius in [10u64, 100, 1_000] {
        let window = IndexWindow::around(1_000, radius);
        group.throughput(Throughput::Elements(window.len()));
        group.bench_with_input(BenchmarkId::new("dense", radius), &window, |b, window| {
            b.iter(|| {
                black_box(scan_window(&store, &parent, &key, *window, ObjectVersion::MAX).unwrap())
            });
        });
    }

    let gap = IndexWindow::around(10_000, 1_000);
    group.bench_function("sparse_empty_region", |b| {
        b.iter(|| {
            black_box(
                scan_window_sparse(&store, &parent, &key, gap, ObjectVersion::MAX, 16).unwrap(),
            )
        });
    });
    group.finish();
}

criterion_group!(benches, derive_benchmarks, scan_benchmarks);
criterion_main!(benches);
