//! Merge Throughput Benchmark
//! Three in-memory sources with partially overlapping keys

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use keymerge::merge::{merge, Source};
use keymerge::Delimiter;
use std::io::Cursor;

fn create_source_data(rows: usize, step: usize, width: usize) -> Vec<u8> {
    let mut data = String::new();
    for i in (0..rows * step).step_by(step) {
        data.push_str(&format!("key{:08}", i));
        for c in 0..width {
            data.push_str(&format!("\t{}", i * 10 + c));
        }
        data.push('\n');
    }
    data.into_bytes()
}

fn benchmark_three_way_merge(c: &mut Criterion) {
    // Steps 1, 2, 3: every key in the first, half in the second, a third in the last
    let inputs: Vec<Vec<u8>> = vec![
        create_source_data(30_000, 1, 3),
        create_source_data(15_000, 2, 2),
        create_source_data(10_000, 3, 4),
    ];
    let total_bytes: usize = inputs.iter().map(Vec::len).sum();

    let mut group = c.benchmark_group("merge");
    group.throughput(Throughput::Bytes(total_bytes as u64));
    group.bench_function("three_way_merge", |b| {
        b.iter(|| {
            let sources = inputs
                .iter()
                .enumerate()
                .map(|(i, data)| Source::new(format!("s{}", i), Cursor::new(data.as_slice()), Delimiter::TAB))
                .collect();
            let mut out = Vec::with_capacity(total_bytes * 2);
            let stats = merge(sources, &mut out, Delimiter::TAB).unwrap();
            black_box(stats.rows);
        })
    });
    group.finish();
}

criterion_group!(benches, benchmark_three_way_merge);
criterion_main!(benches);
