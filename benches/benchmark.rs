//! Performance benchmarks for genome-coordmap
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use genome_coordmap::core::{
    BuildOptions, ChromRecord, Direction, GenomeCoordinateMapper, PairwiseCoordinateIndex,
    PreAligned, Side,
};

/// Synthetic alignment: an indel every `spacing` columns, alternating sides
fn synthetic_alignment(len: usize, spacing: usize) -> (Vec<u8>, Vec<u8>) {
    let bases = b"ACGT";
    let mut a = Vec::with_capacity(len);
    let mut b = Vec::with_capacity(len);
    for i in 0..len {
        let base = bases[i % 4];
        let indel = i % spacing == spacing - 1;
        match (indel, (i / spacing) % 2) {
            (true, 0) => {
                a.push(b'-');
                b.push(base);
            }
            (true, _) => {
                a.push(base);
                b.push(b'-');
            }
            (false, _) => {
                a.push(base);
                b.push(base);
            }
        }
    }
    (a, b)
}

/// Benchmark index construction
fn bench_index_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_build");

    for len in [10_000usize, 100_000, 1_000_000].iter() {
        let (a, b) = synthetic_alignment(*len, 50);
        group.throughput(Throughput::Bytes(*len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), len, |bench, _| {
            bench.iter(|| {
                let index = PairwiseCoordinateIndex::new(black_box(&a), black_box(&b)).unwrap();
                black_box(index)
            })
        });
    }

    group.finish();
}

/// Benchmark single position queries
fn bench_single_query(c: &mut Criterion) {
    let (a, b) = synthetic_alignment(1_000_000, 50);
    let index = PairwiseCoordinateIndex::new(&a, &b).unwrap();

    c.bench_function("map_single_position", |bench| {
        bench.iter(|| black_box(index.map(black_box(500_000), Direction::AToB)))
    });
}

/// Benchmark batch queries through the genome mapper
fn bench_batch_query(c: &mut Criterion) {
    let (a, b) = synthetic_alignment(1_000_000, 50);
    let genome_a = vec![ChromRecord::new("chr1", a)];
    let genome_b = vec![ChromRecord::new("1", b)];
    let mapper =
        GenomeCoordinateMapper::build(&genome_a, &genome_b, &PreAligned, BuildOptions::default())
            .unwrap();

    let positions: Vec<u64> = (0..1000).map(|i| 1 + i * 900).collect();
    let mut group = c.benchmark_group("batch_query");

    for size in [100usize, 500, 1000].iter() {
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |bench, &size| {
            bench.iter(|| {
                for pos in positions.iter().take(size) {
                    black_box(mapper.map_a_to_b("chr1", *pos, Side::Left).unwrap());
                }
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_index_build, bench_single_query, bench_batch_query);
criterion_main!(benches);
