//! Criterion benchmarks for block generation.
//!
//! Run with:
//!   cargo bench
//!   cargo bench --features parallel
//!
//! Results are saved to target/criterion/

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use stimseq::prelude::*;

/// Build + verify a single block at growing block sizes.
fn bench_block_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("block_size");

    // (K, P) pairs with K*P divisible by K+1.
    for &(k, p) in [(2usize, 6usize), (3, 16), (5, 60), (7, 200)].iter() {
        let cfg = SequenceConfig::new(k, p);
        group.throughput(Throughput::Elements(cfg.block_len() as u64));

        group.bench_with_input(
            BenchmarkId::new("build", format!("k{k}_p{p}")),
            &cfg,
            |b, cfg| {
                let mut rng = Prng::new(42);
                b.iter(|| black_box(build_block(cfg, &mut rng).map(|blk| blk.len())))
            },
        );

        group.bench_with_input(
            BenchmarkId::new("verify", format!("k{k}_p{p}")),
            &cfg,
            |b, cfg| {
                let block = build_block(cfg, &mut Prng::new(42)).unwrap_or_default();
                b.iter(|| black_box(verify(&block, cfg).is_ok()))
            },
        );
    }

    group.finish();
}

/// Whole runs, comparing execution tiers.
fn bench_run_tiers(c: &mut Criterion) {
    let mut group = c.benchmark_group("run_tier");
    let base = RunConfig::new(SequenceConfig::new(3, 64), 256).with_seed(7);

    // Parallel falls back to sequential if the feature is not enabled.
    for tier in [ExecutionTier::Sequential, ExecutionTier::Parallel] {
        let orch = match Orchestrator::new(base.with_tier(tier)) {
            Ok(o) => o,
            Err(_) => continue,
        };
        group.bench_function(format!("{tier:?}").to_lowercase(), |b| {
            b.iter(|| black_box(orch.run().map(|r| r.blocks.len())))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_block_sizes, bench_run_tiers);
criterion_main!(benches);
