//! # Compact Block Reconstruction Benchmarks
//!
//! Measures the receive-side hot path (decode + index build + match sweep)
//! under relay-realistic pool sizes:
//!
//! | Scenario | Pool | Block composition |
//! |----------|------|-------------------|
//! | optimistic | 50k txs | coinbase + 7,000 pool txs + 10 overflow txs |
//! | all_unknown | 50k txs | coinbase + 3,000 txs the node has never seen |
//!
//! The all_unknown case is swept against overflow caches of 0, 100, and
//! 5,000 entries to expose the cost of indexing the extra pool.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;
use std::time::Duration;

use cb_reconstruction::{
    BlockReconstructionApi, BlockReconstructionService, CompactBlock, ReconstructionConfig,
};
use cb_tests::fixtures::{build_block, make_transactions, test_rng, StaticMempool};

const POOL_SIZE: usize = 50_000;
const POOL_TXS_IN_BLOCK: usize = 7_000;
const EXTRA_TXS_IN_BLOCK: usize = 10;
const RANDOM_TXS_IN_BLOCK: usize = 3_000;

fn bench_optimistic_reconstruction(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconstruction-optimistic");
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(20);

    let mut rng = test_rng(0xB10C);
    let pool = make_transactions(POOL_SIZE, &mut rng);
    let extra = make_transactions(EXTRA_TXS_IN_BLOCK, &mut rng);

    let mut in_block: Vec<_> = pool[..POOL_TXS_IN_BLOCK].to_vec();
    in_block.extend(extra.iter().cloned());
    let block = build_block(&in_block);
    let compact = CompactBlock::from_block(&block, 0xDEAD_BEEF, &[]).unwrap();

    let service = BlockReconstructionService::new(
        ReconstructionConfig::default(),
        Arc::new(StaticMempool::new(pool)),
    );
    for tx in &extra {
        service.add_extra_txn(Arc::clone(tx));
    }

    group.throughput(Throughput::Elements(compact.slot_count() as u64));
    group.bench_function("decode_index_sweep_7010_txs", |b| {
        b.iter(|| {
            let (state, missing) = service
                .begin_reconstruction(black_box(compact.clone()))
                .unwrap();
            assert!(missing.is_empty());
            black_box(state)
        })
    });

    group.finish();
}

fn bench_sweep_with_unknown_block(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconstruction-all-unknown");
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(20);

    let mut rng = test_rng(0xF00D);
    let pool = make_transactions(POOL_SIZE, &mut rng);
    let in_block = make_transactions(RANDOM_TXS_IN_BLOCK, &mut rng);
    let block = build_block(&in_block);
    let compact = CompactBlock::from_block(&block, 7, &[]).unwrap();

    for extra_capacity in [0usize, 100, 5_000] {
        let config = ReconstructionConfig {
            extra_pool_capacity: extra_capacity,
            ..Default::default()
        };
        let service = BlockReconstructionService::new(
            config,
            Arc::new(StaticMempool::new(pool.clone())),
        );
        let extra = make_transactions(extra_capacity, &mut rng);
        for tx in extra {
            service.add_extra_txn(tx);
        }

        group.throughput(Throughput::Elements(compact.slot_count() as u64));
        group.bench_with_input(
            BenchmarkId::new("sweep_3000_missing_extra_pool", extra_capacity),
            &service,
            |b, svc| {
                b.iter(|| {
                    let (state, missing) = svc
                        .begin_reconstruction(black_box(compact.clone()))
                        .unwrap();
                    assert_eq!(missing.len(), RANDOM_TXS_IN_BLOCK);
                    black_box(state)
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_optimistic_reconstruction,
    bench_sweep_with_unknown_block,
);

criterion_main!(benches);
