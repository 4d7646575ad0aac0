use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use rebase_rs::rebasing::NeighborIndex;
use rebase_rs::{AssetId, ExchangeQuote, Market, Pair, RebaseOrchestrator};

// Random market over `assets` assets; asset "0" is the reference.
fn random_market(assets: u32, pairs: usize, seed: u64) -> Market {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..pairs)
        .map(|_| {
            let base = rng.gen_range(0..assets);
            let quote = rng.gen_range(0..assets);
            let bid: f64 = rng.gen_range(0.5..2.0);
            Pair::new(base.to_string(), quote.to_string())
                .with_quote(ExchangeQuote::new(bid, bid, bid * 1.01, rng.gen_range(1.0..100.0)))
                .with_quote(ExchangeQuote::new(bid, bid * 0.99, bid, rng.gen_range(1.0..100.0)))
        })
        .collect()
}

fn bench_neighbor_index(c: &mut Criterion) {
    let market = random_market(50, 500, 7);
    c.bench_function("neighbor_index_500", |b| b.iter(|| NeighborIndex::build(black_box(&market))));
}

fn bench_rebase(c: &mut Criterion) {
    let reference = AssetId::from("0");
    let mut group = c.benchmark_group("rebase_market");
    for &(assets, pairs) in &[(20u32, 100usize), (40, 400)] {
        let market = random_market(assets, pairs, 42);
        for workers in [1usize, 4] {
            group.bench_with_input(
                BenchmarkId::new(format!("{pairs}_pairs"), workers),
                &workers,
                |b, &workers| {
                    let orchestrator = RebaseOrchestrator::new(workers);
                    b.iter(|| orchestrator.rebase(&reference, 3, black_box(&market)))
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_neighbor_index, bench_rebase);
criterion_main!(benches);
