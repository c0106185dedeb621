use std::time::Instant;

use criterion::{BatchSize, Criterion, Throughput, criterion_group, criterion_main};
use evictkit::Cache;
use evictkit::core::CacheCore;
use evictkit::ds::FrequencyBuckets;
use evictkit::policy::lfu::LfuOrder;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn filled_core(capacity: u64) -> CacheCore<u64, u64, LfuOrder<u64, u64>> {
    let mut core = CacheCore::try_new(LfuOrder::with_capacity(capacity as usize), capacity as usize, None)
        .expect("non-zero capacity");
    for i in 0..capacity {
        core.add(i, i, None);
    }
    core
}

fn bench_lfu_add_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("lfu_core");
    group.throughput(Throughput::Elements(1024 * 2));
    group.bench_function("add_get", |b| {
        b.iter_batched(
            || filled_core(1024),
            |mut core| {
                for i in 0..1024u64 {
                    core.add(std::hint::black_box(i + 10_000), i, None);
                    let _ = std::hint::black_box(core.get(&std::hint::black_box(i)).is_some());
                }
            },
            BatchSize::SmallInput,
        )
    });
    group.bench_function("eviction_churn", |b| {
        b.iter_batched(
            || filled_core(1024),
            |mut core| {
                for i in 0..4096u64 {
                    core.add(std::hint::black_box(10_000 + i), i, None);
                }
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_lfu_frequency_updates(c: &mut Criterion) {
    c.bench_function("lfu_frequency_updates", |b| {
        b.iter_batched(
            || filled_core(1024),
            |mut core| {
                // climb a few keys far up the bucket chain
                for round in 0..64u64 {
                    for i in 0..16u64 {
                        let _ = std::hint::black_box(core.get(&((i * 61 + round) % 1024)).is_some());
                    }
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_lfu_buckets_touch_ns(c: &mut Criterion) {
    c.bench_function("lfu_buckets_touch_ns", |b| {
        b.iter_custom(|iters| {
            let capacity = 16_384usize;
            let mut buckets = FrequencyBuckets::with_capacity(capacity);
            let ids: Vec<_> = (0..capacity as u64).map(|i| buckets.insert(i)).collect();
            let start = Instant::now();
            for idx in 0..iters as usize {
                let _ = std::hint::black_box(buckets.touch(ids[idx % capacity]));
            }
            start.elapsed()
        })
    });
}

/// Half adds, half gets over a key space four times the capacity.
fn bench_lfu_random_trace(c: &mut Criterion) {
    let mut group = c.benchmark_group("lfu_random_trace");
    let operations = 100_000usize;
    group.throughput(Throughput::Elements(operations as u64));
    group.bench_function("rand_8192", |b| {
        b.iter_batched(
            || {
                let mut rng = StdRng::seed_from_u64(42);
                let trace: Vec<u64> = (0..operations).map(|_| rng.random_range(0..32_768)).collect();
                let cache: Cache<u64, u64> = Cache::new_lfu(8192).expect("non-zero capacity");
                (cache, trace)
            },
            |(cache, trace)| {
                let mut hits = 0u64;
                for (i, &key) in trace.iter().enumerate() {
                    if i % 2 == 0 {
                        cache.add(key, key, None);
                    } else if cache.get(&key).is_some() {
                        hits += 1;
                    }
                }
                std::hint::black_box(hits)
            },
            BatchSize::LargeInput,
        )
    });
    group.finish();
}

criterion_group!(core_level, bench_lfu_add_get, bench_lfu_frequency_updates);
criterion_group!(micro_ops, bench_lfu_buckets_touch_ns);
criterion_group!(workloads, bench_lfu_random_trace);
criterion_main!(core_level, micro_ops, workloads);
