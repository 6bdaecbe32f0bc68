use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use snowgen::{
    DEFAULT_EPOCH, IdGenStatus, MonotonicClock, SnowflakeGenerator, SystemClock, TimeSource,
};
use std::{
    sync::{Arc, Barrier},
    thread::scope,
    time::Instant,
};

struct FixedMockTime {
    millis: u64,
}

impl TimeSource for FixedMockTime {
    fn current_millis(&self) -> u64 {
        self.millis
    }
}

fn fixed_time() -> FixedMockTime {
    FixedMockTime {
        millis: DEFAULT_EPOCH.as_millis() as u64 + 1,
    }
}

// One full millisecond of sequence space, so a fresh generator on a fixed
// clock never has to wait.
const TOTAL_IDS: usize = 4096;

/// Benchmarks the hot path where every call issues an ID immediately.
fn bench_generator<T>(c: &mut Criterion, group_name: &str, time_factory: impl Fn() -> T)
where
    T: TimeSource,
{
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();

            for _ in 0..iters {
                let generator = SnowflakeGenerator::with_time(0, 0, time_factory()).unwrap();
                for _ in 0..TOTAL_IDS {
                    black_box(generator.next_id().unwrap());
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

/// Benchmarks the non-blocking path on a real clock, yielding on `Pending`.
fn bench_generator_yield<T>(c: &mut Criterion, group_name: &str, time_factory: impl Fn() -> T)
where
    T: TimeSource,
{
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let generator = SnowflakeGenerator::with_time(0, 0, time_factory()).unwrap();
            let start = Instant::now();

            for _ in 0..iters {
                for _ in 0..TOTAL_IDS {
                    loop {
                        match generator.try_next_id().unwrap() {
                            IdGenStatus::Ready { id } => {
                                black_box(id);
                                break;
                            }
                            IdGenStatus::Pending { .. } => std::thread::yield_now(),
                        }
                    }
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

/// Benchmarks one generator shared by several threads contending for its lock.
fn bench_generator_contended<T>(c: &mut Criterion, group_name: &str, time_factory: impl Fn() -> T)
where
    T: TimeSource + Send + Sync,
{
    let mut group = c.benchmark_group(group_name);

    for thread_count in [1, 2, 4, 8, 16] {
        let ids_per_thread = TOTAL_IDS / thread_count;

        group.throughput(Throughput::Elements(TOTAL_IDS as u64));
        group.bench_function(format!("elems/{TOTAL_IDS}/threads/{thread_count}"), |b| {
            b.iter_custom(|iters| {
                let start = Instant::now();

                for _ in 0..iters {
                    let generator =
                        Arc::new(SnowflakeGenerator::with_time(0, 0, time_factory()).unwrap());
                    let barrier = Arc::new(Barrier::new(thread_count + 1));
                    scope(|s| {
                        for _ in 0..thread_count {
                            let generator = Arc::clone(&generator);
                            let barrier = Arc::clone(&barrier);
                            s.spawn(move || {
                                barrier.wait();
                                for _ in 0..ids_per_thread {
                                    black_box(generator.next_id().unwrap());
                                }
                            });
                        }
                        barrier.wait();
                    });
                }

                start.elapsed()
            });
        });
    }

    group.finish();
}

fn benchmarks(c: &mut Criterion) {
    let clock = MonotonicClock::new();
    let mono = move || clock.clone();

    bench_generator(c, "mock/sequential", fixed_time);
    bench_generator(c, "system/sequential", || SystemClock);
    bench_generator(c, "mono/sequential", &mono);

    bench_generator_yield(c, "system/sequential/yield", || SystemClock);
    bench_generator_yield(c, "mono/sequential/yield", &mono);

    bench_generator_contended(c, "mock/contended", fixed_time);
    bench_generator_contended(c, "mono/contended", &mono);
}

criterion_group!(benches, benchmarks);
criterion_main!(benches);
