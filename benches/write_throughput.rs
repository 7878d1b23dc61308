//! Write throughput benchmarks
//!
//! Measures single-threaded append cost per rotation mode and contended
//! appends from several threads.

use std::hint::black_box;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tempfile::TempDir;

use rollover::{Level, Logger, RotationMode};

fn open(dir: &TempDir, mode: RotationMode) -> Logger {
    Logger::builder(dir.path(), "bench.log")
        .rotation(mode)
        .console(false)
        .monitor_interval(Duration::from_millis(100))
        .open()
        .unwrap()
}

fn bench_single_writer(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_writer");
    group.throughput(Throughput::Elements(1));

    let modes = [
        ("none", RotationMode::None),
        ("daily", RotationMode::Daily),
        (
            "size_bounded",
            RotationMode::SizeBounded {
                max_backups: 4,
                max_bytes: 1 << 20,
            },
        ),
    ];

    for (name, mode) in modes {
        let dir = TempDir::new().unwrap();
        let logger = open(&dir, mode);
        group.bench_function(BenchmarkId::new("info", name), |b| {
            b.iter(|| logger.info(black_box("benchmark line with a little payload")));
        });
        logger.close();
    }

    let dir = TempDir::new().unwrap();
    let logger = open(&dir, RotationMode::None);
    logger.set_level(Level::Error);
    group.bench_function("filtered", |b| {
        b.iter(|| logger.debug(black_box("below threshold")));
    });

    group.finish();
}

fn bench_contended_writers(c: &mut Criterion) {
    let mut group = c.benchmark_group("contended_writers");

    for threads in [2usize, 4, 8] {
        const LINES: usize = 100;
        group.throughput(Throughput::Elements((threads * LINES) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(threads), &threads, |b, &threads| {
            let dir = TempDir::new().unwrap();
            let logger = Arc::new(open(
                &dir,
                RotationMode::SizeBounded {
                    max_backups: 8,
                    max_bytes: 1 << 20,
                },
            ));
            b.iter(|| {
                let handles: Vec<_> = (0..threads)
                    .map(|t| {
                        let logger = Arc::clone(&logger);
                        thread::spawn(move || {
                            for i in 0..LINES {
                                logger.infoln(&[&"writer", &t, &i]);
                            }
                        })
                    })
                    .collect();
                for handle in handles {
                    handle.join().unwrap();
                }
            });
            logger.close();
        });
    }

    group.finish();
}

criterion_group!(benches, bench_single_writer, bench_contended_writers);
criterion_main!(benches);
