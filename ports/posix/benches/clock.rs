use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use lmic_hal_core::{delta_ticks, Ticks};
use lmic_hal_posix::{PortConfig, PosixHal};

fn bench_clock(c: &mut Criterion) {
    let hal = match PosixHal::start(PortConfig::default()) {
        Ok(hal) => hal,
        Err(err) => panic!("cannot start HAL: {err}"),
    };
    let clock = hal.clock();

    c.bench_function("now", |b| b.iter(|| black_box(clock.now())));

    c.bench_function("enter_critical", |b| {
        b.iter(|| {
            let guard = clock.enter_critical();
            black_box(&guard);
        })
    });

    c.bench_function("clock_delta_ticks", |b| {
        let target = clock.now() + 1_000;
        b.iter(|| black_box(clock.delta_ticks(black_box(target))))
    });

    c.bench_function("delta_ticks", |b| {
        b.iter(|| {
            delta_ticks(
                black_box(Ticks::new(0xFFFF_FF00)),
                black_box(Ticks::new(0x10)),
            )
        })
    });

    if let Err(err) = hal.shutdown() {
        panic!("shutdown failed: {err}");
    }
}

criterion_group!(benches, bench_clock);
criterion_main!(benches);
