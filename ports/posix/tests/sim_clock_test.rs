//! Deterministic clock tests on simulated time.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use lmic_hal_core::{ClockConfig, Ticks};
use lmic_hal_posix::{HostInterrupts, ManualTicker, SimTimeHandle, SimTimer};
use lmic_hal_time::{failed, Clock};

type SimClock = Clock<SimTimer, HostInterrupts>;

fn sim_clock() -> (Arc<SimClock>, ManualTicker, SimTimeHandle) {
    let (timer, time) = SimTimer::with_handle();
    let clock = Arc::new(Clock::new(timer, HostInterrupts::new(), ClockConfig::DEFAULT));
    let mut ticker = ManualTicker::for_clock(Arc::clone(&clock));
    clock.init(&mut ticker).expect("init");
    (clock, ticker, time)
}

#[test]
fn init_arms_default_rebase_period() {
    let (clock, ticker, _time) = sim_clock();
    assert_eq!(ticker.period_us(), Some(10_000_000));
    assert_eq!(clock.now(), Ticks::ZERO);
}

#[test]
fn rebase_keeps_count_and_drops_remainder() {
    let (clock, ticker, time) = sim_clock();

    time.advance_us(640);
    assert_eq!(clock.now().raw(), 10);
    ticker.fire();
    assert_eq!(clock.now().raw(), 10);

    // 100 us is one tick plus 36 us that the next rebase discards
    time.advance_us(100);
    assert_eq!(clock.now().raw(), 11);
    ticker.fire();
    time.advance_us(60);
    assert_eq!(clock.now().raw(), 11);
    time.advance_us(4);
    assert_eq!(clock.now().raw(), 12);
    assert_eq!(ticker.fired(), 2);
}

#[test]
fn periodic_rebase_over_a_minute() {
    let (clock, ticker, time) = sim_clock();

    for _ in 0..6 {
        time.advance_us(10_000_000);
        ticker.fire();
    }
    assert_eq!(clock.now(), Ticks::from_secs(60));
}

#[test]
fn waiter_wakes_when_time_reaches_target() {
    let (clock, _ticker, time) = sim_clock();
    let target = clock.now() + 50;
    let woke = Arc::new(AtomicBool::new(false));

    let waiter = {
        let clock = Arc::clone(&clock);
        let woke = Arc::clone(&woke);
        thread::spawn(move || {
            clock.wait_until(target);
            woke.store(true, Ordering::SeqCst);
        })
    };

    time.advance_us(49 * 64);
    thread::sleep(Duration::from_millis(20));
    assert!(!woke.load(Ordering::SeqCst));
    assert!(clock.check_timer(target));

    time.advance_us(64);
    waiter.join().expect("waiter panicked");
    assert!(woke.load(Ordering::SeqCst));
    assert_eq!(clock.delta_ticks(target), 0);
}

#[test]
fn failed_diverges() {
    let halt: fn() -> ! = failed;
    let _ = halt;
}

#[test]
#[ignore = "leaves a thread spinning at full CPU until the test binary exits"]
fn failed_spins_its_thread_forever() {
    let halted = thread::spawn(|| {
        failed();
    });

    thread::sleep(Duration::from_millis(50));
    assert!(!halted.is_finished());
}
