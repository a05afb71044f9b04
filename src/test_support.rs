use crate::{PriorityLock, PriorityMutex};
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering::AcqRel;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

pub(crate) const CYCLES: usize = 10_000;

/// Whether the host can run both actors at once. Re-lock races and wakeup latency
/// only behave as measured with at least two CPUs.
pub(crate) fn has_parallelism() -> bool {
    let cpus = thread::available_parallelism().map_or(1, |n| n.get());
    if cpus < 2 {
        eprintln!("skipping: needs at least 2 CPUs, host has {cpus}");
    }
    cpus >= 2
}

pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Hammers `lock` from one low and one high thread, checking that no two critical
/// sections ever overlap.
pub(crate) fn assert_mutual_exclusion<L: PriorityLock + 'static>(lock: L) {
    let mutex = Arc::new(PriorityMutex::new(lock, 0usize));
    let inside = Arc::new(AtomicUsize::new(0));

    let low = {
        let mutex = mutex.clone();
        let inside = inside.clone();
        thread::spawn(move || {
            for _ in 0..CYCLES {
                let mut value = mutex.lock_low();
                assert_eq!(inside.fetch_add(1, AcqRel), 0);
                *value += 1;
                assert_eq!(inside.fetch_sub(1, AcqRel), 1);
            }
        })
    };
    let high = {
        let mutex = mutex.clone();
        let inside = inside.clone();
        thread::spawn(move || {
            for _ in 0..CYCLES {
                let mut value = mutex.lock_high();
                assert_eq!(inside.fetch_add(1, AcqRel), 0);
                *value += 1;
                assert_eq!(inside.fetch_sub(1, AcqRel), 1);
            }
        })
    };

    low.join().unwrap();
    high.join().unwrap();
    let value = mutex.lock_low();
    assert_eq!(*value, CYCLES * 2);
}

/// Checks that the first lock of a fresh instance, in either class, is granted
/// without waiting on anyone.
pub(crate) fn assert_fresh_lock_is_immediate<L: PriorityLock + 'static>(make: fn() -> L) {
    for priority in [crate::Priority::Low, crate::Priority::High] {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let lock = make();
            lock.lock(priority);
            lock.unlock(priority);
            let _ = tx.send(());
        });
        rx.recv_timeout(Duration::from_secs(1))
            .unwrap_or_else(|_| panic!("fresh {priority} lock did not return"));
    }
}
