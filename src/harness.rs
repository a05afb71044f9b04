//! Drives one low-priority and one high-priority actor against a [`PriorityLock`]
//! for a fixed wall-clock window.

use std::any::Any;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering::{Acquire, Release};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use serde::{Serialize, Serializer};
use tracing::{debug, info, instrument};

use crate::error::{Error, Result};
use crate::priority_lock::{Priority, PriorityLock};
use crate::strategy::Strategy;

/// Shape of one contention workload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct WorkloadParameters {
    /// How long the low actor holds the lock per cycle.
    #[serde(serialize_with = "as_nanos")]
    pub low_hold: Duration,
    /// How long the high actor holds the lock per cycle.
    #[serde(serialize_with = "as_nanos")]
    pub high_hold: Duration,
    /// How long the high actor works without the lock between cycles.
    #[serde(serialize_with = "as_nanos")]
    pub high_idle: Duration,
}

impl WorkloadParameters {
    pub fn from_micros(low_hold: u64, high_hold: u64, high_idle: u64) -> Self {
        WorkloadParameters {
            low_hold: Duration::from_micros(low_hold),
            high_hold: Duration::from_micros(high_hold),
            high_idle: Duration::from_micros(high_idle),
        }
    }
}

/// What one run measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ContentionResult {
    /// Total time the low actor spent inside its critical section.
    #[serde(serialize_with = "as_nanos")]
    pub low_held: Duration,
    /// Total time the high actor spent blocked in `lock_high`.
    #[serde(serialize_with = "as_nanos")]
    pub high_wait: Duration,
    pub low_cycles: u64,
    pub high_cycles: u64,
}

pub(crate) fn as_nanos<S: Serializer>(
    duration: &Duration,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration.as_nanos() as u64)
}

/// Runs strategies against workloads with a fixed measurement window.
#[derive(Debug, Clone, Copy)]
pub struct ContentionHarness {
    window: Duration,
}

impl ContentionHarness {
    pub fn new(window: Duration) -> Self {
        ContentionHarness { window }
    }

    /// Runs `strategy` on a freshly built lock.
    pub fn run_strategy(
        &self,
        strategy: Strategy,
        params: WorkloadParameters,
    ) -> Result<ContentionResult> {
        let result = run(strategy.build(), params, self.window)?;
        info!(
            %strategy,
            low_held_ns = result.low_held.as_nanos() as u64,
            high_wait_ns = result.high_wait.as_nanos() as u64,
            "contention run finished"
        );
        Ok(result)
    }
}

struct ActorReport {
    total: Duration,
    cycles: u64,
}

/// Runs both actors against `lock` for `window` and returns what they measured.
///
/// After the window the stop flag is raised and each actor finishes its current
/// cycle before exiting. Actors are joined in the order they finish. If the first
/// one panicked, the other is left running: it may be blocked on a lock the
/// panicking actor never released.
#[instrument(skip(lock))]
pub fn run(
    lock: Arc<dyn PriorityLock>,
    params: WorkloadParameters,
    window: Duration,
) -> Result<ContentionResult> {
    let stop = Arc::new(AtomicBool::new(false));

    let low = spawn_actor(Priority::Low, {
        let lock = lock.clone();
        let stop = stop.clone();
        move || low_actor(&*lock, params.low_hold, &stop)
    })?;
    let high = spawn_actor(Priority::High, {
        let stop = stop.clone();
        move || high_actor(&*lock, params.high_hold, params.high_idle, &stop)
    });
    let high = match high {
        Ok(high) => high,
        Err(err) => {
            stop.store(true, Release);
            let _ = low.join();
            return Err(err);
        }
    };

    thread::sleep(window);
    stop.store(true, Release);

    let (low, high) = join_actors(low, high)?;
    Ok(ContentionResult {
        low_held: low.total,
        high_wait: high.total,
        low_cycles: low.cycles,
        high_cycles: high.cycles,
    })
}

fn spawn_actor<F>(actor: Priority, body: F) -> Result<JoinHandle<ActorReport>>
where
    F: FnOnce() -> ActorReport + Send + 'static,
{
    thread::Builder::new()
        .name(actor.to_string())
        .spawn(body)
        .map_err(|source| Error::Spawn { actor, source })
}

const JOIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Joins whichever actor finishes first, then the other.
fn join_actors(
    low: JoinHandle<ActorReport>,
    high: JoinHandle<ActorReport>,
) -> Result<(ActorReport, ActorReport)> {
    while !low.is_finished() && !high.is_finished() {
        thread::sleep(JOIN_POLL_INTERVAL);
    }
    if low.is_finished() {
        let low = join_actor(Priority::Low, low)?;
        Ok((low, join_actor(Priority::High, high)?))
    } else {
        let high = join_actor(Priority::High, high)?;
        Ok((join_actor(Priority::Low, low)?, high))
    }
}

fn join_actor(actor: Priority, handle: JoinHandle<ActorReport>) -> Result<ActorReport> {
    handle.join().map_err(|payload| Error::ActorPanicked {
        actor,
        message: panic_message(payload),
    })
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    match payload.downcast::<String>() {
        Ok(message) => *message,
        Err(payload) => match payload.downcast::<&'static str>() {
            Ok(message) => (*message).to_owned(),
            Err(_) => "unknown panic payload".to_owned(),
        },
    }
}

fn low_actor(lock: &dyn PriorityLock, hold: Duration, stop: &AtomicBool) -> ActorReport {
    let mut held = Duration::ZERO;
    let mut cycles = 0;
    while !stop.load(Acquire) {
        lock.lock_low();
        let start = Instant::now();
        thread::sleep(hold);
        held += start.elapsed();
        lock.unlock_low();
        cycles += 1;
    }
    debug!(cycles, held_ns = held.as_nanos() as u64, "low-priority actor stopped");
    ActorReport { total: held, cycles }
}

fn high_actor(
    lock: &dyn PriorityLock,
    hold: Duration,
    idle: Duration,
    stop: &AtomicBool,
) -> ActorReport {
    let mut waited = Duration::ZERO;
    let mut cycles = 0;
    while !stop.load(Acquire) {
        thread::sleep(idle);
        let start = Instant::now();
        lock.lock_high();
        waited += start.elapsed();
        thread::sleep(hold);
        lock.unlock_high();
        cycles += 1;
    }
    debug!(cycles, waited_ns = waited.as_nanos() as u64, "high-priority actor stopped");
    ActorReport { total: waited, cycles }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::init_tracing;

    struct PanickingLock {
        on: Priority,
        inner: crate::DualFlagLock,
    }

    impl PriorityLock for PanickingLock {
        fn lock_low(&self) {
            assert!(self.on != Priority::Low, "refusing low-priority lock");
            self.inner.lock_low();
        }

        fn unlock_low(&self) {
            self.inner.unlock_low();
        }

        fn lock_high(&self) {
            assert!(self.on != Priority::High, "refusing high-priority lock");
            self.inner.lock_high();
        }

        fn unlock_high(&self) {
            self.inner.unlock_high();
        }
    }

    /// Panics on `unlock_high` and keeps the lock held by the high caller.
    struct StuckHighLock {
        inner: crate::DualFlagLock,
    }

    impl PriorityLock for StuckHighLock {
        fn lock_low(&self) {
            self.inner.lock_low();
        }

        fn unlock_low(&self) {
            self.inner.unlock_low();
        }

        fn lock_high(&self) {
            self.inner.lock_high();
        }

        fn unlock_high(&self) {
            panic!("refusing high-priority unlock");
        }
    }

    #[test]
    fn both_actors_make_progress() {
        init_tracing();
        let params = WorkloadParameters::from_micros(1_000, 100, 1_000);
        let harness = ContentionHarness::new(Duration::from_millis(200));
        for strategy in Strategy::ALL {
            let result = harness.run_strategy(strategy, params).unwrap();
            assert!(result.low_cycles > 0, "{strategy}: {result:?}");
            assert!(result.high_cycles > 0, "{strategy}: {result:?}");
            assert!(result.low_held > Duration::ZERO, "{strategy}: {result:?}");
        }
    }

    #[test]
    fn low_held_is_bounded_by_window() {
        let params = WorkloadParameters::from_micros(1_000, 10, 100_000);
        let window = Duration::from_millis(100);
        let result = run(Strategy::DualFlagPreemptive.build(), params, window).unwrap();
        assert!(result.low_held >= params.low_hold);
        assert!(result.low_held < window * 2, "{result:?}");
    }

    #[test]
    fn high_panic_is_reported() {
        let lock = Arc::new(PanickingLock {
            on: Priority::High,
            inner: crate::DualFlagLock::new(),
        });
        let params = WorkloadParameters::from_micros(100, 10, 10);
        let err = run(lock, params, Duration::from_millis(20)).unwrap_err();
        match err {
            Error::ActorPanicked { actor, message } => {
                assert_eq!(actor, Priority::High);
                assert_eq!(message, "refusing high-priority lock");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn low_panic_is_reported() {
        let lock = Arc::new(PanickingLock {
            on: Priority::Low,
            inner: crate::DualFlagLock::new(),
        });
        let params = WorkloadParameters::from_micros(100, 10, 10);
        let err = run(lock, params, Duration::from_millis(20)).unwrap_err();
        assert!(matches!(err, Error::ActorPanicked { actor: Priority::Low, .. }));
    }

    #[test]
    fn high_panic_while_holding_does_not_hang() {
        let lock = Arc::new(StuckHighLock {
            inner: crate::DualFlagLock::new(),
        });
        let params = WorkloadParameters::from_micros(1_000, 10, 100);
        let (tx, rx) = std::sync::mpsc::channel();
        thread::spawn(move || {
            let _ = tx.send(run(lock, params, Duration::from_millis(50)));
        });
        let err = rx
            .recv_timeout(Duration::from_secs(5))
            .expect("run did not return")
            .unwrap_err();
        match err {
            Error::ActorPanicked { actor, message } => {
                assert_eq!(actor, Priority::High);
                assert_eq!(message, "refusing high-priority unlock");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn serializes_durations_as_nanos() {
        let result = ContentionResult {
            low_held: Duration::from_micros(3),
            high_wait: Duration::from_nanos(7),
            low_cycles: 1,
            high_cycles: 2,
        };
        let json = serde_json::to_value(result).unwrap();
        assert_eq!(json["low_held"], 3_000);
        assert_eq!(json["high_wait"], 7);
    }
}
