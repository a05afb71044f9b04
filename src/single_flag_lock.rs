use parking_lot::{Condvar, Mutex};
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering::{Acquire, Release};

use crate::priority_lock::{release_holder, Priority, PriorityLock};

/// Preemption through a single "high is waiting" flag kept outside the lock.
///
/// The high caller raises the flag, waits for the lock, and lowers the flag once it
/// is granted. Low callers defer while the flag is up. The flag store is not ordered
/// with the low caller's check under the state mutex, so a low caller that checked
/// just before the store still takes the lock and the high caller waits out a full
/// low critical section. [`DualFlagLock`](crate::DualFlagLock) closes that gap.
pub struct SingleFlagLock {
    holder: Mutex<Option<Priority>>,
    high_waiting: AtomicBool,
    changed: Condvar,
}

impl SingleFlagLock {
    pub fn new() -> Self {
        SingleFlagLock {
            holder: Mutex::new(None),
            high_waiting: AtomicBool::new(false),
            changed: Condvar::new(),
        }
    }

    fn release(&self, priority: Priority) {
        release_holder(&mut self.holder.lock(), priority);
        self.changed.notify_all();
    }
}

impl Default for SingleFlagLock {
    fn default() -> Self {
        Self::new()
    }
}

impl PriorityLock for SingleFlagLock {
    fn lock_low(&self) {
        let mut holder = self.holder.lock();
        self.changed.wait_while(&mut holder, |holder| {
            holder.is_some() || self.high_waiting.load(Acquire)
        });
        *holder = Some(Priority::Low);
    }

    fn unlock_low(&self) {
        self.release(Priority::Low);
    }

    fn lock_high(&self) {
        self.high_waiting.store(true, Release);
        {
            let mut holder = self.holder.lock();
            self.changed.wait_while(&mut holder, |holder| holder.is_some());
            *holder = Some(Priority::High);
        }
        self.high_waiting.store(false, Release);
    }

    fn unlock_high(&self) {
        self.release(Priority::High);
    }
}
