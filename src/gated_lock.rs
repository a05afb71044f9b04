use crate::blocking_lock::BlockingLock;
use crate::priority_lock::{Priority, PriorityLock};

/// A data lock behind an admission gate that both classes pass through.
///
/// The gate is held only while waiting for the data lock, so a caller already queued
/// on the gate gets the data lock before a releaser coming back around. Starvation
/// is reduced, not removed.
pub struct GatedLock {
    gate: BlockingLock,
    data: BlockingLock,
}

impl GatedLock {
    pub fn new() -> Self {
        GatedLock {
            gate: BlockingLock::new(),
            data: BlockingLock::new(),
        }
    }

    fn acquire(&self, priority: Priority) {
        self.gate.lock(priority);
        self.data.lock(priority);
        self.gate.unlock(priority);
    }
}

impl Default for GatedLock {
    fn default() -> Self {
        Self::new()
    }
}

impl PriorityLock for GatedLock {
    fn lock_low(&self) {
        self.acquire(Priority::Low);
    }

    fn unlock_low(&self) {
        self.data.unlock(Priority::Low);
    }

    fn lock_high(&self) {
        self.acquire(Priority::High);
    }

    fn unlock_high(&self) {
        self.data.unlock(Priority::High);
    }
}
