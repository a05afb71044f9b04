use crate::blocking_lock::BlockingLock;
use crate::priority_lock::{Priority, PriorityLock};

/// One lock shared by both classes, with no notion of priority.
///
/// Whoever wins the re-lock race keeps winning: a low caller that unlocks and
/// immediately locks again can starve the high caller indefinitely.
pub struct BasicLock {
    inner: BlockingLock,
}

impl BasicLock {
    pub fn new() -> Self {
        BasicLock {
            inner: BlockingLock::new(),
        }
    }
}

impl Default for BasicLock {
    fn default() -> Self {
        Self::new()
    }
}

impl PriorityLock for BasicLock {
    fn lock_low(&self) {
        self.inner.lock(Priority::Low);
    }

    fn unlock_low(&self) {
        self.inner.unlock(Priority::Low);
    }

    fn lock_high(&self) {
        self.inner.lock(Priority::High);
    }

    fn unlock_high(&self) {
        self.inner.unlock(Priority::High);
    }
}
