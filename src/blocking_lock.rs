use parking_lot::{Condvar, Mutex};

use crate::priority_lock::{release_holder, Priority};

/// An unfair blocking lock that remembers which class holds it.
///
/// A releaser that immediately locks again usually beats the waiter it just woke.
/// `BasicLock` relies on this to reproduce starvation.
pub(crate) struct BlockingLock {
    holder: Mutex<Option<Priority>>,
    released: Condvar,
}

impl BlockingLock {
    pub(crate) fn new() -> Self {
        BlockingLock {
            holder: Mutex::new(None),
            released: Condvar::new(),
        }
    }

    pub(crate) fn lock(&self, priority: Priority) {
        let mut holder = self.holder.lock();
        self.released.wait_while(&mut holder, |holder| holder.is_some());
        *holder = Some(priority);
    }

    pub(crate) fn unlock(&self, priority: Priority) {
        release_holder(&mut self.holder.lock(), priority);
        // Notified after the state mutex is dropped so the waiter is not handed the
        // state mutex directly.
        self.released.notify_one();
    }

    #[cfg(test)]
    pub(crate) fn holder(&self) -> Option<Priority> {
        *self.holder.lock()
    }
}
