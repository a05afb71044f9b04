use parking_lot::{Condvar, Mutex};

use crate::priority_lock::{release_holder, Priority, PriorityLock};

#[derive(Debug, Default)]
struct DualFlagState {
    holder: Option<Priority>,
    /// Raised by the high caller before it waits, lowered when it unlocks.
    high_waiting: bool,
}

/// Preemption where the "high is waiting" flag and the holder live under the same
/// mutex.
///
/// A low caller's admission check and the high caller's announcement are
/// serialized, so once the high caller has announced itself no low caller can slip
/// in ahead of it. Every lock and unlock pays a state mutex round trip, even when
/// uncontended.
pub struct DualFlagLock {
    state: Mutex<DualFlagState>,
    changed: Condvar,
}

impl DualFlagLock {
    pub fn new() -> Self {
        DualFlagLock {
            state: Mutex::new(DualFlagState::default()),
            changed: Condvar::new(),
        }
    }
}

impl Default for DualFlagLock {
    fn default() -> Self {
        Self::new()
    }
}

impl PriorityLock for DualFlagLock {
    fn lock_low(&self) {
        let mut state = self.state.lock();
        self.changed.wait_while(&mut state, |state| {
            state.holder.is_some() || state.high_waiting
        });
        state.holder = Some(Priority::Low);
    }

    fn unlock_low(&self) {
        release_holder(&mut self.state.lock().holder, Priority::Low);
        self.changed.notify_all();
    }

    fn lock_high(&self) {
        let mut state = self.state.lock();
        state.high_waiting = true;
        self.changed
            .wait_while(&mut state, |state| state.holder.is_some());
        state.holder = Some(Priority::High);
    }

    fn unlock_high(&self) {
        {
            let mut state = self.state.lock();
            release_holder(&mut state.holder, Priority::High);
            state.high_waiting = false;
        }
        self.changed.notify_all();
    }
}
