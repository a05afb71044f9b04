use std::fmt;
use std::sync::Arc;

/// The two caller classes sharing a [`PriorityLock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Priority {
    /// Long-holding, throughput-oriented caller.
    Low,
    /// Brief, latency-sensitive caller.
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Low => f.write_str("low-priority"),
            Priority::High => f.write_str("high-priority"),
        }
    }
}

/// A mutual-exclusion primitive with separate entry points for a low-priority and a
/// high-priority caller.
///
/// At most one critical section, low or high, is active at a time. Locks are not
/// reentrant, and every `unlock_*` must pair with the preceding `lock_*` of the same
/// class. Unlocking a lock that is free, or held by the other class, panics.
pub trait PriorityLock: Send + Sync {
    fn lock_low(&self);
    fn unlock_low(&self);

    fn lock_high(&self);
    fn unlock_high(&self);

    fn lock(&self, priority: Priority) {
        match priority {
            Priority::Low => self.lock_low(),
            Priority::High => self.lock_high(),
        }
    }

    fn unlock(&self, priority: Priority) {
        match priority {
            Priority::Low => self.unlock_low(),
            Priority::High => self.unlock_high(),
        }
    }
}

impl<L: PriorityLock + ?Sized> PriorityLock for Arc<L> {
    fn lock_low(&self) {
        (**self).lock_low();
    }

    fn unlock_low(&self) {
        (**self).unlock_low();
    }

    fn lock_high(&self) {
        (**self).lock_high();
    }

    fn unlock_high(&self) {
        (**self).unlock_high();
    }
}

/// Clears `holder`, asserting it was held by `priority`.
///
/// Leaves `holder` untouched when the check fails.
pub(crate) fn release_holder(holder: &mut Option<Priority>, priority: Priority) {
    match *holder {
        Some(current) if current == priority => *holder = None,
        Some(current) => panic!("{priority} unlock while the lock is held by {current}"),
        None => panic!("{priority} unlock without a matching lock"),
    }
}
