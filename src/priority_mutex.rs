use crate::lock_guard::lock_guard;
use crate::priority_lock::PriorityLock;
use std::cell::UnsafeCell;
use std::ops::{Deref, DerefMut};

/// Data protected by a [`PriorityLock`], handed out through RAII guards.
pub struct PriorityMutex<T, L: PriorityLock> {
    raw: L,
    data: UnsafeCell<T>,
}

unsafe impl<T: Send, L: PriorityLock> Send for PriorityMutex<T, L> {}

unsafe impl<T: Send, L: PriorityLock> Sync for PriorityMutex<T, L> {}

impl<T, L: PriorityLock> PriorityMutex<T, L> {
    pub fn new(raw: L, value: T) -> Self {
        PriorityMutex {
            raw,
            data: UnsafeCell::new(value),
        }
    }

    pub fn lock_low(&self) -> LowPriorityGuard<'_, T, L> {
        self.raw.lock_low();
        LowPriorityGuard::new(self)
    }

    pub fn lock_high(&self) -> HighPriorityGuard<'_, T, L> {
        self.raw.lock_high();
        HighPriorityGuard::new(self)
    }

    pub fn into_inner(self) -> T {
        self.data.into_inner()
    }
}

lock_guard!(LowPriorityGuard, unlock_low);
lock_guard!(HighPriorityGuard, unlock_high);
