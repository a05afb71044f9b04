/// Declares an RAII guard over a [`PriorityMutex`](crate::PriorityMutex) that calls
/// `$unlock` on the underlying lock when dropped.
macro_rules! lock_guard {
    ($name: ident, $unlock: ident) => {
        pub struct $name<'a, T, L: PriorityLock> {
            mutex: &'a PriorityMutex<T, L>,
        }

        impl<T, L: PriorityLock> $name<'_, T, L> {
            fn new(mutex: &PriorityMutex<T, L>) -> $name<'_, T, L> {
                $name { mutex }
            }
        }

        impl<T, L: PriorityLock> Deref for $name<'_, T, L> {
            type Target = T;

            fn deref(&self) -> &T {
                unsafe { &*self.mutex.data.get() }
            }
        }

        impl<T, L: PriorityLock> DerefMut for $name<'_, T, L> {
            fn deref_mut(&mut self) -> &mut T {
                unsafe { &mut *self.mutex.data.get() }
            }
        }

        impl<T, L: PriorityLock> Drop for $name<'_, T, L> {
            fn drop(&mut self) {
                self.mutex.raw.$unlock();
            }
        }
    };
}

pub(crate) use lock_guard;
