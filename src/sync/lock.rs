//! A reader/writer lock with writer preference.
//!
//! `std::sync::RwLock` leaves reader/writer fairness to the OS. The
//! engine wants a fixed policy: once a writer is waiting, newly arriving
//! readers queue behind it, so a stream of searches cannot starve a
//! merge. This lock implements that policy with a mutex and a condition
//! variable. The guards are RAII, so an unwinding holder always releases
//! its permit and partial lock states are never observable. Re-entrant
//! acquisition by the same thread is not supported.

use std::cell::UnsafeCell;
use std::ops::{Deref, DerefMut};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct LockState {
    /// Readers currently holding the lock.
    readers: usize,
    /// Whether a writer currently holds the lock.
    writer: bool,
    /// Writers blocked on the lock; arriving readers yield to these.
    waiting_writers: usize,
}

/// Multi-reader, single-writer lock with writer preference.
pub struct ReadWriteLock<T> {
    state: Mutex<LockState>,
    changed: Condvar,
    value: UnsafeCell<T>,
}

// The state machine hands out either many `&T` or one `&mut T`, never
// both, which is exactly the aliasing contract these impls assert.
unsafe impl<T: Send> Send for ReadWriteLock<T> {}
unsafe impl<T: Send + Sync> Sync for ReadWriteLock<T> {}

impl<T> ReadWriteLock<T> {
    pub fn new(value: T) -> Self {
        Self {
            state: Mutex::new(LockState::default()),
            changed: Condvar::new(),
            value: UnsafeCell::new(value),
        }
    }

    fn state(&self) -> MutexGuard<'_, LockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn wait<'a>(&self, state: MutexGuard<'a, LockState>) -> MutexGuard<'a, LockState> {
        self.changed.wait(state).unwrap_or_else(PoisonError::into_inner)
    }

    /// Acquire a shared read permit. Blocks while a writer holds the
    /// lock or is queued for it.
    pub fn read(&self) -> ReadGuard<'_, T> {
        let mut state = self.state();
        while state.writer || state.waiting_writers > 0 {
            state = self.wait(state);
        }
        state.readers += 1;
        ReadGuard { lock: self }
    }

    /// Acquire the exclusive write permit. Blocks until current readers
    /// and writers drain; while queued, new readers are turned away.
    pub fn write(&self) -> WriteGuard<'_, T> {
        let mut state = self.state();
        state.waiting_writers += 1;
        while state.writer || state.readers > 0 {
            state = self.wait(state);
        }
        state.waiting_writers -= 1;
        state.writer = true;
        WriteGuard { lock: self }
    }

    /// Consume the lock and return the protected value.
    pub fn into_inner(self) -> T {
        self.value.into_inner()
    }
}

/// Shared access to the protected value; released on drop.
pub struct ReadGuard<'a, T> {
    lock: &'a ReadWriteLock<T>,
}

impl<T> Deref for ReadGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        unsafe { &*self.lock.value.get() }
    }
}

impl<T> Drop for ReadGuard<'_, T> {
    fn drop(&mut self) {
        let mut state = self.lock.state();
        state.readers -= 1;
        if state.readers == 0 {
            self.lock.changed.notify_all();
        }
    }
}

/// Exclusive access to the protected value; released on drop.
pub struct WriteGuard<'a, T> {
    lock: &'a ReadWriteLock<T>,
}

impl<T> Deref for WriteGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        unsafe { &*self.lock.value.get() }
    }
}

impl<T> DerefMut for WriteGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        unsafe { &mut *self.lock.value.get() }
    }
}

impl<T> Drop for WriteGuard<'_, T> {
    fn drop(&mut self) {
        let mut state = self.lock.state();
        state.writer = false;
        self.lock.changed.notify_all();
    }
}
