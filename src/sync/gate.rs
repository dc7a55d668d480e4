use std::cell::UnsafeCell;
use std::ops::{Deref, DerefMut};

use parking_lot::Mutex;

use super::Semaphore;

/// A reader-writer gate owning the value it protects.
///
/// Shared access is counted: [`read`](AdmissionGate::read) increments a reader count under its
/// own mutex and the 0 to 1 transition acquires a binary [`Semaphore`] on behalf of the whole
/// reader group, which the 1 to 0 transition releases.
/// [`write`](AdmissionGate::write) acquires the semaphore directly, so a writer holds the value
/// exclusively and readers run concurrently with each other but never with a writer.
///
/// The counter mutex is held while the first reader waits for the semaphore, so readers
/// arriving behind a blocked first reader queue rather than overtaking it.
///
/// There is no fairness: an unbroken succession of readers keeps the semaphore held and can
/// starve a writer indefinitely.
///
/// ```rust
/// use gridlock::sync::AdmissionGate;
///
/// let gate = AdmissionGate::new(vec![1, 2, 3]);
/// {
///     let values = gate.read();
///     assert_eq!(values.iter().sum::<i32>(), 6);
/// }
/// gate.write().push(4);
/// assert_eq!(gate.read().len(), 4);
/// ```
pub struct AdmissionGate<T> {
    /// The number of currently admitted readers.
    readers: Mutex<usize>,
    /// Exclusive access to the value: held by one writer or by the group of readers.
    access: Semaphore,
    value: UnsafeCell<T>,
}

// SAFETY: the gate hands out `&T` only under read admission and `&mut T` only under write
// admission, the same access discipline as a standard reader-writer lock.
unsafe impl<T: Send> Send for AdmissionGate<T> {}
unsafe impl<T: Send + Sync> Sync for AdmissionGate<T> {}

impl<T> AdmissionGate<T> {
    /// Create a new gate protecting `value`.
    pub const fn new(value: T) -> Self {
        Self {
            readers: Mutex::new(0),
            access: Semaphore::new(1),
            value: UnsafeCell::new(value),
        }
    }

    /// Admit a reader, blocking while a writer holds the gate.
    ///
    /// The returned guard dereferences to `&T` and releases the admission when dropped.
    #[must_use]
    pub fn read(&self) -> AdmissionReadGuard<'_, T> {
        let mut readers = self.readers.lock();
        *readers += 1;
        if *readers == 1 {
            self.access.acquire();
        }
        AdmissionReadGuard { gate: self }
    }

    /// Admit the writer, blocking while readers or another writer hold the gate.
    ///
    /// The returned guard dereferences to `&mut T` and releases the gate when dropped.
    #[must_use]
    pub fn write(&self) -> AdmissionWriteGuard<'_, T> {
        self.access.acquire();
        AdmissionWriteGuard { gate: self }
    }

    /// Mutable access to the value without admission.
    ///
    /// The exclusive borrow guarantees no guard is outstanding.
    pub fn get_mut(&mut self) -> &mut T {
        self.value.get_mut()
    }

    /// Consume the gate, returning the protected value.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.value.into_inner()
    }

    /// The number of currently admitted readers.
    ///
    /// A snapshot: the value can be stale as soon as it is returned.
    #[must_use]
    pub fn reader_count(&self) -> usize {
        *self.readers.lock()
    }
}

impl<T: Default> Default for AdmissionGate<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> core::fmt::Debug for AdmissionGate<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AdmissionGate")
            .field("readers", &self.reader_count())
            .finish_non_exhaustive()
    }
}

impl<T> From<T> for AdmissionGate<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

/// RAII guard for shared admission to an [`AdmissionGate`].
///
/// Dropping the guard releases the admission; the last reader out releases the gate itself.
#[must_use]
pub struct AdmissionReadGuard<'a, T> {
    gate: &'a AdmissionGate<T>,
}

impl<T> Deref for AdmissionReadGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: read admission is held, so no write guard aliases the value.
        unsafe { &*self.gate.value.get() }
    }
}

impl<T> Drop for AdmissionReadGuard<'_, T> {
    fn drop(&mut self) {
        let mut readers = self.gate.readers.lock();
        *readers -= 1;
        if *readers == 0 {
            self.gate.access.release();
        }
    }
}

impl<T: core::fmt::Debug> core::fmt::Debug for AdmissionReadGuard<'_, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Debug::fmt(&**self, f)
    }
}

/// RAII guard for exclusive admission to an [`AdmissionGate`].
///
/// Dropping the guard releases the gate.
#[must_use]
pub struct AdmissionWriteGuard<'a, T> {
    gate: &'a AdmissionGate<T>,
}

impl<T> Deref for AdmissionWriteGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: write admission is exclusive.
        unsafe { &*self.gate.value.get() }
    }
}

impl<T> DerefMut for AdmissionWriteGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: write admission is exclusive and the guard is borrowed mutably.
        unsafe { &mut *self.gate.value.get() }
    }
}

impl<T> Drop for AdmissionWriteGuard<'_, T> {
    fn drop(&mut self) {
        self.gate.access.release();
    }
}

impl<T: core::fmt::Debug> core::fmt::Debug for AdmissionWriteGuard<'_, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Debug::fmt(&**self, f)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Barrier;
    use std::time::Duration;

    use super::*;

    #[test]
    fn gate_read_write() {
        let gate = AdmissionGate::new(1u32);
        assert_eq!(*gate.read(), 1);
        *gate.write() = 2;
        assert_eq!(*gate.read(), 2);
    }

    #[test]
    fn gate_reader_count() {
        let gate = AdmissionGate::new(());
        assert_eq!(gate.reader_count(), 0);
        let first = gate.read();
        let second = gate.read();
        assert_eq!(gate.reader_count(), 2);
        drop(first);
        assert_eq!(gate.reader_count(), 1);
        drop(second);
        assert_eq!(gate.reader_count(), 0);
    }

    #[test]
    fn gate_concurrent_readers() {
        // Deadlocks here if readers excluded each other: all four must be admitted at once to
        // pass the barrier.
        let gate = AdmissionGate::new(5u32);
        let barrier = Barrier::new(4);
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    let value = gate.read();
                    barrier.wait();
                    assert_eq!(*value, 5);
                });
            }
        });
        assert_eq!(gate.reader_count(), 0);
    }

    #[test]
    fn gate_writer_waits_for_readers() {
        let gate = AdmissionGate::new(0u32);
        let wrote = AtomicBool::new(false);
        std::thread::scope(|scope| {
            let reader = gate.read();
            scope.spawn(|| {
                *gate.write() += 1;
                wrote.store(true, Ordering::SeqCst);
            });
            std::thread::sleep(Duration::from_millis(50));
            assert!(!wrote.load(Ordering::SeqCst));
            assert_eq!(*reader, 0);
            drop(reader);
        });
        assert!(wrote.load(Ordering::SeqCst));
        assert_eq!(*gate.read(), 1);
    }

    #[test]
    fn gate_readers_wait_for_writer() {
        let gate = AdmissionGate::new(0u32);
        let observed = AtomicBool::new(false);
        std::thread::scope(|scope| {
            let mut writer = gate.write();
            scope.spawn(|| {
                let value = gate.read();
                assert_eq!(*value, 7);
                observed.store(true, Ordering::SeqCst);
            });
            std::thread::sleep(Duration::from_millis(50));
            assert!(!observed.load(Ordering::SeqCst));
            *writer = 7;
            drop(writer);
        });
        assert!(observed.load(Ordering::SeqCst));
    }

    #[test]
    fn gate_exclusive_borrow_access() {
        let mut gate = AdmissionGate::new(vec![1, 2]);
        gate.get_mut().push(3);
        assert_eq!(gate.into_inner(), vec![1, 2, 3]);
    }
}
