use parking_lot::{Condvar, Mutex};

/// A blocking counting semaphore.
///
/// A semaphore starts with a number of permits.
/// [`acquire`](Semaphore::acquire) takes a permit, blocking until one is available, and
/// [`release`](Semaphore::release) returns one.
/// Permits are not owned: any thread may release, whether or not it acquired, which is what
/// lets the last reader of an [`AdmissionGate`](super::AdmissionGate) release a permit taken
/// by the first.
///
/// There is no fairness. A thread calling [`acquire`](Semaphore::acquire) while waiters are
/// blocked can take a freshly released permit ahead of them.
pub struct Semaphore {
    /// Available permits.
    permits: Mutex<usize>,
    /// Signalled on release.
    released: Condvar,
}

impl Semaphore {
    /// Create a new semaphore with `permits` available permits.
    ///
    /// `permits` may be zero, in which case every [`acquire`](Semaphore::acquire) blocks until
    /// a [`release`](Semaphore::release) from another thread.
    #[must_use]
    pub const fn new(permits: usize) -> Self {
        Self {
            permits: Mutex::new(permits),
            released: Condvar::new(),
        }
    }

    /// Take a permit, blocking indefinitely until one is available.
    pub fn acquire(&self) {
        let mut permits = self.permits.lock();
        while *permits == 0 {
            self.released.wait(&mut permits);
        }
        *permits -= 1;
    }

    /// Take a permit if one is immediately available.
    ///
    /// Returns `true` if a permit was taken.
    #[must_use]
    pub fn try_acquire(&self) -> bool {
        let mut permits = self.permits.lock();
        if *permits == 0 {
            false
        } else {
            *permits -= 1;
            true
        }
    }

    /// Return a permit and wake one waiter, if any.
    pub fn release(&self) {
        let mut permits = self.permits.lock();
        *permits += 1;
        self.released.notify_one();
    }

    /// The number of permits currently available.
    ///
    /// A snapshot: the value can be stale as soon as it is returned.
    #[must_use]
    pub fn available_permits(&self) -> usize {
        *self.permits.lock()
    }
}

impl core::fmt::Debug for Semaphore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Semaphore")
            .field("available", &self.available_permits())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;

    #[test]
    fn semaphore_permits() {
        let semaphore = Semaphore::new(2);
        assert_eq!(semaphore.available_permits(), 2);

        assert!(semaphore.try_acquire());
        assert!(semaphore.try_acquire());
        assert!(!semaphore.try_acquire());
        assert_eq!(semaphore.available_permits(), 0);

        semaphore.release();
        assert_eq!(semaphore.available_permits(), 1);
        semaphore.acquire();
        assert_eq!(semaphore.available_permits(), 0);

        semaphore.release();
        semaphore.release();
        assert_eq!(semaphore.available_permits(), 2);
    }

    #[test]
    fn semaphore_bounds_concurrency() {
        let semaphore = Semaphore::new(2);
        let live = AtomicUsize::new(0);
        let high_water = AtomicUsize::new(0);
        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    semaphore.acquire();
                    let now = live.fetch_add(1, Ordering::SeqCst) + 1;
                    high_water.fetch_max(now, Ordering::SeqCst);
                    std::thread::sleep(Duration::from_millis(2));
                    live.fetch_sub(1, Ordering::SeqCst);
                    semaphore.release();
                });
            }
        });
        assert!(high_water.load(Ordering::SeqCst) <= 2);
        assert_eq!(semaphore.available_permits(), 2);
    }

    #[test]
    fn semaphore_zero_permits_blocks() {
        let semaphore = Semaphore::new(0);
        assert!(!semaphore.try_acquire());
        std::thread::scope(|scope| {
            scope.spawn(|| {
                // Blocks until the release below.
                semaphore.acquire();
            });
            std::thread::sleep(Duration::from_millis(10));
            semaphore.release();
        });
        assert_eq!(semaphore.available_permits(), 0);
    }

    #[test]
    fn semaphore_release_from_another_thread() {
        let semaphore = Semaphore::new(1);
        semaphore.acquire();
        std::thread::scope(|scope| {
            scope.spawn(|| semaphore.release());
        });
        assert_eq!(semaphore.available_permits(), 1);
    }
}
