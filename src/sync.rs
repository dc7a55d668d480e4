//! Synchronisation primitives underpinning the shared structures.
//!
//! [`Semaphore`] is a blocking counting semaphore built from a [`parking_lot::Mutex`] and
//! [`parking_lot::Condvar`].
//! Unlike a mutex guard, a permit is not tied to the thread that acquired it, so one thread can
//! acquire and another release.
//!
//! [`AdmissionGate`] is a reader-writer lock assembled from a reader counter and a binary
//! [`Semaphore`]: the first admitted reader acquires the semaphore on behalf of all concurrent
//! readers and the last one out releases it, while writers acquire it directly.
//! The gate owns the value it protects and hands out RAII guards, so admission and release are
//! always paired.
//!
//! Neither primitive makes any fairness guarantee.
//! Waiters are admitted in whatever order they win the race, and a continuous stream of readers
//! can hold an [`AdmissionGate`] indefinitely while a writer waits.

mod gate;
mod semaphore;

pub use self::{
    gate::{AdmissionGate, AdmissionReadGuard, AdmissionWriteGuard},
    semaphore::Semaphore,
};
