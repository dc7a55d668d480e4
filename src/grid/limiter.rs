use parking_lot::{Condvar, Mutex};

/// Admission bookkeeping for the current bound.
#[derive(Debug)]
struct State {
    /// Maximum concurrent admissions, or [`None`] for unbounded.
    limit: Option<usize>,
    /// Admissions outstanding against the current bound.
    admitted: usize,
    /// Incremented by every reconfiguration, so slots of a replaced bound drain without
    /// touching its successor's count.
    epoch: usize,
}

/// An optional bound on the number of concurrently admitted searches.
///
/// Unbounded by default. When bounded, each search takes a [`SearchSlot`] before scanning and
/// holds it for the whole scan.
#[derive(Debug)]
pub struct SearchLimiter {
    state: Mutex<State>,
    changed: Condvar,
}

impl SearchLimiter {
    /// Create a limiter admitting at most `limit` concurrent searches, or unbounded if [`None`].
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            state: Mutex::new(State {
                limit,
                admitted: 0,
                epoch: 0,
            }),
            changed: Condvar::new(),
        }
    }

    /// Replace the bound.
    ///
    /// The new bound starts with all slots free. Searches admitted against the previous bound
    /// drain without affecting it, and searches still waiting re-evaluate against the new bound.
    pub fn set_limit(&self, limit: Option<usize>) {
        let mut state = self.state.lock();
        state.epoch += 1;
        state.limit = limit;
        state.admitted = 0;
        drop(state);
        self.changed.notify_all();
    }

    /// Take a slot, blocking while the bound is reached.
    ///
    /// Returns [`None`] without blocking when unbounded.
    pub fn admit(&self) -> Option<SearchSlot<'_>> {
        let mut state = self.state.lock();
        loop {
            let Some(limit) = state.limit else {
                return None;
            };
            if state.admitted < limit {
                state.admitted += 1;
                return Some(SearchSlot {
                    limiter: self,
                    epoch: state.epoch,
                });
            }
            self.changed.wait(&mut state);
        }
    }

    fn release(&self, epoch: usize) {
        let mut state = self.state.lock();
        // A slot of a replaced bound has already been written off by `set_limit`.
        if state.epoch == epoch {
            state.admitted -= 1;
            drop(state);
            self.changed.notify_one();
        }
    }
}

/// An admitted search. Dropping the slot readmits one waiting search.
#[must_use]
pub struct SearchSlot<'a> {
    limiter: &'a SearchLimiter,
    epoch: usize,
}

impl Drop for SearchSlot<'_> {
    fn drop(&mut self) {
        self.limiter.release(self.epoch);
    }
}
