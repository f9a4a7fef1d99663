use std::sync::{
    atomic::{AtomicUsize, Ordering::Relaxed},
    Mutex,
};

use crate::error::AccumulatorError;

/// A counter every worker thread increments through a shared reference.
pub trait Counter: Send + Sync {
    fn increment(&self) -> Result<(), AccumulatorError>;
    fn load(&self) -> Result<usize, AccumulatorError>;
}

/// Intentionally unsynchronized.
///
/// An increment is a load followed by a separate store, so two workers can
/// both read `n` and both write `n + 1`, losing one update. Relaxed atomic
/// accesses keep each individual read and write well defined, but nothing
/// makes the pair indivisible. Do not "fix" this type: losing updates is what
/// it exists to show.
#[derive(Debug, Default)]
pub struct RacyCounter {
    value: AtomicUsize,
}

impl Counter for RacyCounter {
    fn increment(&self) -> Result<(), AccumulatorError> {
        let current = self.value.load(Relaxed);
        self.value.store(current + 1, Relaxed);
        Ok(())
    }

    fn load(&self) -> Result<usize, AccumulatorError> {
        Ok(self.value.load(Relaxed))
    }
}

/// Serialises every increment behind a mutex held only for that increment.
#[derive(Debug, Default)]
pub struct LockedCounter {
    value: Mutex<usize>,
}

impl Counter for LockedCounter {
    fn increment(&self) -> Result<(), AccumulatorError> {
        let mut value = self
            .value
            .lock()
            .map_err(|_| AccumulatorError::LockPoisoned)?;
        *value += 1;
        Ok(())
    }

    fn load(&self) -> Result<usize, AccumulatorError> {
        self.value
            .lock()
            .map(|value| *value)
            .map_err(|_| AccumulatorError::LockPoisoned)
    }
}

/// Indivisible fetch-and-add with relaxed ordering.
#[derive(Debug, Default)]
pub struct AtomicCounter {
    value: AtomicUsize,
}

impl Counter for AtomicCounter {
    fn increment(&self) -> Result<(), AccumulatorError> {
        self.value.fetch_add(1, Relaxed);
        Ok(())
    }

    fn load(&self) -> Result<usize, AccumulatorError> {
        Ok(self.value.load(Relaxed))
    }
}
