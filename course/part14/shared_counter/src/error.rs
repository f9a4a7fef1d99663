use std::io;

#[derive(Debug, thiserror::Error)]
pub enum AccumulatorError {
    #[error("at least one worker thread is required")]
    NoWorkers,
    #[error("failed to spawn worker {worker}: {source}")]
    Spawn {
        worker: usize,
        #[source]
        source: io::Error,
    },
    #[error("worker {0} panicked before finishing")]
    WorkerPanicked(usize),
    #[error("counter lock was poisoned by a panicking worker")]
    LockPoisoned,
    #[error("worker {worker} failed to announce itself: {source}")]
    Announce {
        worker: usize,
        #[source]
        source: io::Error,
    },
}
