use std::{
    io::{self, Write},
    thread,
};

use mockall::automock;
use tracing::{debug, instrument};

use crate::error::AccumulatorError;

#[automock]
pub trait Announcer: Send + Sync {
    fn announce(&self, id: usize) -> io::Result<()>;
}

/// Prints `Thread <id> is running` as a single write so lines from
/// different threads never interleave mid-line.
#[derive(Debug, Default)]
pub struct StdoutAnnouncer;

impl Announcer for StdoutAnnouncer {
    fn announce(&self, id: usize) -> io::Result<()> {
        let line = format!("Thread {id} is running\n");
        let mut stdout = io::stdout().lock();
        stdout.write_all(line.as_bytes())?;
        stdout.flush()
    }
}

/// Spawns `threads` workers numbered from 1, each announcing itself once,
/// and returns only once every worker has been joined.
#[instrument(skip(announcer))]
pub fn announce_all<A: Announcer>(threads: usize, announcer: &A) -> Result<(), AccumulatorError> {
    if threads == 0 {
        return Err(AccumulatorError::NoWorkers);
    }

    thread::scope(|s| -> Result<(), AccumulatorError> {
        let handles = (1..=threads)
            .map(|worker| {
                thread::Builder::new()
                    .name(format!("worker-{worker}"))
                    .spawn_scoped(s, move || -> Result<(), AccumulatorError> {
                        debug!(worker, "worker running");
                        announcer
                            .announce(worker)
                            .map_err(|source| AccumulatorError::Announce { worker, source })?;
                        debug!(worker, "worker finished");
                        Ok(())
                    })
                    .map(|handle| (worker, handle))
                    .map_err(|source| AccumulatorError::Spawn { worker, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        for (worker, handle) in handles {
            handle
                .join()
                .map_err(|_| AccumulatorError::WorkerPanicked(worker))??;
        }

        Ok(())
    })
}
