use std::{fmt, sync::Arc, thread};

use tracing::{debug, info, instrument, warn};

use crate::{
    counter::{AtomicCounter, Counter, LockedCounter, RacyCounter},
    error::AccumulatorError,
    regime::Regime,
};

/// Result of one accumulator run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    pub regime: Regime,
    pub threads: usize,
    pub iterations_per_thread: usize,
    pub final_value: usize,
}

impl RunOutcome {
    /// The value a run reaches when no increment is lost.
    pub fn expected(&self) -> usize {
        self.threads.saturating_mul(self.iterations_per_thread)
    }

    pub fn lost_updates(&self) -> usize {
        self.expected().saturating_sub(self.final_value)
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Final counter value: {}", self.final_value)
    }
}

/// Starts `threads` workers that each increment a fresh counter
/// `iterations_per_thread` times under `regime`, waits for all of them and
/// reads the counter once.
///
/// Only [`Regime::Mutex`] and [`Regime::Atomic`] guarantee
/// `final_value == threads * iterations_per_thread`.
#[instrument]
pub fn run(
    threads: usize,
    iterations_per_thread: usize,
    regime: Regime,
) -> Result<RunOutcome, AccumulatorError> {
    if threads == 0 {
        return Err(AccumulatorError::NoWorkers);
    }

    let final_value = match regime {
        Regime::Unsynchronized => run_with(RacyCounter::default(), threads, iterations_per_thread),
        Regime::Mutex => run_with(LockedCounter::default(), threads, iterations_per_thread),
        Regime::Atomic => run_with(AtomicCounter::default(), threads, iterations_per_thread),
    }?;

    let outcome = RunOutcome {
        regime,
        threads,
        iterations_per_thread,
        final_value,
    };

    let lost_updates = outcome.lost_updates();
    info!(final_value, lost_updates, "all workers joined");

    if regime.is_exact() && lost_updates > 0 {
        warn!(regime = %regime, lost_updates, "exact regime lost updates");
    }

    Ok(outcome)
}

fn run_with<C>(
    counter: C,
    threads: usize,
    iterations_per_thread: usize,
) -> Result<usize, AccumulatorError>
where
    C: Counter + 'static,
{
    let counter = Arc::new(counter);

    let mut handles = Vec::with_capacity(threads);
    let mut first_error = None;

    for worker in 1..=threads {
        let counter = Arc::clone(&counter);
        let spawned = thread::Builder::new()
            .name(format!("worker-{worker}"))
            .spawn(move || increment_loop(worker, counter.as_ref(), iterations_per_thread));

        match spawned {
            Ok(handle) => handles.push((worker, handle)),
            Err(source) => {
                first_error = Some(AccumulatorError::Spawn { worker, source });
                break;
            }
        }
    }

    // every started worker is joined, even after a failure
    for (worker, handle) in handles {
        let res = handle
            .join()
            .map_err(|_| AccumulatorError::WorkerPanicked(worker))
            .and_then(|res| res);

        if let Err(err) = res {
            first_error.get_or_insert(err);
        }
    }

    match first_error {
        Some(err) => Err(err),
        None => counter.load(),
    }
}

fn increment_loop<C: Counter>(
    worker: usize,
    counter: &C,
    iterations: usize,
) -> Result<(), AccumulatorError> {
    debug!(worker, "worker running");
    for _ in 0..iterations {
        counter.increment()?;
    }
    debug!(worker, "worker finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::{AtomicBool, Ordering::SeqCst},
        time::Duration,
    };

    use strum::IntoEnumIterator;
    use test_case::test_case;

    use super::*;

    #[test_case(1, 1 => 1; "one worker one increment")]
    #[test_case(2, 0 => 0; "no increments")]
    #[test_case(4, 2_500 => 10_000; "four workers")]
    #[test_case(16, 1_000 => 16_000; "many workers")]
    fn mutex_is_exact(threads: usize, iterations: usize) -> usize {
        run(threads, iterations, Regime::Mutex).unwrap().final_value
    }

    #[test_case(1, 1 => 1; "one worker one increment")]
    #[test_case(2, 0 => 0; "no increments")]
    #[test_case(4, 2_500 => 10_000; "four workers")]
    #[test_case(16, 1_000 => 16_000; "many workers")]
    fn atomic_is_exact(threads: usize, iterations: usize) -> usize {
        run(threads, iterations, Regime::Atomic).unwrap().final_value
    }

    #[test]
    fn single_worker_never_races() {
        let outcome = run(1, 50_000, Regime::Unsynchronized).unwrap();
        assert_eq!(50_000, outcome.final_value);
        assert_eq!(0, outcome.lost_updates());
    }

    #[test]
    fn zero_workers_is_rejected() {
        for regime in Regime::iter() {
            assert!(matches!(run(0, 10, regime), Err(AccumulatorError::NoWorkers)));
        }
    }

    #[test]
    fn outcome_reports_lost_updates() {
        let outcome = RunOutcome {
            regime: Regime::Unsynchronized,
            threads: 2,
            iterations_per_thread: 10,
            final_value: 13,
        };
        assert_eq!(20, outcome.expected());
        assert_eq!(7, outcome.lost_updates());
    }

    #[test]
    fn outcome_display_matches_program_output() {
        let outcome = RunOutcome {
            regime: Regime::Atomic,
            threads: 2,
            iterations_per_thread: 1_000_000,
            final_value: 2_000_000,
        };
        assert_eq!("Final counter value: 2000000", outcome.to_string());
    }

    struct PanickingCounter;

    impl Counter for PanickingCounter {
        fn increment(&self) -> Result<(), AccumulatorError> {
            panic!("increment blew up");
        }

        fn load(&self) -> Result<usize, AccumulatorError> {
            Ok(0)
        }
    }

    #[test]
    fn worker_panic_is_surfaced() {
        assert!(matches!(
            run_with(PanickingCounter, 1, 1),
            Err(AccumulatorError::WorkerPanicked(1))
        ));
    }

    /// Panics on `worker-1`; every other worker sleeps before recording that it
    /// finished.
    struct SlowSiblingCounter {
        finished: Arc<AtomicBool>,
    }

    impl Counter for SlowSiblingCounter {
        fn increment(&self) -> Result<(), AccumulatorError> {
            if thread::current().name() == Some("worker-1") {
                panic!("worker 1 blew up");
            }
            thread::sleep(Duration::from_millis(300));
            self.finished.store(true, SeqCst);
            Ok(())
        }

        fn load(&self) -> Result<usize, AccumulatorError> {
            Ok(0)
        }
    }

    #[test]
    fn failed_worker_does_not_detach_the_rest() {
        let finished = Arc::new(AtomicBool::new(false));
        let counter = SlowSiblingCounter {
            finished: Arc::clone(&finished),
        };

        let res = run_with(counter, 2, 1);

        assert!(matches!(res, Err(AccumulatorError::WorkerPanicked(1))));
        assert!(finished.load(SeqCst), "worker 2 was still running");
    }
}
