//! Batch orchestration: a bounded worker pool shredding many files.

use crate::config::ShredConfig;
use crate::error::Result;
use crate::events::{self, LogSink, ShredEvent};
use crate::pattern::{PatternProvider, PatternSequence};
use crate::shredder::{FileShredder, ShredOutcome};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Shared flag used to stop a running batch.
///
/// Only the control loop observes it, between completions. Work already
/// queued or running is never interrupted.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Create an unset token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Aggregate result of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    /// Files reported as successfully shredded (including dry runs).
    pub succeeded: usize,
    /// Files submitted.
    pub total: usize,
    /// Wall-clock time of the whole batch.
    pub elapsed: Duration,
}

impl BatchSummary {
    /// Files that failed, were never processed, or were skipped by cancellation.
    pub fn failed(&self) -> usize {
        self.total - self.succeeded
    }

    /// Elapsed time in seconds.
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

/// Everything derived from one configuration snapshot.
#[derive(Debug, Clone)]
struct EngineState {
    config: ShredConfig,
    provider: PatternProvider,
    sequence: Arc<PatternSequence>,
}

impl EngineState {
    fn build(config: ShredConfig) -> Result<Self> {
        config.validate()?;
        let provider = PatternProvider::from_config(&config)?;
        let sequence = Arc::new(provider.pattern_sequence());
        Ok(Self {
            config,
            provider,
            sequence,
        })
    }
}

/// Shreds batches of files according to a configuration snapshot.
#[derive(Debug)]
pub struct ShredEngine {
    state: EngineState,
    cancel: CancellationToken,
}

impl ShredEngine {
    /// Build an engine. Fails on invalid settings or a malformed custom pattern.
    pub fn new(config: ShredConfig) -> Result<Self> {
        Ok(Self {
            state: EngineState::build(config)?,
            cancel: CancellationToken::new(),
        })
    }

    /// Replace the configuration.
    ///
    /// The new state is built first; on error the engine keeps its previous
    /// configuration untouched.
    pub fn apply(&mut self, config: ShredConfig) -> Result<()> {
        self.state = EngineState::build(config)?;
        Ok(())
    }

    /// Current configuration.
    pub fn config(&self) -> &ShredConfig {
        &self.state.config
    }

    /// Display name of the active algorithm.
    pub fn algorithm_name(&self) -> String {
        self.state.provider.display_name()
    }

    /// The active pass sequence.
    pub fn sequence(&self) -> &PatternSequence {
        &self.state.sequence
    }

    /// A handle that can cancel batches run by this engine from another thread.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Request cancellation of the running batch.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Shred every path on a pool of `config.workers` threads.
    ///
    /// All paths are queued up front. The calling thread processes
    /// completions in the order they finish, calling `progress(done, total)`
    /// after each one. Log events go through one drain thread to `sink`;
    /// every event has been delivered by the time this returns.
    ///
    /// The cancellation flag is cleared when the batch starts. Once set, the
    /// loop stops processing completions, but queued and running files are
    /// still shredded before this returns. Per-file failures and panics in
    /// `progress` or `sink` never abort the batch.
    pub fn shred_files<P, S, F>(&self, paths: &[P], sink: &mut S, mut progress: F) -> BatchSummary
    where
        P: AsRef<Path>,
        S: LogSink + ?Sized,
        F: FnMut(usize, usize),
    {
        let start = Instant::now();
        let total = paths.len();
        let workers = self.state.config.workers.clamp(1, total.max(1));
        let secure_rename = self.state.config.secure_rename;
        self.cancel.reset();

        let (log_tx, log_rx) = events::channel();
        let shredder = FileShredder::new(
            Arc::clone(&self.state.sequence),
            self.state.config.dry_run,
            log_tx.clone(),
        );

        let (job_tx, job_rx) = crossbeam_channel::unbounded::<PathBuf>();
        let (done_tx, done_rx) =
            crossbeam_channel::unbounded::<(PathBuf, thread::Result<ShredOutcome>)>();

        log_tx.send(ShredEvent::BatchStarted {
            files: total,
            algorithm: self.algorithm_name(),
        });
        for path in paths {
            let _ = job_tx.send(path.as_ref().to_path_buf());
        }
        drop(job_tx);
        debug!(files = total, workers, "dispatched shred batch");

        thread::scope(|scope| {
            scope.spawn(move || events::drain(log_rx, sink));

            let handles: Vec<_> = (0..workers)
                .map(|id| {
                    let job_rx = job_rx.clone();
                    let done_tx = done_tx.clone();
                    let shredder = shredder.clone();
                    scope.spawn(move || {
                        debug!(worker = id, "shred worker started");
                        for path in job_rx {
                            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                                shredder.overwrite_file(&path, secure_rename)
                            }));
                            // Receiver gone means the batch was cancelled; keep draining the queue.
                            let _ = done_tx.send((path, outcome));
                        }
                    })
                })
                .collect();
            drop(job_rx);
            drop(done_tx);
            drop(shredder);

            let mut succeeded = 0;
            let mut done = 0;
            for (path, outcome) in done_rx.iter() {
                if self.cancel.is_cancelled() {
                    log_tx.send(ShredEvent::Cancelled);
                    break;
                }
                match outcome {
                    Ok(outcome) if outcome.is_success() => succeeded += 1,
                    Ok(_) => {}
                    Err(payload) => log_tx.send(ShredEvent::Failed {
                        path,
                        detail: format!("worker panicked: {}", panic_message(payload.as_ref())),
                    }),
                }
                done += 1;
                if panic::catch_unwind(AssertUnwindSafe(|| progress(done, total))).is_err() {
                    warn!(done, total, "progress callback panicked");
                }
            }
            drop(done_rx);

            for handle in handles {
                let _ = handle.join();
            }

            let summary = BatchSummary {
                succeeded,
                total,
                elapsed: start.elapsed(),
            };
            log_tx.send(ShredEvent::BatchFinished {
                succeeded: summary.succeeded,
                total: summary.total,
                elapsed: summary.elapsed,
            });
            // Last sender: lets the drain thread finish before the scope joins it.
            drop(log_tx);
            summary
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
