//! Per-call worker pool with a hard deadline
//!
//! Jobs are queued up front, a fixed number of worker threads drain the
//! queue, and results flow back over a channel that the caller reads with
//! `recv_timeout` until the deadline. Workers still busy at the deadline are
//! detached; whatever they produce afterwards is dropped.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

/// A unit of work; `None` means "found nothing"
pub type Job<T> = Box<dyn FnOnce() -> Option<T> + Send + 'static>;

type Queue<T> = Arc<Mutex<Receiver<(usize, Job<T>)>>>;

/// Bounded pool of worker threads, spun up for a single batch
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    workers: usize,
}

impl WorkerPool {
    /// `workers == 0` sizes the pool to the host's available parallelism
    pub fn new(workers: usize) -> Self {
        let workers = if workers == 0 {
            thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        } else {
            workers
        };
        Self { workers }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run every job and return the results that arrived before `timeout`
    ///
    /// Each result is tagged with its job's submission index and the list is
    /// sorted by that index. A job that panics counts as "found nothing".
    pub fn run<T: Send + 'static>(&self, jobs: Vec<Job<T>>, timeout: Duration) -> Vec<(usize, T)> {
        let total = jobs.len();
        if total == 0 {
            return Vec::new();
        }

        let (job_tx, job_rx) = mpsc::channel::<(usize, Job<T>)>();
        for (index, job) in jobs.into_iter().enumerate() {
            // The receiver is alive until the workers start, so this cannot fail
            let _ = job_tx.send((index, job));
        }
        drop(job_tx);

        let queue: Queue<T> = Arc::new(Mutex::new(job_rx));
        let abandoned = Arc::new(AtomicBool::new(false));
        let (result_tx, result_rx) = mpsc::channel::<(usize, Option<T>)>();

        let size = self.workers.clamp(1, total);
        for n in 0..size {
            let queue = Arc::clone(&queue);
            let abandoned = Arc::clone(&abandoned);
            let result_tx = result_tx.clone();
            let spawned = thread::Builder::new()
                .name(format!("hark-worker-{}", n))
                .spawn(move || worker_loop(queue, abandoned, result_tx));
            if let Err(e) = spawned {
                warn!("Failed to spawn resolver worker {}: {}", n, e);
            }
        }
        drop(result_tx);

        let deadline = Instant::now() + timeout;
        let mut received = 0;
        let mut results = Vec::new();

        while received < total {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match result_rx.recv_timeout(remaining) {
                Ok((index, outcome)) => {
                    received += 1;
                    if let Some(value) = outcome {
                        results.push((index, value));
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    warn!(
                        "Resolver pool timed out after {:?}: {} of {} tasks finished",
                        timeout, received, total
                    );
                    break;
                }
                Err(RecvTimeoutError::Disconnected) => {
                    debug!("Resolver workers exited after {} of {} tasks", received, total);
                    break;
                }
            }
        }

        abandoned.store(true, Ordering::Relaxed);
        results.sort_by_key(|(index, _)| *index);
        results
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new(0)
    }
}

fn worker_loop<T>(queue: Queue<T>, abandoned: Arc<AtomicBool>, result_tx: Sender<(usize, Option<T>)>) {
    loop {
        if abandoned.load(Ordering::Relaxed) {
            break;
        }

        // The queue is filled before any worker starts, so empty means done
        let next = {
            let Ok(rx) = queue.lock() else {
                break;
            };
            rx.try_recv().ok()
        };
        let Some((index, job)) = next else {
            break;
        };

        let outcome = match panic::catch_unwind(AssertUnwindSafe(job)) {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!("Resolver task {} panicked, treating it as no match", index);
                None
            }
        };

        if result_tx.send((index, outcome)).is_err() {
            // Caller stopped listening
            break;
        }
    }
}
