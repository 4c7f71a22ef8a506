//! Bounded worker pool for provisioning jobs.
//!
//! Every job is spawned as its own tokio task and waits for one of
//! `max_threads` semaphore permits before running. Spawned tasks are
//! detached: dropping the caller's future does not abort a job halfway
//! through, so a VM whose creation has started is either fully provisioned
//! or cleaned up by its job.

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;

use futures_util::stream::{FuturesUnordered, StreamExt};
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinError;
use tracing::{debug, error};

/// Failures of the pool itself, as opposed to failures of a job.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("worker job panicked: {0}")]
    Panicked(String),

    #[error("worker job was cancelled")]
    Cancelled,
}

impl From<JoinError> for WorkerError {
    fn from(e: JoinError) -> Self {
        if e.is_panic() {
            WorkerError::Panicked(e.to_string())
        } else {
            WorkerError::Cancelled
        }
    }
}

/// Runs jobs with at most `max_threads` in flight.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    max_threads: usize,
    permits: Arc<Semaphore>,
}

impl WorkerPool {
    pub fn new(max_threads: usize) -> Self {
        let max_threads = max_threads.max(1);
        Self {
            max_threads,
            permits: Arc::new(Semaphore::new(max_threads)),
        }
    }

    pub fn max_threads(&self) -> usize {
        self.max_threads
    }

    /// Run every job and wait until all of them have settled.
    ///
    /// A failing job never stops its siblings. Every failure is logged; the
    /// first one to complete is returned. On success, returns the number of
    /// jobs that ran.
    pub async fn process<I, F, E>(&self, jobs: I) -> Result<usize, E>
    where
        I: IntoIterator<Item = F>,
        F: Future<Output = Result<(), E>> + Send + 'static,
        E: From<WorkerError> + Display + Send + 'static,
    {
        let mut pending = FuturesUnordered::new();
        for job in jobs {
            let permits = self.permits.clone();
            pending.push(tokio::spawn(async move {
                // The semaphore is never closed, so this always yields a permit.
                let _permit = permits.acquire_owned().await.ok();
                job.await
            }));
        }

        let submitted = pending.len();
        debug!(jobs = submitted, max_threads = self.max_threads, "worker pool processing");

        let mut first_error = None;
        let mut failed = 0usize;
        while let Some(joined) = pending.next().await {
            let outcome = joined
                .map_err(|e| E::from(WorkerError::from(e)))
                .and_then(|result| result);
            if let Err(e) = outcome {
                failed += 1;
                error!(error = %e, "worker job failed");
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => {
                debug!(jobs = submitted, failed, "worker pool finished with failures");
                Err(e)
            }
            None => Ok(submitted),
        }
    }
}
