//! Bounded worker pool with a single coordinating consumer.
//!
//! Workers claim jobs from a shared queue and send results back over a
//! channel. Only the coordinator (the caller's `apply` callback) touches
//! accumulated state, so results need no locking beyond the queue itself.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::{mpsc, watch, Mutex};
use tracing::warn;

/// Requests cancellation of a running phase.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<bool>>,
}

/// Observes cancellation requests.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    rx: watch::Receiver<bool>,
}

/// Create a linked cancel handle and signal.
pub fn cancel_pair() -> (CancelHandle, CancelSignal) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx: Arc::new(tx) }, CancelSignal { rx })
}

impl CancelHandle {
    /// Stop dispatching new work. Idempotent.
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }

    pub fn signal(&self) -> CancelSignal {
        CancelSignal {
            rx: self.tx.subscribe(),
        }
    }
}

impl CancelSignal {
    /// A signal that is never cancelled.
    pub fn never() -> Self {
        let (_, rx) = watch::channel(false);
        Self { rx }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once cancellation is requested; never resolves if the
    /// handle is dropped without cancelling.
    pub async fn cancelled(&mut self) {
        if self.rx.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

impl Default for CancelSignal {
    fn default() -> Self {
        Self::never()
    }
}

/// Message from a worker to the coordinator.
#[derive(Debug)]
pub enum PoolUpdate<O> {
    /// A worker claimed job `index`.
    Started(usize),
    /// Job `index` finished with `output`.
    Finished(usize, O),
}

/// Totals for one pool run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSummary {
    pub total: usize,
    pub completed: usize,
    pub cancelled: bool,
}

/// Runs async jobs on a fixed number of tokio tasks.
#[derive(Debug, Clone)]
pub struct WorkPool {
    workers: usize,
    cancel: CancelSignal,
}

impl WorkPool {
    pub fn new(workers: usize, cancel: CancelSignal) -> Self {
        Self {
            workers: workers.max(1),
            cancel,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Run `work` over every job, feeding updates to `apply` in completion
    /// order. Returns once all workers have stopped.
    ///
    /// On cancellation workers stop claiming jobs and abandon in-flight
    /// ones; results already delivered to `apply` stand.
    pub async fn run<J, O, F, Fut, A>(&self, jobs: &[J], work: F, mut apply: A) -> PoolSummary
    where
        J: Clone + Send + 'static,
        O: Send + 'static,
        F: Fn(J) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = O> + Send + 'static,
        A: FnMut(PoolUpdate<O>),
    {
        let total = jobs.len();
        if total == 0 || self.cancel.is_cancelled() {
            return PoolSummary {
                total,
                completed: 0,
                cancelled: self.cancel.is_cancelled(),
            };
        }

        let queue: VecDeque<(usize, J)> = jobs.iter().cloned().enumerate().collect();
        let queue = Arc::new(Mutex::new(queue));
        let work = Arc::new(work);
        let (tx, mut rx) = mpsc::channel(self.workers * 4);

        let mut handles = Vec::with_capacity(self.workers);
        for _ in 0..self.workers.min(total) {
            let queue = queue.clone();
            let work = work.clone();
            let tx = tx.clone();
            let mut cancel = self.cancel.clone();

            handles.push(tokio::spawn(async move {
                loop {
                    if cancel.is_cancelled() {
                        break;
                    }

                    let next = queue.lock().await.pop_front();
                    let Some((index, job)) = next else {
                        break;
                    };

                    if tx.send(PoolUpdate::Started(index)).await.is_err() {
                        break;
                    }

                    let output = tokio::select! {
                        biased;
                        _ = cancel.cancelled() => break,
                        output = (*work)(job) => output,
                    };

                    if tx.send(PoolUpdate::Finished(index, output)).await.is_err() {
                        break;
                    }
                }
            }));
        }
        drop(tx);

        let mut completed = 0;
        while let Some(update) = rx.recv().await {
            if matches!(update, PoolUpdate::Finished(..)) {
                completed += 1;
            }
            apply(update);
        }

        for handle in handles {
            if let Err(e) = handle.await {
                warn!("Worker task failed: {}", e);
            }
        }

        PoolSummary {
            total,
            completed,
            cancelled: completed < total && self.cancel.is_cancelled(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn runs_every_job_once() {
        let pool = WorkPool::new(3, CancelSignal::never());
        let jobs: Vec<u64> = (0..20).collect();
        let mut results = vec![None; jobs.len()];

        let summary = pool
            .run(
                &jobs,
                |n| async move {
                    tokio::time::sleep(Duration::from_millis(20 - n)).await;
                    n * 2
                },
                |update| {
                    if let PoolUpdate::Finished(index, value) = update {
                        assert!(results[index].is_none());
                        results[index] = Some(value);
                    }
                },
            )
            .await;

        assert_eq!(summary.completed, 20);
        assert!(!summary.cancelled);
        let values: Vec<u64> = results.into_iter().map(|v| v.unwrap()).collect();
        assert_eq!(values, (0..20).map(|n| n * 2).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn empty_job_list_is_a_no_op() {
        let pool = WorkPool::new(4, CancelSignal::never());
        let jobs: Vec<u32> = Vec::new();
        let summary = pool.run(&jobs, |n| async move { n }, |_| {}).await;
        assert_eq!(summary.total, 0);
        assert_eq!(summary.completed, 0);
    }

    #[tokio::test]
    async fn cancelled_before_start_runs_nothing() {
        let (handle, signal) = cancel_pair();
        handle.cancel();
        let pool = WorkPool::new(2, signal);

        let jobs = vec![1, 2, 3];
        let summary = pool.run(&jobs, |n| async move { n }, |_| {}).await;
        assert_eq!(summary.completed, 0);
        assert!(summary.cancelled);
    }

    #[tokio::test]
    async fn cancel_mid_run_keeps_partial_results() {
        let (handle, signal) = cancel_pair();
        let pool = WorkPool::new(1, signal);
        let jobs: Vec<u64> = (0..10).collect();
        let mut finished = Vec::new();

        let summary = pool
            .run(
                &jobs,
                |n| async move {
                    if n >= 2 {
                        tokio::time::sleep(Duration::from_secs(30)).await;
                    }
                    n
                },
                |update| {
                    if let PoolUpdate::Finished(_, n) = update {
                        finished.push(n);
                        if n == 1 {
                            handle.cancel();
                        }
                    }
                },
            )
            .await;

        assert_eq!(finished, vec![0, 1]);
        assert_eq!(summary.completed, 2);
        assert!(summary.cancelled);
    }
}
