//! Concurrent deletion of candidates
//!
//! Candidates are placed on a closed work queue shared by a fixed pool of
//! workers. Each worker reports exactly one [`OutcomeRecord`] per candidate it
//! takes; a failed delete only affects its own record.

use crate::cancel::CancelSignal;
use crate::config::ExecutionOptions;
use futures::Stream;
use reclaim_domain::{Candidate, ClusterApi, OutcomeRecord, ResourceKind};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::{mpsc, Mutex};

type WorkQueue = Arc<Mutex<mpsc::UnboundedReceiver<Candidate>>>;

/// Deletes (or pretends to delete) candidates with bounded concurrency
pub struct DeletionExecutor<C> {
    cluster: Arc<C>,
    options: ExecutionOptions,
}

impl<C: ClusterApi + 'static> DeletionExecutor<C> {
    /// Create an executor over a shared cluster handle
    pub fn new(cluster: Arc<C>, options: ExecutionOptions) -> Self {
        Self { cluster, options }
    }

    /// Start the worker pool and return the stream of outcomes
    ///
    /// The stream yields one record per candidate in completion order and
    /// ends when every worker has finished. Must be called inside a Tokio
    /// runtime.
    pub fn spawn(&self, candidates: Vec<Candidate>, cancel: CancelSignal) -> OutcomeStream {
        let workers = self.options.workers();
        let expected = candidates.len();

        let (work_tx, work_rx) = mpsc::unbounded_channel();
        for candidate in candidates {
            // Cannot fail, work_rx is still held here
            let _ = work_tx.send(candidate);
        }
        drop(work_tx);
        let queue: WorkQueue = Arc::new(Mutex::new(work_rx));

        let (result_tx, result_rx) = mpsc::channel(workers);
        let mut handles = Vec::with_capacity(workers);
        for id in 0..workers {
            handles.push(tokio::spawn(run_worker(
                id,
                Arc::clone(&self.cluster),
                Arc::clone(&queue),
                result_tx.clone(),
                cancel.clone(),
                self.options.dry_run,
            )));
        }
        drop(result_tx);

        tokio::spawn(async move {
            for handle in handles {
                if let Err(e) = handle.await {
                    tracing::error!(error = %e, "Delete worker terminated abnormally");
                }
            }
        });

        tracing::debug!(workers, candidates = expected, dry_run = self.options.dry_run, "Executor started");
        OutcomeStream {
            rx: result_rx,
            expected,
        }
    }
}

async fn run_worker<C: ClusterApi>(
    id: usize,
    cluster: Arc<C>,
    queue: WorkQueue,
    results: mpsc::Sender<OutcomeRecord>,
    cancel: CancelSignal,
    dry_run: bool,
) {
    loop {
        let next = { queue.lock().await.recv().await };
        let Some(candidate) = next else {
            break;
        };

        // No delete starts without a reserved slot for its record
        let permit = match results.reserve().await {
            Ok(permit) if !results.is_closed() => permit,
            _ => {
                tracing::debug!(worker = id, "Outcome receiver dropped, stopping");
                break;
            }
        };

        let record = if cancel.is_cancelled() {
            OutcomeRecord::cancelled(candidate, dry_run)
        } else if dry_run {
            tracing::info!(
                kind = %candidate.kind,
                namespace = %candidate.namespace,
                name = %candidate.name,
                state = %candidate.state,
                "would delete"
            );
            OutcomeRecord::dry_run(candidate)
        } else {
            delete_one(cluster.as_ref(), candidate).await
        };

        permit.send(record);
    }
}

async fn delete_one<C: ClusterApi>(cluster: &C, candidate: Candidate) -> OutcomeRecord {
    let result = match candidate.kind {
        ResourceKind::Pod => cluster.delete_pod(&candidate.namespace, &candidate.name).await,
        ResourceKind::Job => cluster.delete_job(&candidate.namespace, &candidate.name).await,
    };

    match result {
        Ok(()) => {
            tracing::info!(
                kind = %candidate.kind,
                namespace = %candidate.namespace,
                name = %candidate.name,
                "deleted"
            );
            OutcomeRecord::deleted(candidate)
        }
        Err(e) => {
            let message = e.to_string();
            tracing::error!(
                kind = %candidate.kind,
                namespace = %candidate.namespace,
                name = %candidate.name,
                error = %message,
                "delete failed"
            );
            OutcomeRecord::failed(candidate, message)
        }
    }
}

/// Outcomes of an executor run, in completion order
#[derive(Debug)]
pub struct OutcomeStream {
    rx: mpsc::Receiver<OutcomeRecord>,
    expected: usize,
}

impl OutcomeStream {
    /// Next outcome, or `None` once all workers are done
    pub async fn recv(&mut self) -> Option<OutcomeRecord> {
        self.rx.recv().await
    }

    /// Number of candidates handed to the executor
    pub fn expected(&self) -> usize {
        self.expected
    }

    /// Drain every remaining outcome
    pub async fn collect_all(mut self) -> Vec<OutcomeRecord> {
        let mut records = Vec::with_capacity(self.expected);
        while let Some(record) = self.rx.recv().await {
            records.push(record);
        }
        records
    }
}

impl Stream for OutcomeStream {
    type Item = OutcomeRecord;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}
