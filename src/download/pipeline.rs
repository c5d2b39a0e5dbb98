//! Bounded worker pool turning a provider response into local files.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use reqwest::Client;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::validate_workers;
use crate::download::fetch::download_item;
use crate::download::outcome::DownloadOutcome;
use crate::error::{Error, Result};
use crate::provider::{ProviderItem, ProviderResponse};

/// Default number of concurrent download workers.
pub const DEFAULT_WORKERS: usize = 10;

/// Downloads provider items into an output directory with a fixed number of
/// workers.
#[derive(Debug, Clone)]
pub struct Downloader {
    client: Client,
    output_dir: PathBuf,
    workers: usize,
    cancel: CancellationToken,
    failure_limit: Option<usize>,
}

impl Downloader {
    pub fn new(client: Client, output_dir: impl Into<PathBuf>, workers: usize) -> Result<Self> {
        validate_workers(workers)?;
        Ok(Self {
            client,
            output_dir: output_dir.into(),
            workers,
            cancel: CancellationToken::new(),
            failure_limit: None,
        })
    }

    /// Tie the batch to an outer cancellation signal.
    pub fn with_cancellation(mut self, parent: &CancellationToken) -> Self {
        self.cancel = parent.child_token();
        self
    }

    /// Cancel the rest of a batch once `limit` of its items have failed.
    ///
    /// The limit is counted per batch and only cancels that batch.
    pub fn with_failure_limit(mut self, limit: usize) -> Self {
        self.failure_limit = Some(limit);
        self
    }

    /// Token cancelling every batch this downloader starts.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Queue every item and spawn the workers.
    ///
    /// The queue holds all items up front and is closed as soon as they are
    /// enqueued. An empty response spawns nothing.
    pub fn start(&self, items: ProviderResponse) -> DownloadBatch {
        let expected = items.len();
        let (result_tx, result_rx) = mpsc::channel(expected.max(1));
        let cancel = self.cancel.child_token();

        if expected == 0 {
            return DownloadBatch::new(expected, result_rx, Vec::new(), cancel);
        }

        tracing::info!(
            "Downloading {} items to {} with {} workers",
            expected,
            self.output_dir.display(),
            self.workers
        );

        let (job_tx, job_rx) = mpsc::channel::<ProviderItem>(expected);
        let jobs = Arc::new(Mutex::new(job_rx));
        let failures = Arc::new(AtomicUsize::new(0));

        let handles = (1..=self.workers)
            .map(|id| {
                let ctx = WorkerContext {
                    id,
                    client: self.client.clone(),
                    output_dir: self.output_dir.clone(),
                    jobs: Arc::clone(&jobs),
                    results: result_tx.clone(),
                    cancel: cancel.clone(),
                    failures: Arc::clone(&failures),
                    failure_limit: self.failure_limit,
                };
                tokio::spawn(run_worker(ctx))
            })
            .collect();

        for item in items {
            // Capacity equals the item count, so this only fails if every
            // worker is already gone.
            if let Err(err) = job_tx.try_send(item) {
                let item = err.into_inner();
                let _ = result_tx.try_send(DownloadOutcome::Failure {
                    item,
                    cause: Error::Fetch("download queue closed".to_string()),
                });
            }
        }
        drop(job_tx);

        DownloadBatch::new(expected, result_rx, handles, cancel)
    }

    /// Download every item and collect the outcomes.
    pub async fn run(&self, items: ProviderResponse) -> Vec<DownloadOutcome> {
        self.start(items).collect().await
    }
}

struct WorkerContext {
    id: usize,
    client: Client,
    output_dir: PathBuf,
    jobs: Arc<Mutex<mpsc::Receiver<ProviderItem>>>,
    results: mpsc::Sender<DownloadOutcome>,
    cancel: CancellationToken,
    failures: Arc<AtomicUsize>,
    failure_limit: Option<usize>,
}

async fn run_worker(ctx: WorkerContext) {
    loop {
        let next = ctx.jobs.lock().await.recv().await;
        let Some(item) = next else {
            break;
        };

        let outcome = if ctx.cancel.is_cancelled() {
            DownloadOutcome::Failure {
                item,
                cause: Error::Cancelled,
            }
        } else {
            download_item(&ctx.client, &item, &ctx.output_dir, &ctx.cancel).await
        };

        match &outcome {
            DownloadOutcome::Success { path, .. } => {
                tracing::debug!(worker = ctx.id, "Downloaded: {}", path.display());
            }
            DownloadOutcome::Failure { cause: Error::Cancelled, .. } => {}
            DownloadOutcome::Failure { item, cause } => {
                tracing::warn!(worker = ctx.id, "Failed to download {}: {}", item.link, cause);
                ctx.record_failure();
            }
        }

        if ctx.results.send(outcome).await.is_err() {
            // Nobody is listening for outcomes any more
            break;
        }
    }
}

impl WorkerContext {
    fn record_failure(&self) {
        let failed = self.failures.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(limit) = self.failure_limit {
            if failed >= limit && !self.cancel.is_cancelled() {
                tracing::warn!("{} downloads failed, cancelling the remaining items", failed);
                self.cancel.cancel();
            }
        }
    }
}

/// Handle on a running batch. Yields exactly one outcome per submitted item.
pub struct DownloadBatch {
    expected: usize,
    received: usize,
    results: mpsc::Receiver<DownloadOutcome>,
    workers: Vec<JoinHandle<()>>,
    cancel: CancellationToken,
}

impl DownloadBatch {
    fn new(
        expected: usize,
        results: mpsc::Receiver<DownloadOutcome>,
        workers: Vec<JoinHandle<()>>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            expected,
            received: 0,
            results,
            workers,
            cancel,
        }
    }

    /// Token scoped to this batch alone.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Number of outcomes this batch will produce.
    pub fn expected(&self) -> usize {
        self.expected
    }

    /// Next outcome, or `None` once all expected outcomes have been received.
    pub async fn next(&mut self) -> Option<DownloadOutcome> {
        if self.received >= self.expected {
            return None;
        }

        match self.results.recv().await {
            Some(outcome) => {
                self.received += 1;
                Some(outcome)
            }
            None => {
                tracing::error!(
                    "Download workers exited with {} outcomes outstanding",
                    self.expected - self.received
                );
                None
            }
        }
    }

    /// Drain every outcome and wait for the workers to exit.
    pub async fn collect(mut self) -> Vec<DownloadOutcome> {
        let mut outcomes = Vec::with_capacity(self.expected);
        while let Some(outcome) = self.next().await {
            outcomes.push(outcome);
        }

        for handle in self.workers.drain(..) {
            if let Err(e) = handle.await {
                tracing::error!("Download worker panicked: {}", e);
            }
        }

        outcomes
    }
}
