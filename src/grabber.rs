use crate::collector::ErrorCollector;
use crate::dispatcher::dispatch;
use crate::error::FetchError;
use crate::network::{Fetch, Saved};
use crate::pool::WorkerPool;
use indicatif::ProgressBar;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncBufRead;
use tokio::sync::mpsc;
use tokio::task::JoinError;
use tokio::time::Instant;

/// Everything a finished run produced.
#[derive(Debug)]
pub struct Grabbed {
    /// Non-empty lines read from the source and sent to the workers.
    pub dispatched: usize,
    /// URLs the workers handed to the fetcher.
    pub attempted: usize,
    pub saved: Vec<Saved>,
    /// Failure records in the order they reached the collector.
    pub failures: Vec<FetchError>,
    pub total_time: Duration,
}

/// Runs the whole pipeline: source → dispatcher → worker pool → fetcher,
/// with failures gathered by the error collector.
///
/// The dispatcher, the `workers` pool tasks and the collector run
/// concurrently. The function returns only after the dispatcher has closed
/// the channel, every worker has exited and the collector has drained, so
/// `dispatched == attempted` for every completed run.
///
/// # Errors
///
/// Per-URL failures never abort the run; they end up in
/// [`Grabbed::failures`]. An `Err` is returned only if one of the pipeline
/// tasks panicked.
///
/// # Panics
///
/// Panics if `workers` is 0.
pub async fn grab<R, F>(
    source: R,
    fetcher: Arc<F>,
    workers: usize,
    progress: ProgressBar,
) -> Result<Grabbed, JoinError>
where
    R: AsyncBufRead + Unpin + Send + 'static,
    F: Fetch,
{
    assert!(workers > 0, "a worker pool needs at least one worker");

    let start_time = Instant::now();
    let (errors, collector) = ErrorCollector::spawn();
    let (tx, rx) = mpsc::channel(workers * 2);

    let pool = WorkerPool::spawn(workers, rx, fetcher, errors.clone(), progress.clone());
    let dispatcher = tokio::spawn(dispatch(source, tx, errors));

    let dispatched = dispatcher.await?;
    let pool_outcome = pool.join().await?;
    let failures = collector.finish().await?;
    progress.finish_and_clear();

    Ok(Grabbed {
        dispatched,
        attempted: pool_outcome.attempted,
        saved: pool_outcome.saved,
        failures,
        total_time: start_time.elapsed(),
    })
}
