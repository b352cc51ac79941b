use crate::collector::ErrorSink;
use crate::network::{Fetch, Saved};
use crate::utils;
use console::style;
use futures::future::join_all;
use indicatif::ProgressBar;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tokio::task::{JoinError, JoinHandle};

/// What a single worker did before the channel closed.
#[derive(Debug, Default)]
struct WorkerOutcome {
    attempted: usize,
    saved: Vec<Saved>,
}

/// Merged result of every worker in the pool.
#[derive(Debug, Default)]
pub struct PoolOutcome {
    /// Number of URLs taken from the channel and handed to the fetcher.
    pub attempted: usize,
    /// Success tokens, in completion order.
    pub saved: Vec<Saved>,
}

/// A fixed number of workers sharing one work channel.
///
/// At most `workers` fetches are in flight at any time, however long the URL
/// list is.
pub struct WorkerPool {
    handles: Vec<JoinHandle<WorkerOutcome>>,
}

impl WorkerPool {
    /// Starts `workers` tasks pulling URLs from `rx`.
    ///
    /// Each worker fetches one URL at a time, forwards failures to `errors`
    /// and exits once the channel is closed and empty.
    ///
    /// # Panics
    ///
    /// Panics if `workers` is 0.
    pub fn spawn<F: Fetch>(
        workers: usize,
        rx: mpsc::Receiver<String>,
        fetcher: Arc<F>,
        errors: ErrorSink,
        progress: ProgressBar,
    ) -> WorkerPool {
        assert!(workers > 0, "a worker pool needs at least one worker");

        let rx = Arc::new(Mutex::new(rx));
        let handles = (0..workers)
            .map(|_| {
                let rx = Arc::clone(&rx);
                let fetcher = Arc::clone(&fetcher);
                let errors = errors.clone();
                let progress = progress.clone();
                tokio::spawn(run_worker(rx, fetcher, errors, progress))
            })
            .collect();

        WorkerPool { handles }
    }

    /// Waits for every worker to exit and merges what they did.
    pub async fn join(self) -> Result<PoolOutcome, JoinError> {
        let mut outcome = PoolOutcome::default();
        for result in join_all(self.handles).await {
            let worker = result?;
            outcome.attempted += worker.attempted;
            outcome.saved.extend(worker.saved);
        }
        Ok(outcome)
    }
}

async fn run_worker<F: Fetch>(
    rx: Arc<Mutex<mpsc::Receiver<String>>>,
    fetcher: Arc<F>,
    errors: ErrorSink,
    progress: ProgressBar,
) -> WorkerOutcome {
    let mut outcome = WorkerOutcome::default();

    loop {
        // The lock is released before fetching, so only the wait for the
        // next URL is serialized between workers.
        let next = rx.lock().await.recv().await;
        let Some(url) = next else {
            break;
        };

        outcome.attempted += 1;
        progress.set_message(format!("Fetching: {}", utils::truncate_message(&url, 60)));
        progress.println(format!("{} {}", style("[GET]").dim(), url));

        match fetcher.fetch(&url).await {
            Ok(saved) => {
                progress.println(format!(
                    "{} {} → {}",
                    style("[SAVED]").green(),
                    saved.url,
                    saved.path.display()
                ));
                outcome.saved.push(saved);
            }
            Err(error) => errors.record(error),
        }
        progress.inc(1);
    }

    outcome
}
