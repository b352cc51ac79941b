use crate::error::FetchError;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// The write side of the error collector.
///
/// Cheap to clone; every worker and the dispatcher hold their own copy.
/// Recording never waits on other workers: the underlying channel is
/// unbounded and has a single reader.
#[derive(Debug, Clone)]
pub struct ErrorSink {
    tx: mpsc::UnboundedSender<FetchError>,
}

impl ErrorSink {
    pub fn record(&self, error: FetchError) {
        // The receiving task only stops once every sink is gone, so the
        // send can only fail if that task panicked.
        if let Err(mpsc::error::SendError(error)) = self.tx.send(error) {
            eprintln!("error collector is gone, dropping: {error}");
        }
    }
}

/// Owns every failure record of a run.
///
/// A single task drains the channel and appends to a plain list in arrival
/// order. Workers never read that list.
#[derive(Debug)]
pub struct ErrorCollector {
    handle: JoinHandle<Vec<FetchError>>,
}

impl ErrorCollector {
    /// Starts the collecting task and returns the sink feeding it.
    pub fn spawn() -> (ErrorSink, ErrorCollector) {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(async move {
            let mut errors = Vec::new();
            while let Some(error) = rx.recv().await {
                errors.push(error);
            }
            errors
        });
        (ErrorSink { tx }, ErrorCollector { handle })
    }

    /// Waits until every [`ErrorSink`] has been dropped and returns the
    /// collected records.
    pub async fn finish(self) -> Result<Vec<FetchError>, tokio::task::JoinError> {
        self.handle.await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[tokio::test]
    async fn collects_from_many_sinks() {
        let (sink, collector) = ErrorCollector::spawn();
        let handles: Vec<_> = (0..10)
            .map(|i| {
                let sink = sink.clone();
                tokio::spawn(async move {
                    for j in 0..10 {
                        sink.record(FetchError::HttpStatus {
                            url: format!("https://example.com/{i}/{j}"),
                            status: StatusCode::NOT_FOUND,
                        });
                    }
                })
            })
            .collect();
        drop(sink);
        for handle in handles {
            handle.await.unwrap();
        }

        let errors = collector.finish().await.unwrap();
        assert_eq!(errors.len(), 100);
    }

    #[tokio::test]
    async fn empty_when_nothing_recorded() {
        let (sink, collector) = ErrorCollector::spawn();
        drop(sink);
        assert!(collector.finish().await.unwrap().is_empty());
    }
}
