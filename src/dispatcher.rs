use crate::collector::ErrorSink;
use crate::error::FetchError;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

/// Feeds the URL list into the work channel.
///
/// Lines are read once, in order, and trimmed. Blank lines are skipped.
/// Every other line is sent to the workers through `tx`, waiting whenever
/// the channel is full. If reading fails part way a single
/// [`FetchError::SourceRead`] is recorded and dispatching stops; URLs sent
/// before the failure are still processed.
///
/// `tx` is consumed and dropped on return, which closes the channel and
/// tells the workers there is no more work.
///
/// # Returns
///
/// The number of URLs handed to the workers.
pub async fn dispatch<R>(source: R, tx: mpsc::Sender<String>, errors: ErrorSink) -> usize
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = source.lines();
    let mut dispatched = 0;

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let url = line.trim();
                if url.is_empty() {
                    continue;
                }
                if tx.send(url.to_string()).await.is_err() {
                    // Every worker is gone; nobody is left to take more work.
                    break;
                }
                dispatched += 1;
            }
            Ok(None) => break,
            Err(cause) => {
                errors.record(FetchError::SourceRead { cause });
                break;
            }
        }
    }

    dispatched
}
