use reqwest::StatusCode;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A failure record produced while processing the URL list.
///
/// Every variant is non-fatal for the run as a whole: the affected URL is
/// skipped, the record is handed to the error collector and shows up in the
/// final report.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The URL list could not be read to the end.
    #[error("failed to read the URL list: {cause}")]
    SourceRead {
        #[source]
        cause: io::Error,
    },

    /// The request never produced a response (DNS, refused connection,
    /// timeout, TLS, malformed URL).
    #[error("failed to connect to {url}: {cause}")]
    Connection {
        url: String,
        #[source]
        cause: reqwest::Error,
    },

    /// The server answered with something other than `200 OK`.
    #[error("non-OK HTTP status from {url}: {status}")]
    HttpStatus { url: String, status: StatusCode },

    /// The output file could not be created or written.
    #[error("failed to write {url} to {}: {cause}", path.display())]
    Io {
        url: String,
        path: PathBuf,
        #[source]
        cause: io::Error,
    },
}

impl FetchError {
    /// Name of the failure kind, as shown in reports.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::SourceRead { .. } => "SourceReadError",
            FetchError::Connection { .. } => "ConnectionError",
            FetchError::HttpStatus { .. } => "HTTPStatusError",
            FetchError::Io { .. } => "IOError",
        }
    }

    /// The URL the failure refers to. Source read failures have none.
    pub fn url(&self) -> Option<&str> {
        match self {
            FetchError::SourceRead { .. } => None,
            FetchError::Connection { url, .. }
            | FetchError::HttpStatus { url, .. }
            | FetchError::Io { url, .. } => Some(url),
        }
    }
}
