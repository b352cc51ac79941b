use crate::error::FetchError;
use crate::options::Cli;
use crate::storage::output_path;
use base64::Engine;
use reqwest::StatusCode;
use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

/// Builds and configures the HTTP client based on the provided CLI options.
///
/// The client is created once and shared by every worker, so connections to
/// the same host are reused. The request timeout doubles as the per-fetch
/// deadline: a server that stops answering cannot hold a worker forever.
///
/// # Arguments
///
/// * `options` - A reference to the CLI options containing client configuration settings.
///
/// # Returns
///
/// A `Result` containing the built `Client` if successful, or an error otherwise.
pub fn build_client(options: &Cli) -> Result<reqwest::Client, Box<dyn Error>> {
    let mut client_builder = reqwest::Client::builder()
        .user_agent(options.user_agent.as_str())
        .timeout(Duration::from_secs(options.request_timeout));

    if let Some(auth) = &options.basic_auth {
        if !auth.is_empty() {
            let mut headers = reqwest::header::HeaderMap::new();
            let encoded_credentials =
                base64::engine::general_purpose::STANDARD.encode(auth.as_bytes());
            let auth_value = format!("Basic {}", encoded_credentials).parse()?;
            headers.insert(reqwest::header::AUTHORIZATION, auth_value);
            client_builder = client_builder.default_headers(headers);
        }
    }
    Ok(client_builder.build()?)
}

/// A document that was downloaded and written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Saved {
    pub url: String,
    pub path: PathBuf,
    pub bytes: u64,
}

/// Something that can turn one URL into a stored document.
///
/// Workers only talk to this trait, which keeps the pool independent of
/// HTTP and lets tests plug in fetchers that fail or succeed instantly.
pub trait Fetch: Send + Sync + 'static {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Saved, FetchError>> + Send;
}

/// Fetches URLs over HTTP and stores each body under `dest_dir`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    dest_dir: PathBuf,
}

impl HttpFetcher {
    pub fn new(client: reqwest::Client, dest_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            dest_dir: dest_dir.into(),
        }
    }
}

impl Fetch for HttpFetcher {
    /// Issues a GET request for `url` and streams the body into
    /// `dest_dir/<sanitized url>.html`.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Connection`] if no response arrives, or the body
    ///   cannot be read to the end.
    /// - [`FetchError::HttpStatus`] if the status is not `200 OK`. No file is
    ///   created in that case.
    /// - [`FetchError::Io`] if the output file cannot be created or written.
    ///
    /// The response and the file handle are dropped on every return path,
    /// which releases the connection and closes the file. A file that was
    /// created but not completely written is removed again.
    async fn fetch(&self, url: &str) -> Result<Saved, FetchError> {
        let connection_error = |cause| FetchError::Connection {
            url: url.to_string(),
            cause,
        };

        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(connection_error)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status,
            });
        }

        let path = output_path(&self.dest_dir, url);
        let io_error = |cause| FetchError::Io {
            url: url.to_string(),
            path: path.clone(),
            cause,
        };

        let mut file = File::create(&path).await.map_err(io_error)?;
        let written = async {
            let mut bytes = 0u64;
            while let Some(chunk) = response.chunk().await.map_err(connection_error)? {
                file.write_all(&chunk).await.map_err(io_error)?;
                bytes += chunk.len() as u64;
            }
            file.flush().await.map_err(io_error)?;
            Ok::<u64, FetchError>(bytes)
        }
        .await;
        drop(file);

        let bytes = match written {
            Ok(bytes) => bytes,
            Err(error) => {
                // Only complete bodies may stay in the destination.
                let _ = tokio::fs::remove_file(&path).await;
                return Err(error);
            }
        };

        Ok(Saved {
            url: url.to_string(),
            path,
            bytes,
        })
    }
}
