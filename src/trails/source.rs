use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use futures::StreamExt;
use thiserror::Error;
use url::Url;

use super::model::{fallback_trails, Trail};
use super::parser::{parse_trails, ParseError};

/// Trail payloads larger than this are rejected.
pub const MAX_TRAILS_SIZE: usize = 5 * 1024 * 1024; // 5MB

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur while loading trail data.
///
/// None of these reach the caller of [`TrailSource::load`]; they are logged
/// and replaced by the fallback dataset.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,
    /// Body exceeded the 5MB size limit
    #[error("Response too large")]
    ResponseTooLarge,
    /// Local data file could not be read
    #[error("Read failed: {0}")]
    Io(#[from] std::io::Error),
    /// Body is not a JSON array of trails
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}

// ============================================================================
// Data Location
// ============================================================================

/// Where the trail data lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataLocation {
    Url(Url),
    File(PathBuf),
}

impl DataLocation {
    /// Interpret a CLI or config value.
    ///
    /// `http`/`https` URLs are fetched over the network, `file://` URLs and
    /// anything that does not parse as a URL are local paths.
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        match Url::parse(trimmed) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Self::Url(url),
            Ok(url) if url.scheme() == "file" => match url.to_file_path() {
                Ok(path) => Self::File(path),
                Err(()) => Self::File(PathBuf::from(trimmed)),
            },
            _ => Self::File(PathBuf::from(trimmed)),
        }
    }
}

impl Default for DataLocation {
    fn default() -> Self {
        Self::File(PathBuf::from("data/trails.json"))
    }
}

impl fmt::Display for DataLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => write!(f, "{url}"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

// ============================================================================
// Load Outcome
// ============================================================================

/// Whether the trails came from the configured location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOrigin {
    Remote,
    Fallback { reason: String },
}

impl LoadOrigin {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub trails: Vec<Trail>,
    pub origin: LoadOrigin,
}

// ============================================================================
// Trail Source
// ============================================================================

/// Loads the trail dataset. Cheap to clone, so it can move into a task.
#[derive(Debug, Clone)]
pub struct TrailSource {
    client: reqwest::Client,
    location: DataLocation,
    timeout: Duration,
}

impl TrailSource {
    pub fn new(client: reqwest::Client, location: DataLocation, timeout: Duration) -> Self {
        Self {
            client,
            location,
            timeout,
        }
    }

    pub fn location(&self) -> &DataLocation {
        &self.location
    }

    /// Load the trails, substituting the built-in dataset on any failure.
    ///
    /// This never fails. A valid empty array is returned as-is.
    pub async fn load(&self) -> LoadOutcome {
        match self.try_load().await {
            Ok(trails) => {
                tracing::info!(
                    location = %self.location,
                    count = trails.len(),
                    "Trail data loaded"
                );
                LoadOutcome {
                    trails,
                    origin: LoadOrigin::Remote,
                }
            }
            Err(e) => {
                tracing::warn!(
                    location = %self.location,
                    error = %e,
                    "Trail data unavailable, using fallback"
                );
                LoadOutcome {
                    trails: fallback_trails(),
                    origin: LoadOrigin::Fallback {
                        reason: e.to_string(),
                    },
                }
            }
        }
    }

    /// Fetch and parse without the fallback.
    pub async fn try_load(&self) -> Result<Vec<Trail>, FetchError> {
        let bytes = match &self.location {
            DataLocation::Url(url) => self.fetch_url(url).await?,
            DataLocation::File(path) => read_file(path).await?,
        };

        let result = parse_trails(&bytes)?;
        if result.skipped > 0 {
            tracing::warn!(
                location = %self.location,
                skipped = result.skipped,
                "Trail records skipped"
            );
        }
        Ok(result.trails)
    }

    async fn fetch_url(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        let response = tokio::time::timeout(self.timeout, self.client.get(url.clone()).send())
            .await
            .map_err(|_| FetchError::Timeout)?
            .map_err(FetchError::Network)?;

        if !response.status().is_success() {
            return Err(FetchError::HttpStatus(response.status().as_u16()));
        }

        tokio::time::timeout(self.timeout, read_limited_bytes(response, MAX_TRAILS_SIZE))
            .await
            .map_err(|_| FetchError::Timeout)?
    }
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len > limit as u64 {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(FetchError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}

async fn read_file(path: &std::path::Path) -> Result<Vec<u8>, FetchError> {
    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > MAX_TRAILS_SIZE as u64 {
        return Err(FetchError::ResponseTooLarge);
    }
    Ok(tokio::fs::read(path).await?)
}
