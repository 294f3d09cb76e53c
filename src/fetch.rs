//! Fetch sources - retrieving raw NRRD bytes before decoding
//!
//! The decoder never performs I/O itself; a [`FetchSource`] delivers the
//! complete byte buffer from wherever it lives. The library ships a local
//! filesystem source, plus an HTTP source behind the `http-client` feature.
//! Applications with other transports implement the trait themselves.

use crate::error::{NrrdError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Transport kinds recognized by [`create_fetch_source`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchBackend {
    /// Local file system
    File,
    /// HTTP(S)
    Http,
}

impl FetchBackend {
    /// Determine the backend from a URL scheme
    pub fn from_url(url: &str) -> Result<Self> {
        if let Some(scheme_end) = url.find("://") {
            let scheme = &url[..scheme_end];
            match scheme {
                "file" => Ok(FetchBackend::File),
                "http" | "https" => Ok(FetchBackend::Http),
                _ => Err(NrrdError::InvalidUrl(format!("unknown scheme: {scheme}"))),
            }
        } else {
            // Bare paths go to the file system
            Ok(FetchBackend::File)
        }
    }
}

/// Trait for retrieving the complete byte buffer of a volume
#[async_trait]
pub trait FetchSource: Send + Sync {
    /// Fetch the full contents at `location`
    async fn fetch(&self, location: &str) -> Result<Bytes>;

    /// Get the backend type
    fn backend(&self) -> FetchBackend;
}

/// File system fetch source
pub struct FileFetchSource {
    base_path: PathBuf,
}

impl FileFetchSource {
    /// Create a fetch source rooted at `base_path`
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn full_path(&self, location: &str) -> PathBuf {
        self.base_path.join(location)
    }
}

#[async_trait]
impl FetchSource for FileFetchSource {
    async fn fetch(&self, location: &str) -> Result<Bytes> {
        let full_path = self.full_path(location);
        let data = fs::read(&full_path).await.map_err(NrrdError::Io)?;
        Ok(Bytes::from(data))
    }

    fn backend(&self) -> FetchBackend {
        FetchBackend::File
    }
}

/// HTTP fetch source backed by reqwest
#[cfg(feature = "http-client")]
pub struct HttpFetchSource {
    client: reqwest::Client,
    headers: Vec<(String, String)>,
}

#[cfg(feature = "http-client")]
impl HttpFetchSource {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            headers: Vec::new(),
        }
    }

    /// Add a request header sent with every fetch
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

#[cfg(feature = "http-client")]
impl Default for HttpFetchSource {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "http-client")]
#[async_trait]
impl FetchSource for HttpFetchSource {
    async fn fetch(&self, location: &str) -> Result<Bytes> {
        let mut request = self.client.get(location);
        for (name, value) in &self.headers {
            request = request.header(name, value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| NrrdError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(NrrdError::Network(format!(
                "{} fetching {location}",
                response.status()
            )));
        }

        response
            .bytes()
            .await
            .map_err(|e| NrrdError::Network(e.to_string()))
    }

    fn backend(&self) -> FetchBackend {
        FetchBackend::Http
    }
}

/// Create a fetch source appropriate for the given URL.
///
/// `file://` URLs and bare paths resolve against the file system; `http(s)`
/// URLs need the `http-client` feature.
pub fn create_fetch_source(url: &str) -> Result<Box<dyn FetchSource>> {
    match FetchBackend::from_url(url)? {
        FetchBackend::File => {
            // Rooted at the empty path: join() passes absolute and relative
            // locations through unchanged.
            Ok(Box::new(FileFetchSource::new("")))
        }
        FetchBackend::Http => {
            #[cfg(feature = "http-client")]
            {
                Ok(Box::new(HttpFetchSource::new()))
            }
            #[cfg(not(feature = "http-client"))]
            {
                Err(NrrdError::InvalidUrl(
                    "HTTP fetch requires the http-client feature".to_string(),
                ))
            }
        }
    }
}

/// Strip a URL down to the location a [`FetchSource`] expects.
pub(crate) fn location_of(url: &str) -> &str {
    url.strip_prefix("file://").unwrap_or(url)
}
