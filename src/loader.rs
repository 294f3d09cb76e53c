//! Volume loader - async fetch followed by synchronous decode
//!
//! The loader is the seam between the async fetch collaborator and the pure
//! decoder: it retrieves the complete buffer, runs [`decode`] on it, and
//! surfaces both transport and parse failures through the crate's `Result`.
//! It holds no mutable state, so one loader can serve concurrent loads.

use crate::decode::decode;
use crate::error::Result;
use crate::fetch::{create_fetch_source, location_of, FetchSource};
use crate::volume::Volume;
use futures::future::try_join_all;
use tracing::{debug, info, warn};

/// Loads NRRD volumes through a [`FetchSource`]
pub struct VolumeLoader {
    source: Box<dyn FetchSource>,
}

impl VolumeLoader {
    /// Create a loader whose fetch source is picked from the URL scheme
    pub fn for_url(url: &str) -> Result<Self> {
        Ok(Self {
            source: create_fetch_source(url)?,
        })
    }

    /// Create a loader around an explicit fetch source
    pub fn with_source(source: Box<dyn FetchSource>) -> Self {
        Self { source }
    }

    /// Fetch and decode one volume.
    pub async fn load(&self, url: &str) -> Result<Volume> {
        let location = location_of(url);
        debug!(location, "fetching volume");

        let bytes = self.source.fetch(location).await.map_err(|e| {
            warn!(location, error = %e, "volume fetch failed");
            e
        })?;

        debug!(location, bytes = bytes.len(), "decoding volume");
        match decode(&bytes) {
            Ok(volume) => {
                info!(location, summary = %volume.summary(), "volume loaded");
                Ok(volume)
            }
            Err(e) => {
                warn!(location, error = %e, "volume decode failed");
                Err(e)
            }
        }
    }

    /// Load several volumes concurrently; fails fast on the first error.
    pub async fn load_all(&self, urls: &[&str]) -> Result<Vec<Volume>> {
        try_join_all(urls.iter().map(|url| self.load(url))).await
    }
}
