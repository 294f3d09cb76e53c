//! nrrd-volume - NRRD volumetric-data decoding
//!
//! Decodes NRRD files (textual `key: value` header + raw or gzip binary
//! payload) into dense in-memory volumes for downstream rendering.
//!
//! # Features
//!
//! - Header-driven decode of 8/16/32-bit integer and 32/64-bit float samples
//! - Little- and big-endian payloads
//! - Raw and gzip payload encodings
//! - Async fetch layer (local filesystem built in; HTTP behind the
//!   `http-client` feature; implement `FetchSource` for anything else)
//! - Pure, synchronous decoder with no shared state - safe to run
//!   concurrently on separate buffers
//!
//! # Example
//!
//! ```rust,ignore
//! use nrrd_volume::VolumeLoader;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let loader = VolumeLoader::for_url("file:///data/brain.nrrd")?;
//! let volume = loader.load("file:///data/brain.nrrd").await?;
//! println!("{} samples, shape {:?}", volume.len(), volume.shape);
//! # Ok(())
//! # }
//! ```
//!
//! Already have the bytes? Skip the loader and call [`decode`] directly.

pub mod decode;
pub mod encode;
pub mod error;
pub mod fetch;
pub mod header;
pub mod loader;
pub mod types;
pub mod volume;

// Re-exports
pub use decode::{decode, decode_payload};
pub use encode::{encode, EncodeOptions};
pub use error::{NrrdError, Result};
pub use fetch::{create_fetch_source, FetchBackend, FetchSource, FileFetchSource};
pub use header::{parse_header, VolumeMetadata};
pub use loader::VolumeLoader;
pub use types::{ElementType, Encoding, Endianness};
pub use volume::Volume;

#[cfg(feature = "http-client")]
pub use fetch::HttpFetchSource;

/// Version of the nrrd-volume implementation
pub const NRRD_VOLUME_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Customary magic prefix of NRRD headers (skipped when present; headers
/// may also open directly with fields)
pub const NRRD_MAGIC: &[u8; 4] = b"NRRD";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!NRRD_VOLUME_VERSION.is_empty());
    }
}
