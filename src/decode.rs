//! Payload decoding - turning header-described bytes into samples
//!
//! Decoding is a pure, synchronous transformation: the full byte buffer in,
//! a [`Volume`] out. Independent decode calls share no state.

use crate::error::{NrrdError, Result};
use crate::header::{parse_header, VolumeMetadata};
use crate::types::{ElementType, Encoding, Endianness};
use crate::volume::Volume;
use flate2::read::GzDecoder;
use std::io::Read;

/// Decode a complete NRRD byte buffer (header plus payload) into a volume.
///
/// This is the single entry point for in-memory buffers; the async fetch
/// layer hands its bytes here.
pub fn decode(data: &[u8]) -> Result<Volume> {
    let (meta, payload_offset) = parse_header(data)?;
    let samples = decode_payload(&meta, &data[payload_offset..])?;

    Ok(Volume {
        shape: meta.sizes,
        data: samples,
        space: meta.space,
        space_origin: meta.space_origin,
        space_directions: meta.space_directions,
        spacings: meta.spacings,
    })
}

/// Decode the binary payload described by an already-parsed header.
///
/// `payload` is the byte slice starting at the header's end offset. The
/// metadata must carry `type` and `sizes`; anything less is a precondition
/// failure surfaced as [`NrrdError::MissingField`] or
/// [`NrrdError::DimensionMismatch`].
pub fn decode_payload(meta: &VolumeMetadata, payload: &[u8]) -> Result<Vec<f64>> {
    meta.validate()?;
    let element_type = meta
        .element_type
        .ok_or(NrrdError::MissingField("type"))?;

    let sample_count = meta.sample_count()?;
    let required = sample_count
        .checked_mul(element_type.size_in_bytes())
        .ok_or_else(|| NrrdError::InvalidHeader("payload size overflows usize".to_string()))?;

    let inflated;
    let bytes: &[u8] = match meta.encoding {
        Encoding::Raw => payload,
        Encoding::Gzip => {
            inflated = inflate(payload, required)?;
            &inflated
        }
    };

    if bytes.len() < required {
        return Err(NrrdError::TruncatedPayload {
            required,
            available: bytes.len(),
        });
    }

    Ok(convert_samples(
        element_type,
        meta.endianness,
        &bytes[..required],
    ))
}

/// Upper bound on the buffer preallocated before inflating; the header's
/// declared size is untrusted until bytes actually arrive.
const MAX_INFLATE_PREALLOC: usize = 64 << 20;

/// Inflate a gzip-compressed payload.
fn inflate(payload: &[u8], expected_size: usize) -> Result<Vec<u8>> {
    let mut decoder = GzDecoder::new(payload);
    let mut decompressed = Vec::with_capacity(expected_size.min(MAX_INFLATE_PREALLOC));
    decoder
        .read_to_end(&mut decompressed)
        .map_err(|e| NrrdError::Decompression(e.to_string()))?;
    Ok(decompressed)
}

/// Convert the exact-length byte block into `f64` samples.
///
/// The per-type conversion is resolved once here, outside the sample loop.
/// `bytes.len()` is a multiple of the element width (enforced by the caller
/// slicing to `required`).
fn convert_samples(element_type: ElementType, endianness: Endianness, bytes: &[u8]) -> Vec<f64> {
    use ElementType::*;
    use Endianness::*;

    match (element_type, endianness) {
        (I8, _) => bytes.iter().map(|&b| f64::from(b as i8)).collect(),
        (U8, _) => bytes.iter().map(|&b| f64::from(b)).collect(),
        (I16, Little) => groups(bytes, |b| f64::from(i16::from_le_bytes(b))),
        (I16, Big) => groups(bytes, |b| f64::from(i16::from_be_bytes(b))),
        (U16, Little) => groups(bytes, |b| f64::from(u16::from_le_bytes(b))),
        (U16, Big) => groups(bytes, |b| f64::from(u16::from_be_bytes(b))),
        (I32, Little) => groups(bytes, |b| f64::from(i32::from_le_bytes(b))),
        (I32, Big) => groups(bytes, |b| f64::from(i32::from_be_bytes(b))),
        (U32, Little) => groups(bytes, |b| f64::from(u32::from_le_bytes(b))),
        (U32, Big) => groups(bytes, |b| f64::from(u32::from_be_bytes(b))),
        (F32, Little) => groups(bytes, |b| f64::from(f32::from_le_bytes(b))),
        (F32, Big) => groups(bytes, |b| f64::from(f32::from_be_bytes(b))),
        (F64, Little) => groups(bytes, f64::from_le_bytes),
        (F64, Big) => groups(bytes, f64::from_be_bytes),
    }
}

/// Map each `N`-byte group of `bytes` through `f`.
fn groups<const N: usize, F>(bytes: &[u8], f: F) -> Vec<f64>
where
    F: Fn([u8; N]) -> f64,
{
    bytes
        .chunks_exact(N)
        .map(|chunk| {
            let mut group = [0u8; N];
            group.copy_from_slice(chunk);
            f(group)
        })
        .collect()
}
