//! Volume encoding - the write-side counterpart of the decoder
//!
//! Serializes a [`Volume`] back into header + payload bytes. Mostly used to
//! produce fixtures and to round-trip volumes through the decoder, but the
//! output is a valid file any NRRD reader accepts.

use crate::error::{NrrdError, Result};
use crate::types::{ElementType, Encoding, Endianness};
use crate::volume::Volume;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fmt::Write as _;
use std::io::Write as _;

/// Target representation for [`encode`]
#[derive(Debug, Clone, Copy)]
pub struct EncodeOptions {
    pub element_type: ElementType,
    pub endianness: Endianness,
    pub encoding: Encoding,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            element_type: ElementType::F32,
            endianness: Endianness::Little,
            encoding: Encoding::Raw,
        }
    }
}

/// Serialize a volume to NRRD bytes.
///
/// Samples are narrowed from the volume's `f64` buffer to the requested
/// element type; integer targets round to nearest. The caller is responsible
/// for picking a target type wide enough for the data.
pub fn encode(volume: &Volume, opts: &EncodeOptions) -> Result<Vec<u8>> {
    if volume.shape.is_empty() {
        return Err(NrrdError::MissingField("sizes"));
    }
    let expected: usize = volume.shape.iter().product();
    if volume.data.len() != expected {
        return Err(NrrdError::DimensionMismatch {
            expected,
            actual: volume.data.len(),
        });
    }

    let mut out = Vec::new();
    out.extend_from_slice(&write_header(volume, opts));

    let payload = write_samples(&volume.data, opts.element_type, opts.endianness);
    match opts.encoding {
        Encoding::Raw => out.extend_from_slice(&payload),
        Encoding::Gzip => {
            let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(&payload)?;
            out.extend_from_slice(&encoder.finish()?);
        }
    }

    Ok(out)
}

fn write_header(volume: &Volume, opts: &EncodeOptions) -> Vec<u8> {
    let mut header = String::from("NRRD0005\n");
    let _ = writeln!(header, "type: {}", opts.element_type.token());
    let _ = writeln!(header, "dimension: {}", volume.shape.len());
    let _ = writeln!(header, "sizes: {}", join_ints(&volume.shape));
    if let Some(space) = &volume.space {
        let _ = writeln!(header, "space: {space}");
    }
    if let Some([a, b, c]) = volume.space_origin {
        let _ = writeln!(header, "space origin: ({a},{b},{c})");
    }
    if !volume.space_directions.is_empty() {
        let dirs = volume
            .space_directions
            .iter()
            .map(|d| match d {
                Some([a, b, c]) => format!("({a},{b},{c})"),
                None => "none".to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ");
        let _ = writeln!(header, "space directions: {dirs}");
    }
    if !volume.spacings.is_empty() {
        let spacings = volume
            .spacings
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        let _ = writeln!(header, "spacings: {spacings}");
    }
    let _ = writeln!(header, "endian: {}", opts.endianness.token());
    let _ = writeln!(header, "encoding: {}", opts.encoding.token());
    header.push('\n');
    header.into_bytes()
}

fn join_ints(values: &[usize]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Narrow `f64` samples into the target element representation.
fn write_samples(data: &[f64], element_type: ElementType, endianness: Endianness) -> Vec<u8> {
    use ElementType::*;
    use Endianness::*;

    let mut out = Vec::with_capacity(data.len() * element_type.size_in_bytes());
    for &v in data {
        match (element_type, endianness) {
            (I8, _) => out.push((v.round() as i8) as u8),
            (U8, _) => out.push(v.round() as u8),
            (I16, Little) => out.extend_from_slice(&(v.round() as i16).to_le_bytes()),
            (I16, Big) => out.extend_from_slice(&(v.round() as i16).to_be_bytes()),
            (U16, Little) => out.extend_from_slice(&(v.round() as u16).to_le_bytes()),
            (U16, Big) => out.extend_from_slice(&(v.round() as u16).to_be_bytes()),
            (I32, Little) => out.extend_from_slice(&(v.round() as i32).to_le_bytes()),
            (I32, Big) => out.extend_from_slice(&(v.round() as i32).to_be_bytes()),
            (U32, Little) => out.extend_from_slice(&(v.round() as u32).to_le_bytes()),
            (U32, Big) => out.extend_from_slice(&(v.round() as u32).to_be_bytes()),
            (F32, Little) => out.extend_from_slice(&(v as f32).to_le_bytes()),
            (F32, Big) => out.extend_from_slice(&(v as f32).to_be_bytes()),
            (F64, Little) => out.extend_from_slice(&v.to_le_bytes()),
            (F64, Big) => out.extend_from_slice(&v.to_be_bytes()),
        }
    }
    out
}
