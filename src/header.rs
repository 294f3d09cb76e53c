//! NRRD header parsing
//!
//! The header is a textual preamble: a magic line (`NRRD000N`), then
//! `field: value` lines (and `key:=value` pairs), terminated by an empty
//! line. The binary payload starts immediately after the terminator.

use crate::error::{NrrdError, Result};
use crate::types::{ElementType, Encoding, Endianness};
use serde::{Deserialize, Serialize};

/// Parsed NRRD header fields
///
/// Built once per decode call by [`parse_header`]. Duplicate keys overwrite
/// (last wins); unrecognized keys are skipped for forward compatibility.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VolumeMetadata {
    /// Scalar type of one sample; required before payload decode
    pub element_type: Option<ElementType>,

    /// Byte order of multi-byte samples
    pub endianness: Endianness,

    /// Payload encoding (raw or gzip)
    pub encoding: Encoding,

    /// Declared number of axes
    pub dimension: Option<usize>,

    /// Per-axis extents, in declared axis order
    pub sizes: Vec<usize>,

    /// Coordinate space label, stored verbatim
    pub space: Option<String>,

    /// Origin of the volume in the coordinate space
    pub space_origin: Option<[f64; 3]>,

    /// Per-axis orientation vectors; `None` marks an axis declared as `none`
    pub space_directions: Vec<Option<[f64; 3]>>,

    /// Per-axis sample spacing
    pub spacings: Vec<f64>,
}

impl VolumeMetadata {
    /// Check that the header is complete and internally consistent before
    /// payload decode.
    pub fn validate(&self) -> Result<()> {
        if self.element_type.is_none() {
            return Err(NrrdError::MissingField("type"));
        }
        if self.sizes.is_empty() {
            return Err(NrrdError::MissingField("sizes"));
        }
        if let Some(dimension) = self.dimension {
            if dimension != self.sizes.len() {
                return Err(NrrdError::DimensionMismatch {
                    expected: dimension,
                    actual: self.sizes.len(),
                });
            }
        }
        if self.sizes.iter().any(|&s| s == 0) {
            return Err(NrrdError::InvalidHeader(
                "axis sizes must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Total number of samples declared by `sizes`
    pub fn sample_count(&self) -> Result<usize> {
        self.sizes
            .iter()
            .try_fold(1usize, |acc, &s| acc.checked_mul(s))
            .ok_or_else(|| {
                NrrdError::InvalidHeader("sample count overflows usize".to_string())
            })
    }
}

/// Parse the textual header region of a complete NRRD byte buffer.
///
/// Returns the populated metadata and the byte offset where the payload
/// begins (the byte after the blank-line terminator). A leading magic line
/// (`NRRD000N`) is skipped when present; headers that start directly with
/// fields parse the same way.
pub fn parse_header(data: &[u8]) -> Result<(VolumeMetadata, usize)> {
    let mut meta = VolumeMetadata::default();
    let mut offset = 0usize;
    let mut first_line = true;

    while offset < data.len() {
        let line_end = data[offset..]
            .iter()
            .position(|&b| b == b'\n')
            .map(|p| offset + p)
            .ok_or_else(|| {
                NrrdError::InvalidHeader("header has no blank-line terminator".to_string())
            })?;

        let mut line = &data[offset..line_end];
        if line.ends_with(b"\r") {
            line = &line[..line.len() - 1];
        }
        offset = line_end + 1;

        // Headers are ASCII/Latin-1; every byte maps to exactly one char.
        let line: String = line.iter().map(|&b| b as char).collect();

        // A magic line (NRRD000N) is customary but not required; bare
        // field lists decode the same way.
        if first_line {
            first_line = false;
            if line.starts_with("NRRD") {
                continue;
            }
        }

        // Empty line terminates the header; payload starts right after.
        if line.is_empty() {
            return Ok((meta, offset));
        }

        if line.starts_with('#') {
            continue;
        }

        let (key, value) = split_field(&line)?;
        apply_field(&mut meta, key, value)?;
    }

    Err(NrrdError::InvalidHeader(
        "header has no blank-line terminator".to_string(),
    ))
}

/// Split a header line into key and trimmed value.
///
/// NRRD fields use `key: value`; per-file key/value pairs use `key:=value`.
fn split_field(line: &str) -> Result<(&str, &str)> {
    if let Some(pos) = line.find(":=") {
        return Ok((line[..pos].trim(), line[pos + 2..].trim()));
    }
    if let Some(pos) = line.find(':') {
        return Ok((line[..pos].trim(), line[pos + 1..].trim()));
    }
    Err(NrrdError::InvalidHeader(format!(
        "header line is not a key/value pair: {line}"
    )))
}

/// Dispatch one header field to its conversion rule. Unknown keys are
/// ignored so newer files still load.
fn apply_field(meta: &mut VolumeMetadata, key: &str, value: &str) -> Result<()> {
    match key {
        "type" => {
            meta.element_type = Some(
                ElementType::from_token(value)
                    .ok_or_else(|| NrrdError::UnsupportedElementType(value.to_string()))?,
            );
        }
        "endian" => {
            meta.endianness =
                Endianness::from_token(value).ok_or_else(|| malformed(key, value))?;
        }
        "encoding" => {
            meta.encoding = Encoding::from_token(value).ok_or_else(|| malformed(key, value))?;
        }
        "dimension" => {
            meta.dimension = Some(parse_int(key, value)?);
        }
        "sizes" => {
            meta.sizes = value
                .split_whitespace()
                .map(|tok| parse_int(key, tok))
                .collect::<Result<_>>()?;
        }
        "space" => {
            meta.space = Some(value.to_string());
        }
        "space origin" => {
            meta.space_origin = Some(parse_tuple3(key, value)?);
        }
        "space directions" => {
            meta.space_directions = parse_direction_list(key, value)?;
        }
        "spacings" => {
            meta.spacings = value
                .split_whitespace()
                .map(|tok| parse_float(key, tok))
                .collect::<Result<_>>()?;
        }
        _ => {}
    }
    Ok(())
}

fn malformed(key: &str, value: &str) -> NrrdError {
    NrrdError::MalformedHeaderValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn parse_int(key: &str, token: &str) -> Result<usize> {
    token.parse::<usize>().map_err(|_| malformed(key, token))
}

fn parse_float(key: &str, token: &str) -> Result<f64> {
    token.parse::<f64>().map_err(|_| malformed(key, token))
}

/// Parse a `(a,b,c)` tuple into three floats.
fn parse_tuple3(key: &str, value: &str) -> Result<[f64; 3]> {
    let inner = value
        .strip_prefix('(')
        .and_then(|v| v.strip_suffix(')'))
        .ok_or_else(|| malformed(key, value))?;

    let mut out = [0.0f64; 3];
    let mut count = 0;
    for tok in inner.split(',') {
        if count == 3 {
            return Err(malformed(key, value));
        }
        out[count] = parse_float(key, tok.trim())?;
        count += 1;
    }
    if count != 3 {
        return Err(malformed(key, value));
    }
    Ok(out)
}

/// Parse the `space directions` value: a whitespace-separated sequence of
/// `(a,b,c)` tuples, where an axis without orientation appears as `none`.
fn parse_direction_list(key: &str, value: &str) -> Result<Vec<Option<[f64; 3]>>> {
    let mut dirs = Vec::new();
    let mut rest = value.trim_start();

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("none") {
            dirs.push(None);
            rest = after.trim_start();
        } else if rest.starts_with('(') {
            let close = rest
                .find(')')
                .ok_or_else(|| malformed(key, value))?;
            dirs.push(Some(parse_tuple3(key, &rest[..=close])?));
            rest = rest[close + 1..].trim_start();
        } else {
            return Err(malformed(key, value));
        }
    }

    Ok(dirs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_bytes(body: &str) -> Vec<u8> {
        format!("NRRD0005\n{body}\n").into_bytes()
    }

    #[test]
    fn test_parse_minimal_header() {
        let data = header_bytes("type: float\ndimension: 3\nsizes: 2 3 4\n");
        let (meta, offset) = parse_header(&data).unwrap();
        assert_eq!(meta.element_type, Some(ElementType::F32));
        assert_eq!(meta.dimension, Some(3));
        assert_eq!(meta.sizes, vec![2, 3, 4]);
        assert_eq!(offset, data.len());
        meta.validate().unwrap();
    }

    #[test]
    fn test_payload_offset() {
        let mut data = header_bytes("type: uint8\nsizes: 2\n");
        let header_len = data.len();
        data.extend_from_slice(&[7, 9]);
        let (_, offset) = parse_header(&data).unwrap();
        assert_eq!(offset, header_len);
        assert_eq!(&data[offset..], &[7, 9]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let data = b"NRRD0004\r\ntype: uint8\r\nsizes: 4\r\n\r\n".to_vec();
        let (meta, offset) = parse_header(&data).unwrap();
        assert_eq!(meta.element_type, Some(ElementType::U8));
        assert_eq!(offset, data.len());
    }

    #[test]
    fn test_magic_line_optional() {
        let data = b"type: float\ndimension: 3\nsizes: 2 2 2\n\n";
        let (meta, offset) = parse_header(data).unwrap();
        assert_eq!(meta.element_type, Some(ElementType::F32));
        assert_eq!(meta.sizes, vec![2, 2, 2]);
        assert_eq!(offset, data.len());
    }

    #[test]
    fn test_latin1_space_label() {
        // 0xE9 is Latin-1 'é'; the label must survive byte-for-byte.
        let mut data = b"NRRD0005\ntype: uint8\nsizes: 1\nspace: tomographie-c\xE9r\xE9brale\n\n"
            .to_vec();
        data.push(0);
        let (meta, _) = parse_header(&data).unwrap();
        assert_eq!(meta.space.as_deref(), Some("tomographie-cérébrale"));
    }

    #[test]
    fn test_missing_terminator() {
        let data = b"NRRD0005\ntype: float\n";
        assert!(matches!(
            parse_header(data),
            Err(NrrdError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_comments_and_unknown_keys_skipped() {
        let data = header_bytes(
            "# produced by a future tool\ntype: int16\nfancy new key: whatever\nsizes: 5 5\n",
        );
        let (meta, _) = parse_header(&data).unwrap();
        assert_eq!(meta.element_type, Some(ElementType::I16));
        assert_eq!(meta.sizes, vec![5, 5]);
    }

    #[test]
    fn test_key_value_pair_form() {
        let data = header_bytes("type: uint8\nsizes: 1\nmodality:=MRI\n");
        let (meta, _) = parse_header(&data).unwrap();
        assert_eq!(meta.element_type, Some(ElementType::U8));
    }

    #[test]
    fn test_unsupported_type_token() {
        let data = header_bytes("type: quaternion\nsizes: 2\n");
        match parse_header(&data) {
            Err(NrrdError::UnsupportedElementType(tok)) => assert_eq!(tok, "quaternion"),
            other => panic!("expected UnsupportedElementType, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_integer() {
        let data = header_bytes("type: float\nsizes: 2 banana 4\n");
        match parse_header(&data) {
            Err(NrrdError::MalformedHeaderValue { key, value }) => {
                assert_eq!(key, "sizes");
                assert_eq!(value, "banana");
            }
            other => panic!("expected MalformedHeaderValue, got {other:?}"),
        }
    }

    #[test]
    fn test_space_fields() {
        let data = header_bytes(
            "type: float\ndimension: 3\nsizes: 2 2 2\nspace: left-posterior-superior\n\
             space origin: (0.0, -12.5, 4.25)\n\
             space directions: (1,0,0) (0,1,0) (0,0,1)\nspacings: 1.0 0.5 0.5\n",
        );
        let (meta, _) = parse_header(&data).unwrap();
        assert_eq!(meta.space.as_deref(), Some("left-posterior-superior"));
        assert_eq!(meta.space_origin, Some([0.0, -12.5, 4.25]));
        assert_eq!(
            meta.space_directions,
            vec![
                Some([1.0, 0.0, 0.0]),
                Some([0.0, 1.0, 0.0]),
                Some([0.0, 0.0, 1.0])
            ]
        );
        assert_eq!(meta.spacings, vec![1.0, 0.5, 0.5]);
    }

    #[test]
    fn test_none_space_direction() {
        let data = header_bytes(
            "type: float\ndimension: 4\nsizes: 3 2 2 2\n\
             space directions: none (1,0,0) (0,1,0) (0,0,1)\n",
        );
        let (meta, _) = parse_header(&data).unwrap();
        assert_eq!(meta.space_directions.len(), 4);
        assert_eq!(meta.space_directions[0], None);
        assert_eq!(meta.space_directions[1], Some([1.0, 0.0, 0.0]));
    }

    #[test]
    fn test_tuple_arity_error() {
        let data = header_bytes("type: float\nsizes: 2\nspace origin: (1.0, 2.0)\n");
        assert!(matches!(
            parse_header(&data),
            Err(NrrdError::MalformedHeaderValue { .. })
        ));
    }

    #[test]
    fn test_unbalanced_parentheses() {
        let data = header_bytes("type: float\nsizes: 2\nspace directions: (1,0,0\n");
        assert!(matches!(
            parse_header(&data),
            Err(NrrdError::MalformedHeaderValue { .. })
        ));
    }

    #[test]
    fn test_duplicate_key_last_wins() {
        let data = header_bytes("type: uint8\ntype: float\nsizes: 2\n");
        let (meta, _) = parse_header(&data).unwrap();
        assert_eq!(meta.element_type, Some(ElementType::F32));
    }

    #[test]
    fn test_validate_dimension_mismatch() {
        let data = header_bytes("type: float\ndimension: 3\nsizes: 2 2\n");
        let (meta, _) = parse_header(&data).unwrap();
        match meta.validate() {
            Err(NrrdError::DimensionMismatch { expected, actual }) => {
                assert_eq!(expected, 3);
                assert_eq!(actual, 2);
            }
            other => panic!("expected DimensionMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_missing_type() {
        let data = header_bytes("sizes: 2 2\n");
        let (meta, _) = parse_header(&data).unwrap();
        assert!(matches!(meta.validate(), Err(NrrdError::MissingField("type"))));
    }

    #[test]
    fn test_validate_zero_size_axis() {
        let data = header_bytes("type: float\nsizes: 2 0 2\n");
        let (meta, _) = parse_header(&data).unwrap();
        assert!(matches!(meta.validate(), Err(NrrdError::InvalidHeader(_))));
    }

    #[test]
    fn test_sample_count() {
        let data = header_bytes("type: float\nsizes: 2 3 4\n");
        let (meta, _) = parse_header(&data).unwrap();
        assert_eq!(meta.sample_count().unwrap(), 24);
    }
}
