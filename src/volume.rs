//! Decoded volume - the artifact handed to downstream rendering

use crate::error::{NrrdError, Result};
use serde::{Deserialize, Serialize};

/// A decoded scalar volume: per-axis extents plus a dense flat sample buffer.
///
/// Samples are stored as `f64` regardless of the source element type so
/// callers see a single numeric representation. The buffer is laid out with
/// the **first declared axis varying fastest** (NRRD's own convention); see
/// [`Volume::index_of`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Volume {
    /// Per-axis extents in declared order
    pub shape: Vec<usize>,

    /// Flat sample buffer, `shape.iter().product()` entries
    pub data: Vec<f64>,

    /// Coordinate space label from the header, if any
    pub space: Option<String>,

    /// Volume origin in the coordinate space
    pub space_origin: Option<[f64; 3]>,

    /// Per-axis orientation vectors (`None` where the header said `none`)
    pub space_directions: Vec<Option<[f64; 3]>>,

    /// Per-axis sample spacing
    pub spacings: Vec<f64>,
}

impl Volume {
    /// Extent of the first axis (1 for lower-dimensional volumes)
    pub fn x_length(&self) -> usize {
        self.shape.first().copied().unwrap_or(1)
    }

    /// Extent of the second axis (1 for lower-dimensional volumes)
    pub fn y_length(&self) -> usize {
        self.shape.get(1).copied().unwrap_or(1)
    }

    /// Extent of the third axis (1 for lower-dimensional volumes)
    pub fn z_length(&self) -> usize {
        self.shape.get(2).copied().unwrap_or(1)
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Flat index of a sample at the given per-axis coordinates.
    ///
    /// The first declared axis varies fastest: for a 3D volume the sample at
    /// `(x, y, z)` lives at `x + shape[0] * (y + shape[1] * z)`.
    pub fn index_of(&self, coords: &[usize]) -> Result<usize> {
        if coords.len() != self.shape.len() {
            return Err(NrrdError::DimensionMismatch {
                expected: self.shape.len(),
                actual: coords.len(),
            });
        }

        let mut index = 0usize;
        let mut stride = 1usize;
        for (&coord, &extent) in coords.iter().zip(self.shape.iter()) {
            if coord >= extent {
                return Err(NrrdError::OutOfBounds(format!(
                    "coordinate {coord} exceeds axis extent {extent}"
                )));
            }
            index += coord * stride;
            stride *= extent;
        }
        Ok(index)
    }

    /// Sample value at the given per-axis coordinates
    pub fn get(&self, coords: &[usize]) -> Result<f64> {
        Ok(self.data[self.index_of(coords)?])
    }

    /// Minimum and maximum sample values, or `None` for an empty volume
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut iter = self.data.iter().copied();
        let first = iter.next()?;
        let mut min = first;
        let mut max = first;
        for v in iter {
            if v < min {
                min = v;
            }
            if v > max {
                max = v;
            }
        }
        Some((min, max))
    }

    /// Human-readable one-line description
    pub fn summary(&self) -> String {
        let shape_str = self
            .shape
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(" x ");
        format!(
            "{}D volume: {} ({} samples)",
            self.shape.len(),
            shape_str,
            self.data.len()
        )
    }

    /// JSON summary of the shape and spatial metadata (omits the sample
    /// buffer), for diagnostics and manifests.
    pub fn summary_json(&self) -> Result<String> {
        #[derive(Serialize)]
        struct Summary<'a> {
            shape: &'a [usize],
            samples: usize,
            space: Option<&'a str>,
            space_origin: Option<[f64; 3]>,
            spacings: &'a [f64],
        }

        Ok(serde_json::to_string(&Summary {
            shape: &self.shape,
            samples: self.data.len(),
            space: self.space.as_deref(),
            space_origin: self.space_origin,
            spacings: &self.spacings,
        })?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_volume() -> Volume {
        Volume {
            shape: vec![2, 3, 4],
            data: (0..24).map(f64::from).collect(),
            space: None,
            space_origin: None,
            space_directions: Vec::new(),
            spacings: Vec::new(),
        }
    }

    #[test]
    fn test_axis_accessors() {
        let v = test_volume();
        assert_eq!(v.x_length(), 2);
        assert_eq!(v.y_length(), 3);
        assert_eq!(v.z_length(), 4);
        assert_eq!(v.len(), 24);
    }

    #[test]
    fn test_lower_dimensional_accessors() {
        let v = Volume {
            shape: vec![5],
            data: vec![0.0; 5],
            space: None,
            space_origin: None,
            space_directions: Vec::new(),
            spacings: Vec::new(),
        };
        assert_eq!(v.x_length(), 5);
        assert_eq!(v.y_length(), 1);
        assert_eq!(v.z_length(), 1);
    }

    #[test]
    fn test_index_first_axis_fastest() {
        let v = test_volume();
        assert_eq!(v.index_of(&[0, 0, 0]).unwrap(), 0);
        assert_eq!(v.index_of(&[1, 0, 0]).unwrap(), 1);
        assert_eq!(v.index_of(&[0, 1, 0]).unwrap(), 2);
        assert_eq!(v.index_of(&[0, 0, 1]).unwrap(), 6);
        assert_eq!(v.index_of(&[1, 2, 3]).unwrap(), 23);
        assert_eq!(v.get(&[1, 2, 3]).unwrap(), 23.0);
    }

    #[test]
    fn test_index_bounds() {
        let v = test_volume();
        assert!(v.index_of(&[2, 0, 0]).is_err());
        assert!(v.index_of(&[0, 0]).is_err());
    }

    #[test]
    fn test_value_range() {
        let v = test_volume();
        assert_eq!(v.value_range(), Some((0.0, 23.0)));
    }

    #[test]
    fn test_summary_json() {
        let v = test_volume();
        let json: serde_json::Value = serde_json::from_str(&v.summary_json().unwrap()).unwrap();
        assert_eq!(json["shape"], serde_json::json!([2, 3, 4]));
        assert_eq!(json["samples"], 24);
    }
}
