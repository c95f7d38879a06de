//! Raster buffer and geo-referencing types.

use serde::{Deserialize, Serialize};

use crate::error::{LstError, LstResult};

/// A 2-D raster of pixel values in row-major order (top row first).
///
/// All bands of one scene share a shape; pixel alignment across bands is
/// assumed, no internal resampling happens here.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterBuf {
    /// Pixel values, row-major.
    pub data: Vec<f64>,
    /// Number of columns.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
}

impl RasterBuf {
    /// Create a raster from existing data. Panics in debug builds if the
    /// data length does not match the dimensions.
    pub fn new(data: Vec<f64>, width: usize, height: usize) -> Self {
        debug_assert_eq!(data.len(), width * height);
        Self {
            data,
            width,
            height,
        }
    }

    /// Create a raster filled with a constant value.
    pub fn filled(width: usize, height: usize, value: f64) -> Self {
        Self {
            data: vec![value; width * height],
            width,
            height,
        }
    }

    /// Get the value at a grid position.
    pub fn get(&self, col: usize, row: usize) -> Option<f64> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.data.get(row * self.width + col).copied()
    }

    /// Grid dimensions as (width, height).
    pub fn shape(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Total number of pixels.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the raster has no pixels.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Fail with `BandShapeMismatch` unless `other` has the same shape.
    pub fn check_same_shape(&self, other: &RasterBuf, band: &str) -> LstResult<()> {
        if self.shape() != other.shape() {
            return Err(LstError::BandShapeMismatch {
                band: band.to_string(),
                expected_width: self.width,
                expected_height: self.height,
                actual_width: other.width,
                actual_height: other.height,
            });
        }
        Ok(())
    }

    /// Fraction of pixels that are finite (not NaN, not infinite).
    pub fn finite_fraction(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        let finite = self.data.iter().filter(|v| v.is_finite()).count();
        finite as f64 / self.data.len() as f64
    }

    /// Minimum and maximum over finite pixels, `None` when every pixel is
    /// NaN or the raster is empty.
    pub fn finite_min_max(&self) -> Option<(f64, f64)> {
        let mut range: Option<(f64, f64)> = None;
        for &v in &self.data {
            if !v.is_finite() {
                continue;
            }
            range = Some(match range {
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
                None => (v, v),
            });
        }
        range
    }
}

/// Opaque bundle of GeoTIFF geo-referencing tags.
///
/// Read from the input thermal band and written to every output raster
/// unchanged; the toolkit never interprets projection parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoReference {
    /// ModelPixelScaleTag (33550).
    pub pixel_scale: Option<Vec<f64>>,
    /// ModelTiepointTag (33922).
    pub tiepoints: Option<Vec<f64>>,
    /// ModelTransformationTag (34264).
    pub transformation: Option<Vec<f64>>,
    /// GeoKeyDirectoryTag (34735).
    pub key_directory: Option<Vec<u16>>,
    /// GeoDoubleParamsTag (34736).
    pub double_params: Option<Vec<f64>>,
    /// GeoAsciiParamsTag (34737).
    pub ascii_params: Option<String>,
}

impl GeoReference {
    /// True when no geo tags were present on the source raster.
    pub fn is_empty(&self) -> bool {
        self.pixel_scale.is_none()
            && self.tiepoints.is_none()
            && self.transformation.is_none()
            && self.key_directory.is_none()
            && self.double_params.is_none()
            && self.ascii_params.is_none()
    }
}
