//! Derived-layer vocabulary.

use serde::{Deserialize, Serialize};

use crate::raster::RasterBuf;

/// Semantic kind of a derived raster layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerKind {
    /// Normalized Difference Vegetation Index, dimensionless.
    Ndvi,
    /// Proportion of vegetation derived from NDVI, dimensionless.
    ProportionOfVegetation,
    /// Surface emissivity estimated from NDVI, dimensionless.
    Emissivity,
    /// At-sensor brightness temperature in Kelvin.
    BrightnessTemperature,
    /// Land surface temperature in Celsius.
    Lst,
}

impl LayerKind {
    /// Valid numeric range used for the out-of-domain sanity check.
    ///
    /// Ranges are deliberately generous; they catch unit mistakes (Kelvin
    /// written as Celsius and the like), not ordinary scene noise.
    pub fn valid_range(&self) -> (f64, f64) {
        match self {
            LayerKind::Ndvi => (-1.0, 1.0),
            LayerKind::ProportionOfVegetation => (0.0, 1.0),
            LayerKind::Emissivity => (0.9, 1.0),
            LayerKind::BrightnessTemperature => (150.0, 400.0),
            LayerKind::Lst => (-100.0, 100.0),
        }
    }

    /// Filename suffix used for output rasters (`<scene_id>_<suffix>.tif`).
    pub fn file_suffix(&self) -> &'static str {
        match self {
            LayerKind::Ndvi => "NDVI",
            LayerKind::ProportionOfVegetation => "PV",
            LayerKind::Emissivity => "EMIS",
            LayerKind::BrightnessTemperature => "BT",
            LayerKind::Lst => "LST",
        }
    }

    /// Physical units for reports.
    pub fn units(&self) -> &'static str {
        match self {
            LayerKind::BrightnessTemperature => "K",
            LayerKind::Lst => "degC",
            _ => "dimensionless",
        }
    }
}

impl std::fmt::Display for LayerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.file_suffix())
    }
}

/// A raster tagged with its semantic kind.
#[derive(Debug, Clone)]
pub struct DerivedLayer {
    pub kind: LayerKind,
    pub raster: RasterBuf,
}

impl DerivedLayer {
    pub fn new(kind: LayerKind, raster: RasterBuf) -> Self {
        Self { kind, raster }
    }

    /// Fraction of finite pixels that fall outside the layer's valid range.
    pub fn out_of_range_fraction(&self) -> f64 {
        let (lo, hi) = self.kind.valid_range();
        let mut finite = 0usize;
        let mut outside = 0usize;
        for &v in &self.raster.data {
            if v.is_finite() {
                finite += 1;
                if v < lo || v > hi {
                    outside += 1;
                }
            }
        }
        if finite == 0 {
            0.0
        } else {
            outside as f64 / finite as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_suffixes_are_distinct() {
        let kinds = [
            LayerKind::Ndvi,
            LayerKind::ProportionOfVegetation,
            LayerKind::Emissivity,
            LayerKind::BrightnessTemperature,
            LayerKind::Lst,
        ];
        for (i, a) in kinds.iter().enumerate() {
            for b in kinds.iter().skip(i + 1) {
                assert_ne!(a.file_suffix(), b.file_suffix());
            }
        }
    }

    #[test]
    fn test_valid_ranges_ordered() {
        for kind in [
            LayerKind::Ndvi,
            LayerKind::ProportionOfVegetation,
            LayerKind::Emissivity,
            LayerKind::BrightnessTemperature,
            LayerKind::Lst,
        ] {
            let (lo, hi) = kind.valid_range();
            assert!(lo < hi);
        }
    }

    #[test]
    fn test_out_of_range_fraction_ignores_nan() {
        let raster = RasterBuf::new(vec![0.5, -2.0, f64::NAN, 0.0], 2, 2);
        let layer = DerivedLayer::new(LayerKind::Ndvi, raster);
        // 3 finite pixels, 1 outside [-1, 1]
        assert!((layer.out_of_range_fraction() - 1.0 / 3.0).abs() < 1e-12);
    }
}
