//! Proportion of vegetation and NDVI-threshold emissivity.

use lst_common::RasterBuf;
use mtl_parser::EmissivityCoefficients;

/// Proportion of vegetation at one pixel.
///
/// Squared ratio between the soil and vegetation NDVI thresholds, clamped
/// to [0, 1]. NaN NDVI stays NaN.
pub fn pv_at(ndvi: f64, coeffs: &EmissivityCoefficients) -> f64 {
    if ndvi.is_nan() {
        return f64::NAN;
    }
    let ratio = (ndvi - coeffs.ndvi_soil) / (coeffs.ndvi_veg - coeffs.ndvi_soil);
    (ratio * ratio).clamp(0.0, 1.0)
}

/// Proportion of vegetation over a raster.
pub fn proportion_of_vegetation(ndvi: &RasterBuf, coeffs: &EmissivityCoefficients) -> RasterBuf {
    let data = ndvi.data.iter().map(|&v| pv_at(v, coeffs)).collect();
    RasterBuf::new(data, ndvi.width, ndvi.height)
}

/// Emissivity at one pixel.
///
/// Piecewise in strictly increasing NDVI order with no overlap:
/// below the soil threshold the bare-soil value applies, at or above the
/// vegetation threshold the vegetation value applies, and the half-open
/// range in between blends via the proportion of vegetation. The final
/// value is clamped to the coefficient set's bounds.
pub fn emissivity_at(ndvi: f64, coeffs: &EmissivityCoefficients) -> f64 {
    if ndvi.is_nan() {
        return f64::NAN;
    }
    let eps = if ndvi < coeffs.ndvi_soil {
        coeffs.soil
    } else if ndvi < coeffs.ndvi_veg {
        coeffs.mixed_scale * pv_at(ndvi, coeffs) + coeffs.mixed_offset
    } else {
        coeffs.vegetation
    };
    eps.clamp(coeffs.clamp_min, coeffs.clamp_max)
}

/// Emissivity over a raster.
pub fn emissivity_from_ndvi(ndvi: &RasterBuf, coeffs: &EmissivityCoefficients) -> RasterBuf {
    let data = ndvi.data.iter().map(|&v| emissivity_at(v, coeffs)).collect();
    RasterBuf::new(data, ndvi.width, ndvi.height)
}
