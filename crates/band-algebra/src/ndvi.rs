//! TOA reflectance conversion and NDVI.

use lst_common::{LstError, LstResult, RasterBuf};

/// Convert digital numbers to top-of-atmosphere reflectance.
///
/// `rho = (dn * gain + bias) / sin(sun_elevation)`. Values are left
/// unclamped: when the rescaling coefficients are absent and the identity
/// fallback feeds raw digital numbers through, the NDVI ratio still
/// normalizes, whereas a unit clamp here would saturate every pixel and
/// flatten NDVI to zero. The sun-elevation term cancels in the ratio but
/// keeps the intermediate physically meaningful.
pub fn toa_reflectance(
    dn: &RasterBuf,
    gain: f64,
    bias: f64,
    sun_elevation_deg: f64,
) -> LstResult<RasterBuf> {
    if !(0.0..=90.0).contains(&sun_elevation_deg) || sun_elevation_deg == 0.0 {
        return Err(LstError::ComputationOutOfDomain(format!(
            "sun elevation {} degrees outside (0, 90]",
            sun_elevation_deg
        )));
    }
    let inv_sin = 1.0 / sun_elevation_deg.to_radians().sin();

    let data = dn
        .data
        .iter()
        .map(|&v| (v * gain + bias) * inv_sin)
        .collect();
    Ok(RasterBuf::new(data, dn.width, dn.height))
}

/// Normalized Difference Vegetation Index.
///
/// `(nir - red) / (nir + red)` per pixel, clamped to [-1, 1] since this is
/// a published layer. A zero denominator produces the NaN sentinel instead
/// of propagating an infinity.
pub fn ndvi(red: &RasterBuf, nir: &RasterBuf) -> LstResult<RasterBuf> {
    red.check_same_shape(nir, "NIR")?;

    let data = red
        .data
        .iter()
        .zip(&nir.data)
        .map(|(&r, &n)| {
            let sum = n + r;
            if sum == 0.0 {
                f64::NAN
            } else {
                ((n - r) / sum).clamp(-1.0, 1.0)
            }
        })
        .collect();
    Ok(RasterBuf::new(data, red.width, red.height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflectance_applies_gain_bias_and_sun_angle() {
        let dn = RasterBuf::new(vec![10000.0], 1, 1);
        // 90 degrees: sin = 1, no elevation correction
        let refl = toa_reflectance(&dn, 2.0e-5, -0.1, 90.0).unwrap();
        assert!((refl.data[0] - 0.1).abs() < 1e-12);

        // 30 degrees: sin = 0.5, doubles the reflectance
        let refl = toa_reflectance(&dn, 2.0e-5, -0.1, 30.0).unwrap();
        assert!((refl.data[0] - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_reflectance_is_not_clamped() {
        // Identity coefficients pass raw digital numbers through; the
        // magnitudes must survive so the NDVI ratio can normalize them.
        let dn = RasterBuf::new(vec![8000.0, 22000.0], 2, 1);
        let refl = toa_reflectance(&dn, 1.0, 0.0, 90.0).unwrap();
        assert!((refl.data[0] - 8000.0).abs() < 1e-9);
        assert!((refl.data[1] - 22000.0).abs() < 1e-9);
    }

    #[test]
    fn test_ndvi_from_raw_digital_numbers() {
        // Rescaling keys absent: gain/bias fall back to 1/0 and reflectance
        // stays in DN units. NDVI must still normalize, not flatten to zero.
        let red_dn = RasterBuf::new(vec![2000.0, 8000.0], 2, 1);
        let nir_dn = RasterBuf::new(vec![5000.0, 24000.0], 2, 1);
        let red = toa_reflectance(&red_dn, 1.0, 0.0, 60.0).unwrap();
        let nir = toa_reflectance(&nir_dn, 1.0, 0.0, 60.0).unwrap();

        let out = ndvi(&red, &nir).unwrap();
        assert!((out.data[0] - 3000.0 / 7000.0).abs() < 1e-12);
        assert!((out.data[1] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_ndvi_output_clamped_to_unit_range() {
        // A negative reflectance (bias overshoot) can push the raw ratio
        // outside [-1, 1]; the published layer is clamped.
        // (0.01 - (-0.05)) / (0.01 + (-0.05)) = -1.5 before the clamp
        let red = RasterBuf::new(vec![-0.05], 1, 1);
        let nir = RasterBuf::new(vec![0.01], 1, 1);
        let out = ndvi(&red, &nir).unwrap();
        assert_eq!(out.data[0], -1.0);
    }

    #[test]
    fn test_reflectance_rejects_bad_sun_elevation() {
        let dn = RasterBuf::filled(1, 1, 1.0);
        for bad in [0.0, -10.0, 91.0] {
            let err = toa_reflectance(&dn, 1.0, 0.0, bad).unwrap_err();
            assert_eq!(err.kind(), "ComputationOutOfDomain");
        }
    }

    #[test]
    fn test_ndvi_in_unit_range() {
        let red = RasterBuf::new(vec![0.1, 0.4, 0.05], 3, 1);
        let nir = RasterBuf::new(vec![0.5, 0.2, 0.05], 3, 1);
        let out = ndvi(&red, &nir).unwrap();
        for &v in &out.data {
            assert!((-1.0..=1.0).contains(&v));
        }
        assert!((out.data[0] - (0.4 / 0.6)).abs() < 1e-12);
    }

    #[test]
    fn test_ndvi_zero_denominator_is_nan() {
        let red = RasterBuf::new(vec![0.0, 0.3, -0.2], 3, 1);
        let nir = RasterBuf::new(vec![0.0, 0.3, 0.2], 3, 1);
        let out = ndvi(&red, &nir).unwrap();
        assert!(out.data[0].is_nan());
        assert!(!out.data[1].is_nan());
        assert!(out.data[2].is_nan());
    }

    #[test]
    fn test_ndvi_equal_bands_is_zero() {
        let band = RasterBuf::new((1..=9).map(|i| i as f64 * 0.05).collect(), 3, 3);
        let out = ndvi(&band, &band).unwrap();
        for &v in &out.data {
            assert!(v.abs() < 1e-12);
        }
    }

    #[test]
    fn test_ndvi_shape_mismatch() {
        let red = RasterBuf::filled(2, 2, 0.1);
        let nir = RasterBuf::filled(3, 2, 0.5);
        let err = ndvi(&red, &nir).unwrap_err();
        assert_eq!(err.kind(), "BandShapeMismatch");
    }
}
