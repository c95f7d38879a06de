//! Spectral radiance, brightness temperature and LST.

use lst_common::{LstResult, RasterBuf};

/// Second radiation constant c2 in meter-Kelvin, used by the single-channel
/// emissivity correction.
pub const C2_WAVELENGTH_KELVIN: f64 = 1.4388e-2;

/// Convert thermal-band digital numbers to spectral radiance
/// (`L = dn * gain + bias`).
pub fn spectral_radiance(dn: &RasterBuf, gain: f64, bias: f64) -> RasterBuf {
    let data = dn.data.iter().map(|&v| v * gain + bias).collect();
    RasterBuf::new(data, dn.width, dn.height)
}

/// Brightness temperature at one pixel: the inverse-Planck form
/// `BT = K2 / ln(K1/L + 1)`.
///
/// Non-positive radiance is outside the physical domain and produces NaN.
pub fn brightness_temperature_at(radiance: f64, k1: f64, k2: f64) -> f64 {
    if !(radiance > 0.0) {
        return f64::NAN;
    }
    k2 / (k1 / radiance + 1.0).ln()
}

/// Brightness temperature (Kelvin) over a raster.
pub fn brightness_temperature(radiance: &RasterBuf, k1: f64, k2: f64) -> RasterBuf {
    let data = radiance
        .data
        .iter()
        .map(|&l| brightness_temperature_at(l, k1, k2))
        .collect();
    RasterBuf::new(data, radiance.width, radiance.height)
}

/// LST in Kelvin at one pixel via the single-channel correction
/// `BT / (1 + (lambda * BT / c2) * ln(emissivity))`.
pub fn lst_kelvin_at(bt_kelvin: f64, emissivity: f64, wavelength_m: f64) -> f64 {
    if !(emissivity > 0.0) {
        return f64::NAN;
    }
    bt_kelvin / (1.0 + (wavelength_m * bt_kelvin / C2_WAVELENGTH_KELVIN) * emissivity.ln())
}

/// LST in Celsius over a raster.
pub fn lst_celsius(
    bt_kelvin: &RasterBuf,
    emissivity: &RasterBuf,
    wavelength_m: f64,
) -> LstResult<RasterBuf> {
    bt_kelvin.check_same_shape(emissivity, "emissivity")?;

    let data = bt_kelvin
        .data
        .iter()
        .zip(&emissivity.data)
        .map(|(&bt, &eps)| lst_kelvin_at(bt, eps, wavelength_m) - 273.15)
        .collect();
    Ok(RasterBuf::new(data, bt_kelvin.width, bt_kelvin.height))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Landsat 8 band 10 reference constants
    const K1: f64 = 774.8853;
    const K2: f64 = 1321.0789;

    #[test]
    fn test_radiance_gain_bias() {
        let dn = RasterBuf::new(vec![0.0, 30000.0], 2, 1);
        let rad = spectral_radiance(&dn, 3.342e-4, 0.1);
        assert!((rad.data[0] - 0.1).abs() < 1e-12);
        assert!((rad.data[1] - (30000.0 * 3.342e-4 + 0.1)).abs() < 1e-12);
    }

    #[test]
    fn test_bt_matches_closed_form() {
        let radiance = 10.5;
        let expected = K2 / (K1 / radiance + 1.0).ln();
        let bt = brightness_temperature_at(radiance, K1, K2);
        assert!((bt - expected).abs() < 1e-6);
        // ~293K for a mid-range radiance: plausible Earth temperature
        assert!(bt > 250.0 && bt < 330.0);
    }

    #[test]
    fn test_bt_monotone_in_radiance() {
        let mut prev = f64::NEG_INFINITY;
        for i in 1..=100 {
            let l = i as f64 * 0.25;
            let bt = brightness_temperature_at(l, K1, K2);
            assert!(bt > prev, "BT must increase with radiance at L={}", l);
            prev = bt;
        }
    }

    #[test]
    fn test_bt_nonpositive_radiance_is_nan() {
        assert!(brightness_temperature_at(0.0, K1, K2).is_nan());
        assert!(brightness_temperature_at(-1.0, K1, K2).is_nan());
        assert!(brightness_temperature_at(f64::NAN, K1, K2).is_nan());
    }

    #[test]
    fn test_lst_exceeds_bt_for_subunity_emissivity() {
        // ln(eps) < 0 for eps < 1, so the correction lowers the denominator
        // below 1 and LST in Kelvin exceeds BT.
        let bt = 300.0;
        let lst_k = lst_kelvin_at(bt, 0.986, 10.895e-6);
        assert!(lst_k > bt);
        assert!(lst_k < bt + 5.0);
    }

    #[test]
    fn test_lst_unit_emissivity_is_identity() {
        let bt = 295.0;
        let lst_k = lst_kelvin_at(bt, 1.0, 10.895e-6);
        assert!((lst_k - bt).abs() < 1e-9);
    }

    #[test]
    fn test_lst_celsius_conversion_and_nan() {
        let bt = RasterBuf::new(vec![300.0, f64::NAN], 2, 1);
        let eps = RasterBuf::new(vec![1.0, 0.99], 2, 1);
        let lst = lst_celsius(&bt, &eps, 10.895e-6).unwrap();
        assert!((lst.data[0] - (300.0 - 273.15)).abs() < 1e-9);
        assert!(lst.data[1].is_nan());
    }

    #[test]
    fn test_lst_shape_mismatch() {
        let bt = RasterBuf::filled(2, 2, 300.0);
        let eps = RasterBuf::filled(2, 3, 0.99);
        assert!(lst_celsius(&bt, &eps, 10.895e-6).is_err());
    }
}
