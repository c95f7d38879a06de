//! Per-stage output domain validation.

use tracing::warn;

use lst_common::{DerivedLayer, LstError, LstResult};

/// Tuning knobs for the algebra engine.
#[derive(Debug, Clone, Copy)]
pub struct EngineOptions {
    /// Fraction of finite pixels allowed outside a layer's valid range
    /// before the engine complains. Realistic scenes carry cloud and
    /// fill-value noise, so the default is permissive.
    pub out_of_domain_warn_fraction: f64,
    /// When set, exceeding the fraction is a hard `ComputationOutOfDomain`
    /// failure instead of a warning.
    pub strict: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            out_of_domain_warn_fraction: 0.2,
            strict: false,
        }
    }
}

/// Validate a derived layer against its kind's valid range before it feeds
/// the next stage.
///
/// Exceeding the configured fraction is a warning by default and a hard
/// failure in strict mode.
pub fn check_output_domain(layer: &DerivedLayer, options: &EngineOptions) -> LstResult<()> {
    let fraction = layer.out_of_range_fraction();
    if fraction <= options.out_of_domain_warn_fraction {
        return Ok(());
    }

    let (lo, hi) = layer.kind.valid_range();
    if options.strict {
        return Err(LstError::ComputationOutOfDomain(format!(
            "{}: {:.1}% of pixels outside [{}, {}]",
            layer.kind,
            fraction * 100.0,
            lo,
            hi
        )));
    }

    warn!(
        layer = %layer.kind,
        out_of_range_pct = format!("{:.1}", fraction * 100.0),
        lo,
        hi,
        "Derived layer has an unusual share of out-of-range pixels"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lst_common::{LayerKind, RasterBuf};

    #[test]
    fn test_in_range_layer_passes() {
        let layer = DerivedLayer::new(LayerKind::Ndvi, RasterBuf::filled(4, 4, 0.3));
        assert!(check_output_domain(&layer, &EngineOptions::default()).is_ok());
    }

    #[test]
    fn test_noisy_layer_warns_but_passes() {
        // Half the pixels out of range: above the default 20% threshold
        let mut data = vec![0.3; 8];
        data.extend(vec![5.0; 8]);
        let layer = DerivedLayer::new(LayerKind::Ndvi, RasterBuf::new(data, 4, 4));
        assert!(check_output_domain(&layer, &EngineOptions::default()).is_ok());
    }

    #[test]
    fn test_strict_mode_fails() {
        let mut data = vec![0.3; 8];
        data.extend(vec![5.0; 8]);
        let layer = DerivedLayer::new(LayerKind::Ndvi, RasterBuf::new(data, 4, 4));
        let options = EngineOptions {
            strict: true,
            ..Default::default()
        };
        let err = check_output_domain(&layer, &options).unwrap_err();
        assert_eq!(err.kind(), "ComputationOutOfDomain");
    }

    #[test]
    fn test_nan_pixels_do_not_count_against_range() {
        let data = vec![f64::NAN; 15]
            .into_iter()
            .chain(std::iter::once(0.5))
            .collect();
        let layer = DerivedLayer::new(LayerKind::Ndvi, RasterBuf::new(data, 4, 4));
        assert!(check_output_domain(&layer, &EngineOptions::default()).is_ok());
    }
}
