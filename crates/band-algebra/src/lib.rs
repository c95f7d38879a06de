//! Pure numeric band derivations.
//!
//! The chained derivation NDVI → proportion of vegetation → emissivity →
//! spectral radiance → brightness temperature → LST, as total functions over
//! matched-shape rasters. Undefined pixels (zero NDVI denominator,
//! non-positive radiance) become NaN sentinels, never infinities and never
//! panics, so cloud and fill-value noise flows through the chain without
//! crashing a scene.
//!
//! Scalar cores are exposed alongside the raster wrappers so the physics can
//! be tested against closed-form values.

pub mod emissivity;
pub mod ndvi;
pub mod thermal;
pub mod validate;

pub use emissivity::{emissivity_at, emissivity_from_ndvi, proportion_of_vegetation, pv_at};
pub use ndvi::{ndvi, toa_reflectance};
pub use thermal::{
    brightness_temperature, brightness_temperature_at, lst_celsius, lst_kelvin_at,
    spectral_radiance, C2_WAVELENGTH_KELVIN,
};
pub use validate::{check_output_domain, EngineOptions};
