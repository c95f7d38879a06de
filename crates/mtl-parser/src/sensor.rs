//! Sensor detection and fixed per-mission profiles.
//!
//! Band assignments, thermal calibration defaults and emissivity
//! coefficients differ per sensor generation and are hard-coded here, never
//! derived. Resolution is a literal identifier match against the USGS
//! spacecraft/scene identifiers; unknown identifiers are an error, never a
//! silent default.

use serde::{Deserialize, Serialize};
use tracing::warn;

use lst_common::{LstError, LstResult};

use crate::mtl::SceneMetadata;

/// Supported Landsat missions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sensor {
    /// Landsat 7 ETM+
    Landsat7,
    /// Landsat 8 OLI/TIRS
    Landsat8,
    /// Landsat 9 OLI-2/TIRS-2
    Landsat9,
}

impl std::fmt::Display for Sensor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sensor::Landsat7 => write!(f, "L7"),
            Sensor::Landsat8 => write!(f, "L8"),
            Sensor::Landsat9 => write!(f, "L9"),
        }
    }
}

/// One usable thermal band of a mission, with its MTL key suffix, the band
/// file suffixes to try in order, and published calibration defaults.
#[derive(Debug, Clone, Copy)]
pub struct ThermalBand {
    /// Band number as requested by the user (6, 10 or 11).
    pub number: u8,
    /// Suffix of the MTL keys for this band (e.g. `10`, `6_VCID_1`).
    pub key_suffix: &'static str,
    /// Band file suffixes, tried in order (L7 delivers `_B6_VCID_1.TIF`
    /// but some archives only carry `_B6.TIF`).
    pub file_suffixes: &'static [&'static str],
    /// Published K1 calibration constant (W/(m^2 sr um)), MTL overrides.
    pub default_k1: f64,
    /// Published K2 calibration constant (Kelvin), MTL overrides.
    pub default_k2: f64,
    /// Effective thermal wavelength in meters.
    pub wavelength_m: f64,
}

/// NDVI-threshold emissivity coefficient set.
///
/// The mixed-pixel blend `mixed_scale * Pv + mixed_offset` and its clamp
/// bounds come straight from the single-channel algorithm in use for
/// Collection-2 scenes; soil and vegetation branch values are the blend's
/// endpoints so the piecewise function is continuous.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmissivityCoefficients {
    /// NDVI below this is treated as bare soil.
    pub ndvi_soil: f64,
    /// NDVI at or above this is treated as full vegetation.
    pub ndvi_veg: f64,
    /// Emissivity of the bare-soil branch.
    pub soil: f64,
    /// Emissivity of the full-vegetation branch.
    pub vegetation: f64,
    /// Scale of the mixed-pixel blend in Pv.
    pub mixed_scale: f64,
    /// Offset of the mixed-pixel blend.
    pub mixed_offset: f64,
    /// Lower clamp applied to the final emissivity.
    pub clamp_min: f64,
    /// Upper clamp applied to the final emissivity.
    pub clamp_max: f64,
}

const COLLECTION2_EMISSIVITY: EmissivityCoefficients = EmissivityCoefficients {
    ndvi_soil: 0.2,
    ndvi_veg: 0.5,
    soil: 0.986,
    vegetation: 0.990,
    mixed_scale: 0.004,
    mixed_offset: 0.986,
    clamp_min: 0.97,
    clamp_max: 0.995,
};

/// Fixed per-mission profile: band assignments, thermal calibration and
/// emissivity coefficients.
#[derive(Debug, Clone, Copy)]
pub struct SensorProfile {
    pub sensor: Sensor,
    /// Band number of the RED reflectance band.
    pub red_band: u8,
    /// Band number of the NIR reflectance band.
    pub nir_band: u8,
    /// Usable thermal bands; the first entry is the default.
    pub thermal_bands: &'static [ThermalBand],
    pub emissivity: EmissivityCoefficients,
}

const L7_PROFILE: SensorProfile = SensorProfile {
    sensor: Sensor::Landsat7,
    red_band: 3,
    nir_band: 4,
    thermal_bands: &[ThermalBand {
        number: 6,
        key_suffix: "6_VCID_1",
        file_suffixes: &["_B6_VCID_1.TIF", "_B6.TIF"],
        default_k1: 666.09,
        default_k2: 1282.71,
        wavelength_m: 11.455e-6,
    }],
    emissivity: COLLECTION2_EMISSIVITY,
};

const L8_PROFILE: SensorProfile = SensorProfile {
    sensor: Sensor::Landsat8,
    red_band: 4,
    nir_band: 5,
    thermal_bands: &[
        ThermalBand {
            number: 10,
            key_suffix: "10",
            file_suffixes: &["_B10.TIF"],
            default_k1: 774.8853,
            default_k2: 1321.0789,
            wavelength_m: 10.895e-6,
        },
        ThermalBand {
            number: 11,
            key_suffix: "11",
            file_suffixes: &["_B11.TIF"],
            default_k1: 480.8883,
            default_k2: 1201.1442,
            wavelength_m: 12.0e-6,
        },
    ],
    emissivity: COLLECTION2_EMISSIVITY,
};

const L9_PROFILE: SensorProfile = SensorProfile {
    sensor: Sensor::Landsat9,
    red_band: 4,
    nir_band: 5,
    thermal_bands: &[
        ThermalBand {
            number: 10,
            key_suffix: "10",
            file_suffixes: &["_B10.TIF"],
            default_k1: 799.0284,
            default_k2: 1329.2405,
            wavelength_m: 10.895e-6,
        },
        ThermalBand {
            number: 11,
            key_suffix: "11",
            file_suffixes: &["_B11.TIF"],
            default_k1: 475.6581,
            default_k2: 1198.3494,
            wavelength_m: 12.0e-6,
        },
    ],
    emissivity: COLLECTION2_EMISSIVITY,
};

impl SensorProfile {
    /// Fixed lookup from a detected sensor.
    pub fn for_sensor(sensor: Sensor) -> &'static SensorProfile {
        match sensor {
            Sensor::Landsat7 => &L7_PROFILE,
            Sensor::Landsat8 => &L8_PROFILE,
            Sensor::Landsat9 => &L9_PROFILE,
        }
    }

    /// Pick the thermal band to use.
    ///
    /// An unavailable request falls back to the mission default with a
    /// warning rather than failing the scene.
    pub fn thermal_band(&self, requested: Option<u8>) -> &'static ThermalBand {
        let default = &self.thermal_bands[0];
        match requested {
            None => default,
            Some(n) => match self.thermal_bands.iter().find(|b| b.number == n) {
                Some(band) => band,
                None => {
                    warn!(
                        sensor = %self.sensor,
                        requested = n,
                        fallback = default.number,
                        "Requested thermal band not available for this mission"
                    );
                    default
                }
            },
        }
    }

    /// Band file suffix for the RED band (`_B4.TIF` style).
    pub fn red_file_suffix(&self) -> String {
        format!("_B{}.TIF", self.red_band)
    }

    /// Band file suffix for the NIR band.
    pub fn nir_file_suffix(&self) -> String {
        format!("_B{}.TIF", self.nir_band)
    }
}

/// Detect the mission from parsed MTL metadata.
///
/// `SPACECRAFT_ID` is authoritative; the scene identifier prefix is the
/// fallback for truncated metadata.
pub fn detect_sensor(meta: &SceneMetadata) -> LstResult<Sensor> {
    let spacecraft = meta.get("SPACECRAFT_ID").unwrap_or("").to_uppercase();
    if spacecraft.contains("LANDSAT_7") {
        return Ok(Sensor::Landsat7);
    }
    if spacecraft.contains("LANDSAT_8") {
        return Ok(Sensor::Landsat8);
    }
    if spacecraft.contains("LANDSAT_9") {
        return Ok(Sensor::Landsat9);
    }

    let scene = meta.get("LANDSAT_SCENE_ID").unwrap_or("").to_uppercase();
    if scene.starts_with("LE07") || scene.starts_with("LT07") {
        return Ok(Sensor::Landsat7);
    }
    if scene.starts_with("LC08") || scene.starts_with("LO08") {
        return Ok(Sensor::Landsat8);
    }
    if scene.starts_with("LC09") {
        return Ok(Sensor::Landsat9);
    }

    let shown = if !spacecraft.is_empty() {
        spacecraft
    } else if !scene.is_empty() {
        scene
    } else {
        "no SPACECRAFT_ID or LANDSAT_SCENE_ID".to_string()
    };
    Err(LstError::UnsupportedSensor(shown))
}
