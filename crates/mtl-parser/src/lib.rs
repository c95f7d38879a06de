//! Landsat Collection-2 MTL metadata parsing and sensor resolution.
//!
//! This crate normalizes the heterogeneous metadata and band-naming schemes
//! of Landsat 7 (ETM+), Landsat 8 (OLI/TIRS) and Landsat 9 (OLI-2/TIRS-2)
//! into a single [`SensorProfile`] consumed by the band algebra engine.

pub mod mtl;
pub mod scene_files;
pub mod sensor;

pub use mtl::SceneMetadata;
pub use scene_files::{find_band_file, find_band_file_any, find_mtl_file};
pub use sensor::{
    detect_sensor, EmissivityCoefficients, Sensor, SensorProfile, ThermalBand,
};
