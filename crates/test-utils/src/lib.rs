//! Shared test fixtures for the landsat-lst workspace.
//!
//! Generators for synthetic band grids and builders that lay out complete
//! Collection-2-shaped scene folders (MTL file plus band GeoTIFFs) in a
//! temporary directory.

pub mod fixtures;
pub mod generators;

pub use fixtures::{test_geo_reference, SceneFixture, L8_MTL_TEMPLATE};
pub use generators::{constant_band, gradient_band, ramp_band};
