//! Shared types for the Landsat LST toolkit.
//!
//! Home of the error taxonomy, the raster buffer type passed between the
//! parser, the band algebra engine and the writers, and the derived-layer
//! vocabulary.

pub mod error;
pub mod layer;
pub mod raster;

pub use error::{LstError, LstResult};
pub use layer::{DerivedLayer, LayerKind};
pub use raster::{GeoReference, RasterBuf};
