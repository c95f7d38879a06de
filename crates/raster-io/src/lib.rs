//! Raster I/O collaborator for the LST pipeline.
//!
//! Reads per-band GeoTIFFs into [`RasterBuf`]s and writes derived layers
//! back out, copying the geo-referencing tags of the input thermal band
//! unchanged. The pipeline talks to the [`RasterStore`] trait so tests can
//! substitute in-memory rasters.

pub mod geotiff;

use std::path::Path;

use lst_common::{GeoReference, LstResult, RasterBuf};

pub use geotiff::GeoTiffStore;

/// Seam between the pipeline and raster storage.
pub trait RasterStore: Send + Sync {
    /// Read a band raster as pixel values.
    fn read_band(&self, path: &Path) -> LstResult<RasterBuf>;

    /// Read a band raster together with its geo-referencing tags.
    fn read_band_with_geo(&self, path: &Path) -> LstResult<(RasterBuf, GeoReference)>;

    /// Write a derived raster, attaching the given geo-referencing tags.
    fn write_raster(&self, path: &Path, raster: &RasterBuf, geo: &GeoReference) -> LstResult<()>;
}
