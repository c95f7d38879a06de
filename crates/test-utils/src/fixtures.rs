//! Scene folder fixtures.

use std::fs;
use std::path::{Path, PathBuf};

use lst_common::{GeoReference, RasterBuf};
use raster_io::{GeoTiffStore, RasterStore};

use crate::generators::{constant_band, gradient_band};

/// Landsat 8 MTL skeleton with the published band-10 reference constants.
/// `{scene_id}` is substituted by [`SceneFixture::write_default_mtl`].
pub const L8_MTL_TEMPLATE: &str = r#"GROUP = LANDSAT_METADATA_FILE
  GROUP = IMAGE_ATTRIBUTES
    SPACECRAFT_ID = "LANDSAT_8"
    LANDSAT_SCENE_ID = "{scene_id}"
    SUN_ELEVATION = 60.0
  END_GROUP = IMAGE_ATTRIBUTES
  GROUP = LEVEL1_RADIOMETRIC_RESCALING
    RADIANCE_MULT_BAND_10 = 3.3420E-04
    RADIANCE_ADD_BAND_10 = 0.10000
    REFLECTANCE_MULT_BAND_4 = 2.0000E-05
    REFLECTANCE_ADD_BAND_4 = -0.100000
    REFLECTANCE_MULT_BAND_5 = 2.0000E-05
    REFLECTANCE_ADD_BAND_5 = -0.100000
  END_GROUP = LEVEL1_RADIOMETRIC_RESCALING
  GROUP = LEVEL1_THERMAL_CONSTANTS
    K1_CONSTANT_BAND_10 = 774.8853
    K2_CONSTANT_BAND_10 = 1321.0789
  END_GROUP = LEVEL1_THERMAL_CONSTANTS
END_GROUP = LANDSAT_METADATA_FILE
END
"#;

/// A synthetic scene folder under a caller-owned root directory.
pub struct SceneFixture {
    pub dir: PathBuf,
    pub scene_id: String,
}

impl SceneFixture {
    /// Create an empty scene folder.
    pub fn new(root: &Path, folder: &str) -> Self {
        let dir = root.join(folder);
        fs::create_dir_all(&dir).expect("create scene folder");
        Self {
            dir,
            scene_id: folder.to_string(),
        }
    }

    /// Create a complete, well-formed Landsat 8 scene: MTL plus B4/B5/B10
    /// GeoTIFFs of the given size.
    pub fn landsat8(root: &Path, folder: &str, width: usize, height: usize) -> Self {
        let fixture = Self::new(root, folder);
        fixture.write_default_mtl();
        // Mid-range DNs: NIR brighter than RED, plausible thermal counts
        fixture.write_band("_B4.TIF", &gradient_band(width, height, 8000.0, 12000.0));
        fixture.write_band("_B5.TIF", &gradient_band(width, height, 15000.0, 25000.0));
        fixture.write_band("_B10.TIF", &constant_band(width, height, 30000.0));
        fixture
    }

    /// Write the default Landsat 8 MTL.
    pub fn write_default_mtl(&self) {
        self.write_mtl(&L8_MTL_TEMPLATE.replace("{scene_id}", &self.scene_id));
    }

    /// Write arbitrary MTL text.
    pub fn write_mtl(&self, text: &str) {
        fs::write(self.dir.join(format!("{}_MTL.txt", self.scene_id)), text)
            .expect("write MTL file");
    }

    /// Write a band GeoTIFF with a deterministic fake geo reference.
    pub fn write_band(&self, suffix: &str, raster: &RasterBuf) {
        let path = self.dir.join(format!("{}{}", self.scene_id, suffix));
        GeoTiffStore::new()
            .write_raster(&path, raster, &test_geo_reference())
            .expect("write band raster");
    }
}

/// Deterministic geo reference used by every fixture band.
pub fn test_geo_reference() -> GeoReference {
    GeoReference {
        pixel_scale: Some(vec![30.0, 30.0, 0.0]),
        tiepoints: Some(vec![0.0, 0.0, 0.0, 367785.0, 4186215.0, 0.0]),
        transformation: None,
        key_directory: Some(vec![1, 1, 0, 1, 3072, 0, 1, 32611]),
        double_params: None,
        ascii_params: None,
    }
}
