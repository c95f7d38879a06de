//! Per-scene processing.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use band_algebra::{
    brightness_temperature, check_output_domain, emissivity_from_ndvi, lst_celsius, ndvi,
    proportion_of_vegetation, spectral_radiance, toa_reflectance, EngineOptions,
};
use lst_common::{DerivedLayer, GeoReference, LayerKind, LstError, LstResult, RasterBuf};
use mtl_parser::{
    detect_sensor, find_band_file, find_band_file_any, find_mtl_file, SceneMetadata, SensorProfile,
};
use raster_io::RasterStore;

use crate::config::OutputSelection;
use crate::summary::{LayerStats, SceneOutcome, SceneResult, Stage};

/// Drives one scene through the pipeline.
///
/// Holds no per-scene state, so one processor can be shared across worker
/// threads in parallel batch mode.
pub struct SceneProcessor<'a> {
    store: &'a dyn RasterStore,
    outputs: OutputSelection,
    thermal_band: Option<u8>,
    engine: EngineOptions,
}

/// Everything derived for one scene, before writing.
struct ComputedLayers {
    ndvi: DerivedLayer,
    emissivity: DerivedLayer,
    brightness_temp: DerivedLayer,
    lst: DerivedLayer,
    geo: GeoReference,
}

impl<'a> SceneProcessor<'a> {
    pub fn new(
        store: &'a dyn RasterStore,
        outputs: OutputSelection,
        thermal_band: Option<u8>,
        engine: EngineOptions,
    ) -> Self {
        Self {
            store,
            outputs,
            thermal_band,
            engine,
        }
    }

    /// Process one scene folder end-to-end. Never panics and never returns
    /// an error: any failure is folded into the returned [`SceneResult`].
    pub fn process(&self, scene_dir: &Path, output_dir: &Path) -> SceneResult {
        let folder = scene_dir
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("scene")
            .to_string();

        info!(scene = %folder, "Processing scene folder");

        match self.run(scene_dir, output_dir, &folder) {
            Ok(outcome) => {
                info!(scene = %folder, "Scene finished");
                SceneResult { folder, outcome }
            }
            Err((stage, error)) => {
                info!(scene = %folder, stage = %stage, error = %error, "Scene failed");
                SceneResult::failed(folder, stage, &error)
            }
        }
    }

    fn run(
        &self,
        scene_dir: &Path,
        output_dir: &Path,
        folder: &str,
    ) -> Result<SceneOutcome, (Stage, LstError)> {
        // Locate
        let mtl_path = find_mtl_file(scene_dir).map_err(|e| (Stage::Locate, e))?;
        debug!(mtl = %mtl_path.display(), "Found MTL file");

        // ParseMetadata
        let meta = SceneMetadata::from_file(&mtl_path).map_err(|e| (Stage::ParseMetadata, e))?;

        // ResolveProfile
        let sensor = detect_sensor(&meta).map_err(|e| (Stage::ResolveProfile, e))?;
        let profile = SensorProfile::for_sensor(sensor);
        let thermal = profile.thermal_band(self.thermal_band);
        info!(
            sensor = %sensor,
            thermal_band = thermal.number,
            "Resolved sensor profile"
        );

        // LoadBands
        let (red_dn, nir_dn, thermal_dn, geo) = self
            .load_bands(scene_dir, profile, thermal)
            .map_err(|e| (Stage::LoadBands, e))?;

        // Compute
        let layers = self
            .compute(&meta, profile, thermal, &red_dn, &nir_dn, &thermal_dn, geo)
            .map_err(|e| (Stage::Compute, e))?;

        // Write
        let scene_id = scene_identifier(&meta, folder);
        let written = self
            .write_outputs(&layers, &scene_id, output_dir)
            .map_err(|e| (Stage::Write, e))?;

        let lst_stats = LayerStats::from_raster(&layers.lst.raster);
        Ok(SceneOutcome::Success {
            scene_id,
            sensor: sensor.to_string(),
            written,
            lst_stats,
        })
    }

    fn load_bands(
        &self,
        scene_dir: &Path,
        profile: &SensorProfile,
        thermal: &mtl_parser::ThermalBand,
    ) -> LstResult<(RasterBuf, RasterBuf, RasterBuf, GeoReference)> {
        let red_path = find_band_file(scene_dir, &profile.red_file_suffix())?;
        let nir_path = find_band_file(scene_dir, &profile.nir_file_suffix())?;
        let thermal_path = find_band_file_any(scene_dir, thermal.file_suffixes)?;

        // Geo reference comes from the thermal band, per the output contract
        let (thermal_dn, geo) = self.store.read_band_with_geo(&thermal_path)?;
        let red_dn = self.store.read_band(&red_path)?;
        let nir_dn = self.store.read_band(&nir_path)?;

        thermal_dn.check_same_shape(&red_dn, &format!("B{}", profile.red_band))?;
        thermal_dn.check_same_shape(&nir_dn, &format!("B{}", profile.nir_band))?;

        Ok((red_dn, nir_dn, thermal_dn, geo))
    }

    #[allow(clippy::too_many_arguments)]
    fn compute(
        &self,
        meta: &SceneMetadata,
        profile: &SensorProfile,
        thermal: &mtl_parser::ThermalBand,
        red_dn: &RasterBuf,
        nir_dn: &RasterBuf,
        thermal_dn: &RasterBuf,
        geo: GeoReference,
    ) -> LstResult<ComputedLayers> {
        let sun_elevation = meta.get_f64("SUN_ELEVATION")?;

        let rad_gain = meta.get_f64(&format!("RADIANCE_MULT_BAND_{}", thermal.key_suffix))?;
        let rad_bias = meta.get_f64(&format!("RADIANCE_ADD_BAND_{}", thermal.key_suffix))?;
        // MTL calibration constants win over the published defaults
        let k1 = meta.get_f64_or(
            &format!("K1_CONSTANT_BAND_{}", thermal.key_suffix),
            thermal.default_k1,
        )?;
        let k2 = meta.get_f64_or(
            &format!("K2_CONSTANT_BAND_{}", thermal.key_suffix),
            thermal.default_k2,
        )?;

        // Collection-1 MTLs omit reflectance rescaling for some bands. The
        // identity fallback leaves reflectance in DN units, which the NDVI
        // ratio normalizes; still worth flagging in the log.
        if meta
            .get(&format!("REFLECTANCE_MULT_BAND_{}", profile.red_band))
            .is_none()
            || meta
                .get(&format!("REFLECTANCE_MULT_BAND_{}", profile.nir_band))
                .is_none()
        {
            warn!(
                red_band = profile.red_band,
                nir_band = profile.nir_band,
                "Reflectance rescaling keys absent, computing NDVI from raw digital numbers"
            );
        }
        let refl_gain_red =
            meta.get_f64_or(&format!("REFLECTANCE_MULT_BAND_{}", profile.red_band), 1.0)?;
        let refl_bias_red =
            meta.get_f64_or(&format!("REFLECTANCE_ADD_BAND_{}", profile.red_band), 0.0)?;
        let refl_gain_nir =
            meta.get_f64_or(&format!("REFLECTANCE_MULT_BAND_{}", profile.nir_band), 1.0)?;
        let refl_bias_nir =
            meta.get_f64_or(&format!("REFLECTANCE_ADD_BAND_{}", profile.nir_band), 0.0)?;

        let red = toa_reflectance(red_dn, refl_gain_red, refl_bias_red, sun_elevation)?;
        let nir = toa_reflectance(nir_dn, refl_gain_nir, refl_bias_nir, sun_elevation)?;

        let ndvi_raster = ndvi(&red, &nir)?;
        let ndvi_layer = DerivedLayer::new(LayerKind::Ndvi, ndvi_raster);
        check_output_domain(&ndvi_layer, &self.engine)?;

        let pv = proportion_of_vegetation(&ndvi_layer.raster, &profile.emissivity);
        let pv_layer = DerivedLayer::new(LayerKind::ProportionOfVegetation, pv);
        check_output_domain(&pv_layer, &self.engine)?;

        let eps = emissivity_from_ndvi(&ndvi_layer.raster, &profile.emissivity);
        let eps_layer = DerivedLayer::new(LayerKind::Emissivity, eps);
        check_output_domain(&eps_layer, &self.engine)?;

        let radiance = spectral_radiance(thermal_dn, rad_gain, rad_bias);
        let bt = brightness_temperature(&radiance, k1, k2);
        let bt_layer = DerivedLayer::new(LayerKind::BrightnessTemperature, bt);
        check_output_domain(&bt_layer, &self.engine)?;

        let lst = lst_celsius(&bt_layer.raster, &eps_layer.raster, thermal.wavelength_m)?;
        let lst_layer = DerivedLayer::new(LayerKind::Lst, lst);
        check_output_domain(&lst_layer, &self.engine)?;

        Ok(ComputedLayers {
            ndvi: ndvi_layer,
            emissivity: eps_layer,
            brightness_temp: bt_layer,
            lst: lst_layer,
            geo,
        })
    }

    fn write_outputs(
        &self,
        layers: &ComputedLayers,
        scene_id: &str,
        output_dir: &Path,
    ) -> LstResult<Vec<PathBuf>> {
        let mut written = Vec::new();

        let mut write = |layer: &DerivedLayer| -> LstResult<()> {
            let path = output_path(output_dir, scene_id, layer.kind);
            self.store.write_raster(&path, &layer.raster, &layers.geo)?;
            debug!(path = %path.display(), layer = %layer.kind, "Wrote output raster");
            written.push(path);
            Ok(())
        };

        // LST is unconditional; intermediates only on request
        write(&layers.lst)?;
        if self.outputs.ndvi {
            write(&layers.ndvi)?;
        }
        if self.outputs.emissivity {
            write(&layers.emissivity)?;
        }
        if self.outputs.brightness_temp {
            write(&layers.brightness_temp)?;
        }

        Ok(written)
    }
}

/// Deterministic output path for a scene's derived layer.
pub fn output_path(output_dir: &Path, scene_id: &str, kind: LayerKind) -> PathBuf {
    output_dir.join(format!("{}_{}.tif", scene_id, kind.file_suffix()))
}

/// Scene identifier used for output naming, falling back from scene id to
/// product id to the folder name.
fn scene_identifier(meta: &SceneMetadata, folder: &str) -> String {
    meta.get("LANDSAT_SCENE_ID")
        .or_else(|| meta.get("LANDSAT_PRODUCT_ID"))
        .unwrap_or(folder)
        .to_string()
}
