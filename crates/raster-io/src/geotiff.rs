//! GeoTIFF implementation of [`RasterStore`] built on the `tiff` crate.
//!
//! Outputs are single-band 32-bit float TIFFs. Geo-referencing is carried as
//! opaque tag payloads (pixel scale, tiepoints, projection keys); the toolkit
//! never interprets them, it only copies them from the thermal input band.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::encoder::{colortype, TiffEncoder};
use tiff::tags::Tag;
use tracing::debug;

use lst_common::{GeoReference, LstError, LstResult, RasterBuf};

use crate::RasterStore;

const TAG_MODEL_PIXEL_SCALE: u16 = 33550;
const TAG_MODEL_TIEPOINT: u16 = 33922;
const TAG_MODEL_TRANSFORMATION: u16 = 34264;
const TAG_GEO_KEY_DIRECTORY: u16 = 34735;
const TAG_GEO_DOUBLE_PARAMS: u16 = 34736;
const TAG_GEO_ASCII_PARAMS: u16 = 34737;
/// GDAL's nodata convention, written so downstream tools mask NaN pixels.
const TAG_GDAL_NODATA: u16 = 42113;

/// Filesystem-backed GeoTIFF store.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoTiffStore;

impl GeoTiffStore {
    pub fn new() -> Self {
        Self
    }
}

impl RasterStore for GeoTiffStore {
    fn read_band(&self, path: &Path) -> LstResult<RasterBuf> {
        let mut decoder = open_decoder(path)?;
        read_pixels(&mut decoder, path)
    }

    fn read_band_with_geo(&self, path: &Path) -> LstResult<(RasterBuf, GeoReference)> {
        let mut decoder = open_decoder(path)?;
        let geo = read_geo_tags(&mut decoder);
        let raster = read_pixels(&mut decoder, path)?;
        Ok((raster, geo))
    }

    fn write_raster(&self, path: &Path, raster: &RasterBuf, geo: &GeoReference) -> LstResult<()> {
        let file = File::create(path)
            .map_err(|e| LstError::OutputWriteFailed(format!("{}: {}", path.display(), e)))?;
        let mut encoder = TiffEncoder::new(BufWriter::new(file))
            .map_err(|e| LstError::OutputWriteFailed(format!("{}: {}", path.display(), e)))?;

        let mut image = encoder
            .new_image::<colortype::Gray32Float>(raster.width as u32, raster.height as u32)
            .map_err(|e| LstError::OutputWriteFailed(format!("{}: {}", path.display(), e)))?;

        write_geo_tags(&mut image, geo, path)?;

        let pixels: Vec<f32> = raster.data.iter().map(|&v| v as f32).collect();
        image
            .write_data(&pixels)
            .map_err(|e| LstError::OutputWriteFailed(format!("{}: {}", path.display(), e)))?;
        Ok(())
    }
}

fn open_decoder(path: &Path) -> LstResult<Decoder<BufReader<File>>> {
    let file = File::open(path)
        .map_err(|e| LstError::RasterReadFailed(format!("{}: {}", path.display(), e)))?;
    let decoder = Decoder::new(BufReader::new(file))
        .map_err(|e| LstError::RasterReadFailed(format!("{}: {}", path.display(), e)))?;
    Ok(decoder.with_limits(Limits::unlimited()))
}

fn read_pixels(decoder: &mut Decoder<BufReader<File>>, path: &Path) -> LstResult<RasterBuf> {
    let (width, height) = decoder
        .dimensions()
        .map_err(|e| LstError::RasterReadFailed(format!("{}: {}", path.display(), e)))?;

    let result = decoder
        .read_image()
        .map_err(|e| LstError::RasterReadFailed(format!("{}: {}", path.display(), e)))?;

    let data: Vec<f64> = match result {
        DecodingResult::U8(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::U16(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::U32(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::U64(v) => v.into_iter().map(|x| x as f64).collect(),
        DecodingResult::I8(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::I16(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::I32(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::I64(v) => v.into_iter().map(|x| x as f64).collect(),
        DecodingResult::F32(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::F64(v) => v,
    };

    let expected = width as usize * height as usize;
    if data.len() != expected {
        return Err(LstError::RasterReadFailed(format!(
            "{}: decoded {} samples for a {}x{} image (multi-band input?)",
            path.display(),
            data.len(),
            width,
            height
        )));
    }

    Ok(RasterBuf::new(data, width as usize, height as usize))
}

fn read_geo_tags(decoder: &mut Decoder<BufReader<File>>) -> GeoReference {
    let geo = GeoReference {
        pixel_scale: tag_f64s(decoder, TAG_MODEL_PIXEL_SCALE),
        tiepoints: tag_f64s(decoder, TAG_MODEL_TIEPOINT),
        transformation: tag_f64s(decoder, TAG_MODEL_TRANSFORMATION),
        key_directory: tag_u16s(decoder, TAG_GEO_KEY_DIRECTORY),
        double_params: tag_f64s(decoder, TAG_GEO_DOUBLE_PARAMS),
        ascii_params: tag_string(decoder, TAG_GEO_ASCII_PARAMS),
    };
    if geo.is_empty() {
        debug!("No geo-referencing tags on input band");
    }
    geo
}

fn tag_f64s(decoder: &mut Decoder<BufReader<File>>, id: u16) -> Option<Vec<f64>> {
    decoder
        .find_tag(Tag::from_u16_exhaustive(id))
        .ok()
        .flatten()
        .and_then(|v| v.into_f64_vec().ok())
}

fn tag_u16s(decoder: &mut Decoder<BufReader<File>>, id: u16) -> Option<Vec<u16>> {
    decoder
        .find_tag(Tag::from_u16_exhaustive(id))
        .ok()
        .flatten()
        .and_then(|v| v.into_u16_vec().ok())
}

fn tag_string(decoder: &mut Decoder<BufReader<File>>, id: u16) -> Option<String> {
    decoder
        .find_tag(Tag::from_u16_exhaustive(id))
        .ok()
        .flatten()
        .and_then(|v| v.into_string().ok())
}

fn write_geo_tags<W, C, K>(
    image: &mut tiff::encoder::ImageEncoder<'_, W, C, K>,
    geo: &GeoReference,
    path: &Path,
) -> LstResult<()>
where
    W: std::io::Write + std::io::Seek,
    C: colortype::ColorType,
    K: tiff::encoder::TiffKind,
{
    let wrap = |e: tiff::TiffError| {
        LstError::OutputWriteFailed(format!("{}: geo tag: {}", path.display(), e))
    };

    if let Some(scale) = &geo.pixel_scale {
        image
            .encoder()
            .write_tag(Tag::Unknown(TAG_MODEL_PIXEL_SCALE), &scale[..])
            .map_err(wrap)?;
    }
    if let Some(tiepoints) = &geo.tiepoints {
        image
            .encoder()
            .write_tag(Tag::Unknown(TAG_MODEL_TIEPOINT), &tiepoints[..])
            .map_err(wrap)?;
    }
    if let Some(transformation) = &geo.transformation {
        image
            .encoder()
            .write_tag(Tag::Unknown(TAG_MODEL_TRANSFORMATION), &transformation[..])
            .map_err(wrap)?;
    }
    if let Some(keys) = &geo.key_directory {
        image
            .encoder()
            .write_tag(Tag::Unknown(TAG_GEO_KEY_DIRECTORY), &keys[..])
            .map_err(wrap)?;
    }
    if let Some(doubles) = &geo.double_params {
        image
            .encoder()
            .write_tag(Tag::Unknown(TAG_GEO_DOUBLE_PARAMS), &doubles[..])
            .map_err(wrap)?;
    }
    if let Some(ascii) = &geo.ascii_params {
        image
            .encoder()
            .write_tag(Tag::Unknown(TAG_GEO_ASCII_PARAMS), ascii.as_str())
            .map_err(wrap)?;
    }
    image
        .encoder()
        .write_tag(Tag::Unknown(TAG_GDAL_NODATA), "nan")
        .map_err(wrap)?;

    Ok(())
}
