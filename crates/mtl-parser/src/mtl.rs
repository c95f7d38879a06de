//! MTL metadata file parsing.
//!
//! Collection-2 MTL files are line-oriented `KEY = value` text. Lines that
//! do not split into a key/value pair (group markers, comments) are ignored;
//! absence of a *required* key is an error at lookup time.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use lst_common::{LstError, LstResult};

/// Parsed MTL metadata for one scene.
#[derive(Debug, Clone, Default)]
pub struct SceneMetadata {
    values: HashMap<String, String>,
}

impl SceneMetadata {
    /// Parse an MTL file from disk.
    pub fn from_file(path: &Path) -> LstResult<Self> {
        if !path.is_file() {
            return Err(LstError::MetadataNotFound(path.display().to_string()));
        }
        let text = fs::read_to_string(path).map_err(|e| {
            LstError::MetadataMalformed(format!("{}: {}", path.display(), e))
        })?;
        let meta = Self::from_str(&text);
        if meta.is_empty() {
            return Err(LstError::MetadataMalformed(format!(
                "{}: no key=value pairs found",
                path.display()
            )));
        }
        Ok(meta)
    }

    /// Parse MTL text. Values are trimmed of whitespace and surrounding
    /// double quotes.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(text: &str) -> Self {
        let mut values = HashMap::new();
        for line in text.lines() {
            if let Some((key, val)) = line.split_once('=') {
                let key = key.trim();
                if key.is_empty() || key == "GROUP" || key == "END_GROUP" {
                    continue;
                }
                let val = val.trim().trim_matches('"');
                values.insert(key.to_string(), val.to_string());
            }
        }
        Self { values }
    }

    /// Number of parsed keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when nothing was parsed.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Look up an optional string value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Look up a required string value.
    pub fn require(&self, key: &str) -> LstResult<&str> {
        self.get(key)
            .ok_or_else(|| LstError::MetadataMalformed(format!("missing required key {}", key)))
    }

    /// Look up a required numeric value.
    pub fn get_f64(&self, key: &str) -> LstResult<f64> {
        let raw = self.require(key)?;
        raw.parse::<f64>().map_err(|_| {
            LstError::MetadataMalformed(format!("key {} is not numeric: {:?}", key, raw))
        })
    }

    /// Look up an optional numeric value with a default.
    ///
    /// Present-but-unparseable is still an error; only absence falls back.
    pub fn get_f64_or(&self, key: &str, default: f64) -> LstResult<f64> {
        match self.get(key) {
            None => Ok(default),
            Some(raw) => raw.parse::<f64>().map_err(|_| {
                LstError::MetadataMalformed(format!("key {} is not numeric: {:?}", key, raw))
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
GROUP = LANDSAT_METADATA_FILE
  GROUP = IMAGE_ATTRIBUTES
    SPACECRAFT_ID = "LANDSAT_8"
    SUN_ELEVATION = 44.26097358
  END_GROUP = IMAGE_ATTRIBUTES
  GROUP = LEVEL1_RADIOMETRIC_RESCALING
    RADIANCE_MULT_BAND_10 = 3.3420E-04
    RADIANCE_ADD_BAND_10 = 0.10000
  END_GROUP = LEVEL1_RADIOMETRIC_RESCALING
END_GROUP = LANDSAT_METADATA_FILE
END
"#;

    #[test]
    fn test_parse_strips_quotes_and_whitespace() {
        let meta = SceneMetadata::from_str(SAMPLE);
        assert_eq!(meta.get("SPACECRAFT_ID"), Some("LANDSAT_8"));
        assert!((meta.get_f64("SUN_ELEVATION").unwrap() - 44.26097358).abs() < 1e-9);
    }

    #[test]
    fn test_group_markers_ignored() {
        let meta = SceneMetadata::from_str(SAMPLE);
        assert_eq!(meta.get("GROUP"), None);
        assert_eq!(meta.get("END_GROUP"), None);
    }

    #[test]
    fn test_scientific_notation() {
        let meta = SceneMetadata::from_str(SAMPLE);
        let gain = meta.get_f64("RADIANCE_MULT_BAND_10").unwrap();
        assert!((gain - 3.342e-4).abs() < 1e-12);
    }

    #[test]
    fn test_missing_required_key() {
        let meta = SceneMetadata::from_str(SAMPLE);
        let err = meta.get_f64("K1_CONSTANT_BAND_10").unwrap_err();
        assert_eq!(err.kind(), "MetadataMalformed");
    }

    #[test]
    fn test_non_numeric_required_key() {
        let meta = SceneMetadata::from_str("SUN_ELEVATION = cloudy\n");
        let err = meta.get_f64("SUN_ELEVATION").unwrap_err();
        assert_eq!(err.kind(), "MetadataMalformed");
    }

    #[test]
    fn test_default_only_applies_when_absent() {
        let meta = SceneMetadata::from_str("REFLECTANCE_MULT_BAND_4 = bogus\n");
        assert!(meta.get_f64_or("REFLECTANCE_MULT_BAND_4", 1.0).is_err());
        assert_eq!(meta.get_f64_or("REFLECTANCE_MULT_BAND_5", 1.0).unwrap(), 1.0);
    }

    #[test]
    fn test_junk_lines_ignored() {
        let meta = SceneMetadata::from_str("junk line\nKEY = 1\nanother junk\n");
        assert_eq!(meta.len(), 1);
        assert_eq!(meta.get("KEY"), Some("1"));
    }

    #[test]
    fn test_missing_file() {
        let err = SceneMetadata::from_file(Path::new("/nonexistent/LC08_MTL.txt")).unwrap_err();
        assert_eq!(err.kind(), "MetadataNotFound");
    }

    #[test]
    fn test_file_with_no_pairs_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("LC08_MTL.txt");
        std::fs::write(&path, "this is not metadata\n").unwrap();
        let err = SceneMetadata::from_file(&path).unwrap_err();
        assert_eq!(err.kind(), "MetadataMalformed");
    }
}
