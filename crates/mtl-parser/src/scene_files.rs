//! Scene folder file location.
//!
//! Collection-2 Level-1 scenes are flat folders; the MTL file ends in
//! `_MTL.txt` and band files encode the band number in their suffix. All
//! matching is case-insensitive because archives differ in casing.

use std::fs;
use std::path::{Path, PathBuf};

use lst_common::{LstError, LstResult};

/// Find the MTL metadata file in a scene folder.
pub fn find_mtl_file(scene_dir: &Path) -> LstResult<PathBuf> {
    find_by_suffix(scene_dir, "MTL.TXT")?
        .ok_or_else(|| LstError::MetadataNotFound(scene_dir.display().to_string()))
}

/// Find a band file by suffix (`_B4.TIF` style).
pub fn find_band_file(scene_dir: &Path, suffix: &str) -> LstResult<PathBuf> {
    find_by_suffix(scene_dir, suffix)?.ok_or_else(|| {
        LstError::BandFileMissing(format!("{} in {}", suffix, scene_dir.display()))
    })
}

/// Find the first of several candidate suffixes that exists.
pub fn find_band_file_any(scene_dir: &Path, suffixes: &[&str]) -> LstResult<PathBuf> {
    for suffix in suffixes {
        if let Some(path) = find_by_suffix(scene_dir, suffix)? {
            return Ok(path);
        }
    }
    Err(LstError::BandFileMissing(format!(
        "{} in {}",
        suffixes.join(" or "),
        scene_dir.display()
    )))
}

fn find_by_suffix(scene_dir: &Path, suffix: &str) -> LstResult<Option<PathBuf>> {
    let suffix = suffix.to_uppercase();
    let mut entries: Vec<PathBuf> = fs::read_dir(scene_dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .collect();
    // Deterministic pick when several files match
    entries.sort();

    Ok(entries.into_iter().find(|path| {
        path.file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.to_uppercase().ends_with(&suffix))
            .unwrap_or(false)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"x").unwrap();
    }

    #[test]
    fn test_find_mtl_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "LC08_L1TP_042034_mtl.txt");
        touch(dir.path(), "LC08_L1TP_042034_B4.TIF");

        let found = find_mtl_file(dir.path()).unwrap();
        assert!(found.to_str().unwrap().ends_with("mtl.txt"));
    }

    #[test]
    fn test_find_mtl_missing() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "LC08_B4.TIF");
        let err = find_mtl_file(dir.path()).unwrap_err();
        assert_eq!(err.kind(), "MetadataNotFound");
    }

    #[test]
    fn test_find_band_file() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "LC08_L1TP_B4.TIF");
        touch(dir.path(), "LC08_L1TP_B10.tif");

        assert!(find_band_file(dir.path(), "_B4.TIF").is_ok());
        assert!(find_band_file(dir.path(), "_B10.TIF").is_ok());
        let err = find_band_file(dir.path(), "_B5.TIF").unwrap_err();
        assert_eq!(err.kind(), "BandFileMissing");
    }

    #[test]
    fn test_find_band_file_any_prefers_first_suffix() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "LE07_B6_VCID_1.TIF");
        touch(dir.path(), "LE07_B6.TIF");

        let found =
            find_band_file_any(dir.path(), &["_B6_VCID_1.TIF", "_B6.TIF"]).unwrap();
        assert!(found.to_str().unwrap().ends_with("B6_VCID_1.TIF"));

        // Falls back when the preferred suffix is absent
        let dir2 = tempfile::tempdir().unwrap();
        touch(dir2.path(), "LE07_B6.TIF");
        let found =
            find_band_file_any(dir2.path(), &["_B6_VCID_1.TIF", "_B6.TIF"]).unwrap();
        assert!(found.to_str().unwrap().ends_with("B6.TIF"));
    }

    #[test]
    fn test_band_suffix_does_not_match_b10_for_b1() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "LC08_B10.TIF");
        let err = find_band_file(dir.path(), "_B1.TIF").unwrap_err();
        assert_eq!(err.kind(), "BandFileMissing");
    }
}
