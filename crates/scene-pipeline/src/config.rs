//! Run configuration.

/// Which derived rasters to write. LST is always written; everything else
/// is still computed (LST depends on it transitively) but only persisted on
/// request.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputSelection {
    pub ndvi: bool,
    pub emissivity: bool,
    pub brightness_temp: bool,
}
