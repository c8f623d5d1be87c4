use std::path::Path;

use crate::assets::decode::{Raster, load_image};
use crate::foundation::error::UnderlayResult;

/// Source of background-removed foreground images.
///
/// Implementations run the actual segmentation; the scene only needs the resulting raster, where
/// the subject is opaque and everything else is transparent.
pub trait BackgroundRemover {
    fn remove(&mut self, base: &Raster) -> UnderlayResult<Raster>;
}

/// A cutout produced ahead of time, for example by an external tool.
#[derive(Clone, Debug)]
pub struct PrecomputedCutout {
    raster: Raster,
}

impl PrecomputedCutout {
    pub fn new(raster: Raster) -> Self {
        Self { raster }
    }

    pub fn from_path(path: &Path) -> UnderlayResult<Self> {
        Ok(Self::new(load_image(path)?))
    }
}

impl BackgroundRemover for PrecomputedCutout {
    fn remove(&mut self, _base: &Raster) -> UnderlayResult<Raster> {
        Ok(self.raster.clone())
    }
}
