use alloc::sync::Arc;

use image::{ImageError, RgbaImage};

use crate::asset::ImageSource;

impl ImageSource {
    /// Decode to straight-alpha RGBA8.
    ///
    /// Already decoded sources are shared, not copied.
    pub fn decode(&self) -> Result<Arc<RgbaImage>, ImageError> {
        match self {
            Self::Encoded(bytes) => Ok(Arc::new(image::load_from_memory(bytes)?.to_rgba8())),
            Self::File(path) => Ok(Arc::new(image::open(path)?.to_rgba8())),
            Self::Decoded(bitmap) => Ok(Arc::clone(bitmap)),
        }
    }
}
