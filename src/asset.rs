//! Uploaded images and where their pixels live.

use alloc::string::String;
use alloc::sync::Arc;
use core::fmt;

#[cfg(feature = "std")]
use std::path::PathBuf;

/// Width × height dimensions in pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Size {
    /// Create a new size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width divided by height. A zero height counts as square.
    pub fn aspect_ratio(self) -> f64 {
        if self.height == 0 {
            return 1.0;
        }
        self.width as f64 / self.height as f64
    }
}

/// A readable reference to an image's pixel data.
///
/// Sources are immutable and cheap to clone, so one upload can feed any
/// number of concurrent exports.
#[derive(Clone)]
pub enum ImageSource {
    /// Encoded bytes in a container the decoder recognizes (PNG, JPEG, ...).
    Encoded(Arc<[u8]>),
    /// An encoded file on disk, read at export time.
    #[cfg(feature = "std")]
    File(PathBuf),
    /// Pixels that were already decoded, typically during ingestion.
    #[cfg(feature = "raster")]
    Decoded(Arc<image::RgbaImage>),
}

impl fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encoded(bytes) => write!(f, "Encoded({} bytes)", bytes.len()),
            #[cfg(feature = "std")]
            Self::File(path) => f.debug_tuple("File").field(path).finish(),
            #[cfg(feature = "raster")]
            Self::Decoded(bitmap) => write!(f, "Decoded({}×{})", bitmap.width(), bitmap.height()),
        }
    }
}

/// An uploaded image.
///
/// `id` is unique within a session. `width`/`height` are the natural pixel
/// dimensions reported at ingestion; every layout decision reads them, the
/// pixel source is only touched by the rasterizer.
#[derive(Clone, Debug)]
pub struct Image {
    pub id: String,
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub src: Option<ImageSource>,
}

impl Image {
    /// An image record without pixel data. The display name defaults to the id.
    pub fn new(id: impl Into<String>, width: u32, height: u32) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            width,
            height,
            src: None,
        }
    }

    /// Set the display name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Attach the pixel source.
    pub fn with_source(mut self, src: ImageSource) -> Self {
        self.src = Some(src);
        self
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Width divided by height, 1.0 when the height is unknown.
    pub fn aspect_ratio(&self) -> f64 {
        self.size().aspect_ratio()
    }
}

/// Records are equal when id, name and dimensions match. Pixel sources are
/// not compared.
impl PartialEq for Image {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.width == other.width
            && self.height == other.height
    }
}
