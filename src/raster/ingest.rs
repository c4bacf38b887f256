//! Turning raw uploads into [`Image`] records.

use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use chrono::NaiveDateTime;
use log::warn;
use rayon::prelude::*;

use crate::asset::{Image, ImageSource};

/// One uploaded file.
#[derive(Clone, Debug)]
pub struct Upload {
    pub id: String,
    /// Original file name.
    pub name: String,
    /// Declared media type, e.g. `image/png`. `None` lets the decoder decide.
    pub media_type: Option<String>,
    pub bytes: Arc<[u8]>,
}

impl Upload {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            media_type: None,
            bytes: bytes.into(),
        }
    }

    pub fn media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    fn is_image(&self) -> bool {
        self.media_type.as_deref().is_none_or(|t| {
            t.get(..6)
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
        })
    }
}

/// An upload that claimed to be an image but could not be decoded.
#[derive(Debug)]
pub struct IngestFailure {
    pub name: String,
    pub error: image::ImageError,
}

/// Result of [`ingest`].
#[derive(Debug, Default)]
pub struct Ingested {
    /// Accepted images, in upload order.
    pub images: Vec<Image>,
    /// Names of uploads whose media type is not an image type.
    pub skipped: Vec<String>,
    pub failures: Vec<IngestFailure>,
}

enum Outcome {
    Accepted(Image),
    Skipped(String),
    Failed(IngestFailure),
}

/// Decode a batch of uploads independently.
///
/// One bad file never blocks the rest. Accepted images carry their
/// decoded pixels, so exports do not decode them again.
pub fn ingest(uploads: Vec<Upload>) -> Ingested {
    let outcomes: Vec<Outcome> = uploads.into_par_iter().map(ingest_one).collect();

    let mut result = Ingested::default();
    for outcome in outcomes {
        match outcome {
            Outcome::Accepted(image) => result.images.push(image),
            Outcome::Skipped(name) => result.skipped.push(name),
            Outcome::Failed(failure) => result.failures.push(failure),
        }
    }
    result
}

fn ingest_one(upload: Upload) -> Outcome {
    if !upload.is_image() {
        warn!(
            "skipping {:?}: media type {:?} is not an image",
            upload.name, upload.media_type
        );
        return Outcome::Skipped(upload.name);
    }
    match image::load_from_memory(&upload.bytes) {
        Ok(decoded) => {
            let bitmap = decoded.to_rgba8();
            let (width, height) = bitmap.dimensions();
            let image = Image::new(upload.id, width, height)
                .named(upload.name)
                .with_source(ImageSource::Decoded(Arc::new(bitmap)));
            Outcome::Accepted(image)
        }
        Err(error) => {
            warn!("could not decode {:?}: {error}", upload.name);
            Outcome::Failed(IngestFailure {
                name: upload.name,
                error,
            })
        }
    }
}

/// Export file name for a given local time: `joinpic_YYYYMMDD_HHMMSS.png`.
pub fn output_file_name(at: &NaiveDateTime) -> String {
    format!("joinpic_{}.png", at.format("%Y%m%d_%H%M%S"))
}
