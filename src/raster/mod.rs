//! Pixel output: decode sources, composite onto one surface, encode PNG.
//!
//! Geometry comes from [`Composition::plan`]; this module only touches
//! pixels. Decodes for one export run on the rayon pool and are joined
//! before anything is drawn. Drawing is sequential, in placement order, on
//! a surface owned by the call.

mod decode;
mod ingest;
mod paint;

pub use ingest::{IngestFailure, Ingested, Upload, ingest, output_file_name};

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use image::RgbaImage;
use log::{debug, warn};
use rayon::prelude::*;

use crate::asset::Image;
use crate::catalog::{LayoutKind, TemplateDefinition};
use crate::compose::{Composition, StyleOptions};
use crate::slots::SlotPlacement;

/// Why an export produced no image.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("no placement has an image")]
    NothingToExport,

    #[error("layout {0} cannot be exported")]
    UnsupportedLayout(LayoutKind),

    #[error("layout geometry is empty")]
    EmptyCanvas,

    #[error("image {0:?} has no pixel source")]
    MissingSource(String),

    #[error("failed to decode image {id:?}: {source}")]
    Decode {
        id: String,
        #[source]
        source: image::ImageError,
    },

    #[error("cannot allocate a {width}x{height} surface")]
    Surface { width: u32, height: u32 },

    #[error("PNG encoding failed: {0}")]
    Encode(String),
}

/// An encoded export.
#[derive(Clone, Debug)]
pub struct Rendered {
    pub width: u32,
    pub height: u32,
    pub png_data: Vec<u8>,
}

/// Render `placements` under `template` to PNG bytes.
///
/// Any placement image that fails to decode fails the whole export;
/// partial composites are never produced.
pub fn try_export(
    template: &TemplateDefinition,
    placements: &[SlotPlacement<'_>],
    style: &StyleOptions,
) -> Result<Rendered, ExportError> {
    if placements.iter().all(|p| p.image.is_none()) {
        return Err(ExportError::NothingToExport);
    }
    if !matches!(
        template.layout,
        LayoutKind::HorizontalStrip | LayoutKind::VerticalStrip | LayoutKind::Masonry
    ) {
        return Err(ExportError::UnsupportedLayout(template.layout));
    }
    let plan = Composition::plan(template, placements, style).ok_or(ExportError::EmptyCanvas)?;

    let bitmaps = plan
        .draws
        .par_iter()
        .map(|op| load(op.image))
        .collect::<Result<Vec<_>, _>>()?;
    debug!("decoded {} images for {:?}", bitmaps.len(), template.id);

    let pixmap = paint::composite(&plan, &bitmaps)?;
    let png_data = pixmap
        .encode_png()
        .map_err(|e| ExportError::Encode(e.to_string()))?;
    Ok(Rendered {
        width: plan.canvas.width,
        height: plan.canvas.height,
        png_data,
    })
}

/// Fail-closed [`try_export`]: logs the reason and returns `None`.
pub fn export(
    template: &TemplateDefinition,
    placements: &[SlotPlacement<'_>],
    style: &StyleOptions,
) -> Option<Vec<u8>> {
    match try_export(template, placements, style) {
        Ok(rendered) => Some(rendered.png_data),
        Err(e) => {
            warn!("export of {:?} failed: {e}", template.id);
            None
        }
    }
}

fn load(image: &Image) -> Result<Arc<RgbaImage>, ExportError> {
    let src = image
        .src
        .as_ref()
        .ok_or_else(|| ExportError::MissingSource(image.id.clone()))?;
    src.decode().map_err(|source| ExportError::Decode {
        id: image.id.clone(),
        source,
    })
}
