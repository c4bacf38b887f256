//! Export geometry: style options and the pixel-free composition plan.
//!
//! [`Composition::plan`] turns a resolved template and its placements into
//! a canvas size, frame geometry and an ordered list of draw rectangles.
//! The raster exporter and the SVG wireframe both consume the plan, so the
//! two always agree on where things go.
//!
//! Only the variable layouts (horizontal strip, vertical strip, masonry)
//! can be composed; fixed grids and the smart pseudo-template yield `None`.
//!
//! # Example
//!
//! ```
//! use zencollage::{Catalog, Composition, Image, StyleOptions, map_to_slots};
//!
//! let catalog = Catalog::builtin();
//! let strip = catalog.get("horizontal-strip").unwrap();
//! let images = [Image::new("a", 200, 100), Image::new("b", 300, 100)];
//! let placed = map_to_slots(strip, &images);
//!
//! let style = StyleOptions { spacing: 10.0, padding: 5.0, ..Default::default() };
//! let plan = Composition::plan(strip, &placed.placements, &style).unwrap();
//!
//! assert_eq!((plan.canvas.width, plan.canvas.height), (520, 110));
//! assert_eq!(plan.draws[1].x, 215.0);
//! ```

use alloc::string::String;
use alloc::vec::Vec;
use log::{debug, warn};
use num_traits::Float;

use crate::asset::{Image, Size};
use crate::catalog::{LayoutKind, TemplateDefinition};
use crate::color::Color;
use crate::masonry::pack_masonry;
use crate::slots::SlotPlacement;

/// Canvas edges closer than this to a whole pixel snap to it instead of
/// rounding up.
const SNAP_EPSILON: f64 = 1e-6;

/// Flat export style configuration, as a front end would persist it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct StyleOptions {
    /// Requested masonry columns; clamped to `1..=image count`.
    pub masonry_columns: usize,
    /// Gap between images.
    pub spacing: f64,
    /// Inset from the border to the content.
    pub padding: f64,
    /// Blank means white.
    pub background_color: String,
    pub border_radius: f64,
    pub border_width: f64,
    /// Blank means the background color.
    pub border_color: String,
}

impl Default for StyleOptions {
    fn default() -> Self {
        Self {
            masonry_columns: 3,
            spacing: 0.0,
            padding: 0.0,
            background_color: String::from("#ffffff"),
            border_radius: 0.0,
            border_width: 0.0,
            border_color: String::from("#ffffff"),
        }
    }
}

impl StyleOptions {
    /// Sanitize numbers and parse colors.
    ///
    /// Negative or non-finite lengths become 0. A blank background is
    /// white; a blank border takes the background color. Colors that do
    /// not parse fall back the same way, with a warning.
    pub fn resolve(&self) -> ResolvedStyle {
        let background = parse_or(&self.background_color, "background", Color::WHITE);
        let border = parse_or(&self.border_color, "border", background);
        ResolvedStyle {
            masonry_columns: self.masonry_columns,
            spacing: non_negative(self.spacing),
            padding: non_negative(self.padding),
            border_radius: non_negative(self.border_radius),
            border_width: non_negative(self.border_width),
            background,
            border,
        }
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

fn parse_or(raw: &str, what: &str, fallback: Color) -> Color {
    if raw.trim().is_empty() {
        return fallback;
    }
    Color::parse(raw).unwrap_or_else(|| {
        warn!("unrecognized {what} color {raw:?}, using {fallback:?}");
        fallback
    })
}

/// [`StyleOptions`] after sanitizing.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedStyle {
    pub masonry_columns: usize,
    pub spacing: f64,
    pub padding: f64,
    pub border_radius: f64,
    pub border_width: f64,
    pub background: Color,
    pub border: Color,
}

impl Default for ResolvedStyle {
    fn default() -> Self {
        StyleOptions::default().resolve()
    }
}

/// One image draw, in canvas coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawOp<'a> {
    /// Index into the placement list given to [`Composition::plan`].
    pub placement: usize,
    pub slot_id: &'a str,
    pub image: &'a Image,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// An axis-aligned rounded rectangle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RoundedRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Already clamped to half the shorter side.
    pub radius: f64,
}

impl RoundedRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64, radius: f64) -> Self {
        let limit = width.min(height) / 2.0;
        Self {
            x,
            y,
            width,
            height,
            radius: radius.min(limit).max(0.0),
        }
    }
}

/// Complete export geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct Composition<'a> {
    pub layout: LayoutKind,
    /// Content box size before padding and border.
    pub content_width: f64,
    pub content_height: f64,
    /// `padding + border_width`; already applied to every draw.
    pub offset: f64,
    pub canvas: Size,
    pub outer_radius: f64,
    pub inner_radius: f64,
    /// In placement order.
    pub draws: Vec<DrawOp<'a>>,
    pub style: ResolvedStyle,
}

/// Content-space layout before the frame offset is applied.
struct Content<'a> {
    width: f64,
    height: f64,
    draws: Vec<DrawOp<'a>>,
}

impl<'a> Composition<'a> {
    /// Compute the export geometry for `placements` under `template`.
    ///
    /// Returns `None` if no placement has an image, if the template's
    /// layout cannot be composed, or if the geometry degenerates to an
    /// empty canvas.
    pub fn plan(
        template: &TemplateDefinition,
        placements: &'a [SlotPlacement<'a>],
        style: &StyleOptions,
    ) -> Option<Self> {
        let style = style.resolve();
        let filled: Vec<(usize, &'a SlotPlacement<'a>, &'a Image)> = placements
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.image.map(|img| (i, p, img)))
            .collect();
        if filled.is_empty() {
            debug!("nothing to compose for {:?}", template.id);
            return None;
        }

        let content = match template.layout {
            LayoutKind::HorizontalStrip => horizontal_strip(&filled, style.spacing),
            LayoutKind::VerticalStrip => vertical_strip(&filled, style.spacing),
            LayoutKind::Masonry => masonry(placements, &filled, &style),
            LayoutKind::FixedGrid | LayoutKind::Smart => {
                debug!("layout {} of {:?} is not composable", template.layout, template.id);
                None
            }
        }?;

        let offset = style.padding + style.border_width;
        let total_width = content.width + offset * 2.0;
        let total_height = content.height + offset * 2.0;
        if !(total_width > 0.0 && total_height > 0.0) {
            return None;
        }
        let canvas = Size::new(canvas_edge(total_width), canvas_edge(total_height));

        let shorter = canvas.width.min(canvas.height) as f64;
        let outer_radius = style.border_radius.min(shorter / 2.0);
        let inner_radius = (outer_radius - style.border_width).max(0.0);

        let draws = content
            .draws
            .into_iter()
            .map(|op| DrawOp {
                x: op.x + offset,
                y: op.y + offset,
                ..op
            })
            .collect();

        debug!(
            "composed {:?}: content {}x{}, canvas {}x{}",
            template.id, content.width, content.height, canvas.width, canvas.height
        );
        Some(Self {
            layout: template.layout,
            content_width: content.width,
            content_height: content.height,
            offset,
            canvas,
            outer_radius,
            inner_radius,
            draws,
            style,
        })
    }

    /// The background shape: the canvas inset by half the border width, so
    /// a stroke of that width is centered on it.
    pub fn outer_rect(&self) -> RoundedRect {
        let bw = self.style.border_width;
        RoundedRect::new(
            bw / 2.0,
            bw / 2.0,
            self.canvas.width as f64 - bw,
            self.canvas.height as f64 - bw,
            self.outer_radius,
        )
    }

    /// The clip shape for image draws: the canvas inset by the full border.
    pub fn inner_rect(&self) -> RoundedRect {
        let bw = self.style.border_width;
        RoundedRect::new(
            bw,
            bw,
            self.canvas.width as f64 - bw * 2.0,
            self.canvas.height as f64 - bw * 2.0,
            self.inner_radius,
        )
    }
}

/// Round up to a whole pixel, at least 1.
fn canvas_edge(exact: f64) -> u32 {
    let nearest = Float::round(exact);
    let edge = if Float::abs(exact - nearest) < SNAP_EPSILON {
        nearest
    } else {
        Float::ceil(exact)
    };
    edge.max(1.0) as u32
}

fn horizontal_strip<'a>(
    filled: &[(usize, &'a SlotPlacement<'a>, &'a Image)],
    gap: f64,
) -> Option<Content<'a>> {
    let height = filled
        .iter()
        .map(|(_, _, img)| img.height)
        .filter(|&h| h > 0)
        .min()? as f64;

    let mut cursor = 0.0;
    let draws = filled
        .iter()
        .map(|&(placement, p, img)| {
            let ratio = if img.height > 0 {
                img.width as f64 / img.height as f64
            } else {
                1.0
            };
            let width = if ratio > 0.0 {
                height * ratio
            } else {
                img.width as f64
            };
            let op = DrawOp {
                placement,
                slot_id: p.slot.id.as_str(),
                image: img,
                x: cursor,
                y: 0.0,
                width,
                height,
            };
            cursor += width + gap;
            op
        })
        .collect();

    let width = cursor - gap;
    if width == 0.0 {
        return None;
    }
    Some(Content {
        width,
        height,
        draws,
    })
}

fn vertical_strip<'a>(
    filled: &[(usize, &'a SlotPlacement<'a>, &'a Image)],
    gap: f64,
) -> Option<Content<'a>> {
    let width = filled
        .iter()
        .map(|(_, _, img)| img.width)
        .filter(|&w| w > 0)
        .min()? as f64;

    let mut cursor = 0.0;
    let draws = filled
        .iter()
        .map(|&(placement, p, img)| {
            let ratio = if img.width > 0 {
                img.height as f64 / img.width as f64
            } else {
                1.0
            };
            let height = if ratio > 0.0 {
                width * ratio
            } else {
                img.height as f64
            };
            let op = DrawOp {
                placement,
                slot_id: p.slot.id.as_str(),
                image: img,
                x: 0.0,
                y: cursor,
                width,
                height,
            };
            cursor += height + gap;
            op
        })
        .collect();

    let height = cursor - gap;
    if height == 0.0 {
        return None;
    }
    Some(Content {
        width,
        height,
        draws,
    })
}

fn masonry<'a>(
    placements: &'a [SlotPlacement<'a>],
    filled: &[(usize, &'a SlotPlacement<'a>, &'a Image)],
    style: &ResolvedStyle,
) -> Option<Content<'a>> {
    let column_width = filled
        .iter()
        .map(|(_, _, img)| img.width.max(1))
        .min()
        .unwrap_or(1)
        .max(1) as f64;
    let columns = style.masonry_columns.min(filled.len()).max(1);

    let layout = pack_masonry(placements, columns, column_width, style.spacing)?;
    if !(layout.width > 0.0 && layout.height > 0.0) {
        return None;
    }

    let draws = layout
        .items
        .iter()
        .map(|item| DrawOp {
            placement: item.placement,
            slot_id: item.id,
            image: item.image,
            x: item.left,
            y: item.top,
            width: item.width,
            height: item.height,
        })
        .collect();
    Some(Content {
        width: layout.width,
        height: layout.height,
        draws,
    })
}
