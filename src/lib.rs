//! Collage layout: template catalog, compatibility checks, smart template
//! resolution, slot assignment, masonry packing and PNG export.
//!
//! Everything up to [`Composition`] is pure geometry over image dimensions
//! and builds without `std`. The `raster` feature adds decoding,
//! compositing and encoding.
//!
//! # Modules
//!
//! - [`catalog`]: Template definitions, the built-in set, JSON loading
//! - [`constraint`]: Template constraints and the compatibility check
//! - [`score`]: Template scoring and best-template selection
//! - [`resolve`]: Explicit vs smart template resolution
//! - [`slots`]: Image to slot assignment by aspect-ratio rank
//! - [`masonry`]: Greedy shortest-column packing
//! - [`compose`]: Style options and export geometry
//! - [`workspace`]: Editor state with consuming setters
//! - `raster`: Decode, composite, encode (feature `raster`)
//! - `svg`: Wireframe rendering of a composition (feature `svg`)
//!
//! # Example
//!
//! ```
//! use zencollage::{Catalog, Composition, Image, SMART_TEMPLATE_ID, StyleOptions};
//! use zencollage::{map_to_slots, resolve};
//!
//! let catalog = Catalog::builtin();
//! let images = [
//!     Image::new("a", 1200, 800),
//!     Image::new("b", 800, 1200),
//!     Image::new("c", 1000, 1000),
//! ];
//!
//! let resolution = resolve(&catalog, SMART_TEMPLATE_ID, &images);
//! assert_eq!(resolution.effective.id, "masonry-wide");
//!
//! let placed = map_to_slots(resolution.effective, &images);
//! let style = StyleOptions { spacing: 8.0, ..StyleOptions::default() };
//! let plan = Composition::plan(resolution.effective, &placed.placements, &style).unwrap();
//! assert_eq!(plan.draws.len(), 3);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod asset;
pub mod catalog;
pub mod color;
pub mod compose;
pub mod constraint;
pub mod masonry;
#[cfg(feature = "raster")]
pub mod raster;
pub mod resolve;
pub mod score;
pub mod slots;
#[cfg(feature = "svg")]
pub mod svg;
pub mod workspace;

pub use asset::{Image, ImageSource, Size};
pub use catalog::{
    Catalog, CatalogError, LayoutKind, SMART_TEMPLATE_ID, TemplateDefinition, TemplateSlot,
};
pub use color::Color;
pub use compose::{Composition, DrawOp, ResolvedStyle, RoundedRect, StyleOptions};
pub use constraint::{Compatibility, Orientation, TemplateConstraint, check_compatibility};
pub use masonry::{MasonryItem, MasonryLayout, pack_masonry};
#[cfg(feature = "raster")]
pub use raster::{ExportError, Rendered, export, try_export};
pub use resolve::{Resolution, resolve};
pub use score::{choose_best, score_template};
pub use slots::{PlacementResult, SlotPlacement, map_to_slots};
pub use workspace::Workspace;
