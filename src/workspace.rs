//! Editing session state as a value.
//!
//! [`Workspace`] holds what a collage editor tracks between user actions:
//! the selected template id, the ordered image list and the export style.
//! Every setter consumes the state and returns the next one, so a front
//! end can keep history, diff states or test transitions without a UI.
//!
//! ```
//! use zencollage::{Catalog, Image, Workspace};
//!
//! let catalog = Catalog::builtin();
//! let ws = Workspace::new()
//!     .add_images([Image::new("a", 1600, 900), Image::new("b", 1600, 900)])
//!     .select_template("vertical-strip")
//!     .set_spacing(-8.0);
//!
//! assert_eq!(ws.style().spacing, 0.0);
//! // Two landscapes cannot form a vertical strip.
//! let resolution = ws.resolve(&catalog);
//! assert!(resolution.forced_smart);
//! assert_eq!(resolution.effective.id, "horizontal-strip");
//! ```

use alloc::string::String;
use alloc::vec::Vec;

use crate::asset::Image;
use crate::catalog::{Catalog, SMART_TEMPLATE_ID};
use crate::compose::StyleOptions;
use crate::resolve::{Resolution, resolve};
use crate::slots::{PlacementResult, map_to_slots};

/// Masonry column choices offered by the workspace.
pub const WORKSPACE_COLUMNS: core::ops::RangeInclusive<usize> = 2..=3;

/// Editor state: template selection, images and export style.
#[derive(Clone, Debug, PartialEq)]
pub struct Workspace {
    selected_template: String,
    images: Vec<Image>,
    style: StyleOptions,
}

impl Default for Workspace {
    fn default() -> Self {
        Self {
            selected_template: String::from(SMART_TEMPLATE_ID),
            images: Vec::new(),
            style: StyleOptions {
                masonry_columns: *WORKSPACE_COLUMNS.start(),
                ..StyleOptions::default()
            },
        }
    }
}

impl Workspace {
    /// Smart selection, no images, default style with two masonry columns.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_template(&self) -> &str {
        &self.selected_template
    }

    pub fn images(&self) -> &[Image] {
        &self.images
    }

    pub fn style(&self) -> &StyleOptions {
        &self.style
    }

    // ── selection and images ────────────────────────────────────────────

    pub fn select_template(mut self, id: impl Into<String>) -> Self {
        self.selected_template = id.into();
        self
    }

    /// Append images after the existing ones.
    pub fn add_images(mut self, images: impl IntoIterator<Item = Image>) -> Self {
        self.images.extend(images);
        self
    }

    /// Remove every image with the given id.
    pub fn remove_image(mut self, id: &str) -> Self {
        self.images.retain(|img| img.id != id);
        self
    }

    pub fn clear_images(mut self) -> Self {
        self.images.clear();
        self
    }

    /// Move the image at `from` so it ends up at index `to`.
    ///
    /// Equal or out-of-range indices leave the state unchanged.
    pub fn reorder_images(mut self, from: usize, to: usize) -> Self {
        let len = self.images.len();
        if from == to || from >= len || to >= len {
            return self;
        }
        let moved = self.images.remove(from);
        self.images.insert(to, moved);
        self
    }

    /// Back to [`Workspace::new`].
    pub fn reset(self) -> Self {
        Self::default()
    }

    // ── export style ────────────────────────────────────────────────────

    /// Clamped to 2..=3.
    pub fn set_masonry_columns(mut self, columns: usize) -> Self {
        self.style.masonry_columns =
            columns.clamp(*WORKSPACE_COLUMNS.start(), *WORKSPACE_COLUMNS.end());
        self
    }

    pub fn set_spacing(mut self, value: f64) -> Self {
        self.style.spacing = at_least_zero(value);
        self
    }

    pub fn set_padding(mut self, value: f64) -> Self {
        self.style.padding = at_least_zero(value);
        self
    }

    pub fn set_border_radius(mut self, value: f64) -> Self {
        self.style.border_radius = at_least_zero(value);
        self
    }

    pub fn set_border_width(mut self, value: f64) -> Self {
        self.style.border_width = at_least_zero(value);
        self
    }

    /// Stored as given; parsed at export time.
    pub fn set_background_color(mut self, value: impl Into<String>) -> Self {
        self.style.background_color = value.into();
        self
    }

    /// Stored as given; parsed at export time.
    pub fn set_border_color(mut self, value: impl Into<String>) -> Self {
        self.style.border_color = value.into();
        self
    }

    /// Restore the six export styles to their defaults. Images, template
    /// selection and masonry columns are kept.
    pub fn reset_export_styles(self) -> Self {
        self.restore_export_styles(&StyleOptions::default())
    }

    /// Apply previously persisted export styles (spacing, padding, colors,
    /// border radius and width). Masonry columns are not persisted.
    pub fn restore_export_styles(mut self, saved: &StyleOptions) -> Self {
        let columns = self.style.masonry_columns;
        self.style = StyleOptions {
            masonry_columns: columns,
            spacing: at_least_zero(saved.spacing),
            padding: at_least_zero(saved.padding),
            border_radius: at_least_zero(saved.border_radius),
            border_width: at_least_zero(saved.border_width),
            background_color: saved.background_color.clone(),
            border_color: saved.border_color.clone(),
        };
        self
    }

    // ── derived ─────────────────────────────────────────────────────────

    /// Resolve the current selection against the current images.
    pub fn resolve<'c>(&self, catalog: &'c Catalog) -> Resolution<'c> {
        resolve(catalog, &self.selected_template, &self.images)
    }

    /// Slot assignments for the template the current state resolves to.
    pub fn placements(&self, catalog: &Catalog) -> PlacementResult<'_> {
        map_to_slots(self.resolve(catalog).effective, &self.images)
    }

    /// Render the current state; `None` when there is nothing to export or
    /// the export fails.
    #[cfg(feature = "raster")]
    pub fn export(&self, catalog: &Catalog) -> Option<Vec<u8>> {
        let template = self.resolve(catalog).effective;
        let placed = map_to_slots(template, &self.images);
        crate::raster::export(template, &placed.placements, &self.style)
    }
}

fn at_least_zero(value: f64) -> f64 {
    if value > 0.0 { value } else { 0.0 }
}
