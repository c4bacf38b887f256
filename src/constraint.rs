//! Template constraints and the compatibility check.
//!
//! A template may declare predicates over the image set it accepts. The
//! check evaluates every predicate independently and reports each failure,
//! so the caller can explain why a requested template was overridden.
//!
//! # Example
//!
//! ```
//! use zencollage::{Catalog, Image, check_compatibility};
//!
//! let catalog = Catalog::builtin();
//! let strip = catalog.get("horizontal-strip").unwrap();
//!
//! let images = [Image::new("a", 1000, 800), Image::new("b", 1020, 800)];
//! let result = check_compatibility(strip, &images);
//!
//! // 2% width difference is outside the 1% uniform-dimensions tolerance.
//! assert!(!result.is_compatible);
//! assert_eq!(result.messages.len(), 1);
//! ```

use alloc::string::String;
use alloc::vec::Vec;
use num_traits::Float;

use crate::asset::Image;
use crate::catalog::TemplateDefinition;

/// Relative tolerance used by `uniform-dimensions` when none is given (1%).
pub const DEFAULT_TOLERANCE: f64 = 0.01;

/// Required orientation for every image in the set.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Orientation {
    /// `width >= height`.
    Landscape,
    /// `height >= width`.
    Portrait,
}

impl Orientation {
    /// Square images satisfy both orientations.
    pub fn matches(self, image: &Image) -> bool {
        match self {
            Self::Landscape => image.width >= image.height,
            Self::Portrait => image.height >= image.width,
        }
    }
}

/// A predicate tag attached to a template, with the message shown when it fails.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "kebab-case"))]
pub enum TemplateConstraint {
    /// Every image's width and height within `tolerance` (a fraction) of the
    /// first image's.
    UniformDimensions {
        #[cfg_attr(feature = "serde", serde(default = "default_tolerance"))]
        tolerance: f64,
        message: String,
    },
    /// Every image has the given orientation.
    Orientation {
        orientation: Orientation,
        message: String,
    },
    /// At least `value` images.
    MinCount { value: usize, message: String },
}

#[cfg(feature = "serde")]
fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

impl TemplateConstraint {
    pub fn uniform_dimensions(tolerance: f64, message: impl Into<String>) -> Self {
        Self::UniformDimensions {
            tolerance,
            message: message.into(),
        }
    }

    pub fn orientation(orientation: Orientation, message: impl Into<String>) -> Self {
        Self::Orientation {
            orientation,
            message: message.into(),
        }
    }

    pub fn min_count(value: usize, message: impl Into<String>) -> Self {
        Self::MinCount {
            value,
            message: message.into(),
        }
    }

    /// Human-readable message reported when this constraint fails.
    pub fn message(&self) -> &str {
        match self {
            Self::UniformDimensions { message, .. }
            | Self::Orientation { message, .. }
            | Self::MinCount { message, .. } => message,
        }
    }

    /// Evaluate this constraint alone against `images`.
    ///
    /// Unlike [`check_compatibility`], an empty set is not vacuously
    /// accepted by `orientation`: there is nothing to have the orientation.
    pub fn check(&self, images: &[Image]) -> bool {
        match self {
            Self::UniformDimensions { tolerance, .. } => uniform_dimensions(images, *tolerance),
            Self::Orientation { orientation, .. } => {
                !images.is_empty() && images.iter().all(|img| orientation.matches(img))
            }
            Self::MinCount { value, .. } => images.len() >= *value,
        }
    }
}

/// Compare every image against the first one in set order.
fn uniform_dimensions(images: &[Image], tolerance: f64) -> bool {
    let Some((base, rest)) = images.split_first() else {
        return true;
    };
    let within = |value: u32, reference: u32| {
        let diff = Float::abs(value as f64 - reference as f64);
        diff / reference.max(1) as f64 <= tolerance
    };
    rest.iter()
        .all(|img| within(img.width, base.width) && within(img.height, base.height))
}

/// Outcome of checking an image set against a template.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Compatibility {
    pub is_compatible: bool,
    /// Failure messages in constraint declaration order.
    pub messages: Vec<String>,
}

impl Compatibility {
    /// A passing result with no messages.
    pub fn compatible() -> Self {
        Self {
            is_compatible: true,
            messages: Vec::new(),
        }
    }
}

/// Check `images` against every constraint `template` declares.
///
/// An empty image set, or a template without constraints, is always
/// compatible. Otherwise every failing constraint contributes its message.
pub fn check_compatibility(template: &TemplateDefinition, images: &[Image]) -> Compatibility {
    if template.constraints.is_empty() || images.is_empty() {
        return Compatibility::compatible();
    }

    let messages: Vec<String> = template
        .constraints
        .iter()
        .filter(|c| !c.check(images))
        .map(|c| String::from(c.message()))
        .collect();

    Compatibility {
        is_compatible: messages.is_empty(),
        messages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, LayoutKind};
    use alloc::vec;

    fn landscape() -> TemplateConstraint {
        TemplateConstraint::orientation(Orientation::Landscape, "landscape only")
    }

    // ── uniform-dimensions ──────────────────────────────────────────────

    #[test]
    fn uniform_within_default_tolerance() {
        let c = TemplateConstraint::uniform_dimensions(DEFAULT_TOLERANCE, "same size");
        let images = [Image::new("a", 1000, 800), Image::new("b", 1009, 800)];
        assert!(c.check(&images));
    }

    #[test]
    fn uniform_outside_default_tolerance() {
        let c = TemplateConstraint::uniform_dimensions(DEFAULT_TOLERANCE, "same size");
        let images = [Image::new("a", 1000, 800), Image::new("b", 1020, 800)];
        assert!(!c.check(&images));
    }

    #[test]
    fn uniform_checks_height_too() {
        let c = TemplateConstraint::uniform_dimensions(DEFAULT_TOLERANCE, "same size");
        let images = [Image::new("a", 1000, 800), Image::new("b", 1000, 900)];
        assert!(!c.check(&images));
    }

    #[test]
    fn uniform_compares_against_first_not_neighbours() {
        // Each neighbour pair is within 1%, but the third is 1.6% off the first.
        let c = TemplateConstraint::uniform_dimensions(DEFAULT_TOLERANCE, "same size");
        let images = [
            Image::new("a", 1000, 800),
            Image::new("b", 1008, 800),
            Image::new("c", 1016, 800),
        ];
        assert!(!c.check(&images));
    }

    #[test]
    fn uniform_trivial_for_zero_or_one() {
        let c = TemplateConstraint::uniform_dimensions(DEFAULT_TOLERANCE, "same size");
        assert!(c.check(&[]));
        assert!(c.check(&[Image::new("a", 1, 999)]));
    }

    #[test]
    fn uniform_zero_width_base_does_not_divide_by_zero() {
        let c = TemplateConstraint::uniform_dimensions(0.5, "same size");
        let images = [Image::new("a", 0, 10), Image::new("b", 0, 10)];
        assert!(c.check(&images));
    }

    // ── orientation ─────────────────────────────────────────────────────

    #[test]
    fn orientation_fails_on_empty_set() {
        assert!(!landscape().check(&[]));
    }

    #[test]
    fn orientation_square_passes_both() {
        let square = [Image::new("sq", 500, 500)];
        assert!(landscape().check(&square));
        let portrait = TemplateConstraint::orientation(Orientation::Portrait, "portrait only");
        assert!(portrait.check(&square));
    }

    #[test]
    fn orientation_requires_every_image() {
        let images = [Image::new("a", 800, 600), Image::new("b", 600, 800)];
        assert!(!landscape().check(&images));
    }

    // ── min-count ───────────────────────────────────────────────────────

    #[test]
    fn min_count_is_inclusive() {
        let c = TemplateConstraint::min_count(2, "two please");
        assert!(!c.check(&[Image::new("a", 1, 1)]));
        assert!(c.check(&[Image::new("a", 1, 1), Image::new("b", 1, 1)]));
    }

    // ── check_compatibility ─────────────────────────────────────────────

    #[test]
    fn empty_set_is_always_compatible() {
        let catalog = Catalog::builtin();
        for template in catalog.templates() {
            assert_eq!(check_compatibility(template, &[]), Compatibility::compatible());
        }
    }

    #[test]
    fn unconstrained_template_is_compatible() {
        let t = TemplateDefinition::new("free", LayoutKind::Masonry, 1.0);
        let images = [Image::new("a", 10, 1000)];
        assert!(check_compatibility(&t, &images).is_compatible);
    }

    #[test]
    fn reports_every_failure_in_declaration_order() {
        let t = TemplateDefinition::new("strict", LayoutKind::HorizontalStrip, 1.0)
            .constraint(TemplateConstraint::min_count(2, "first"))
            .constraint(landscape())
            .constraint(TemplateConstraint::uniform_dimensions(0.01, "third"));
        let images = [Image::new("a", 600, 800)];
        let result = check_compatibility(&t, &images);
        assert!(!result.is_compatible);
        assert_eq!(result.messages, vec!["first", "landscape only"]);
    }
}
