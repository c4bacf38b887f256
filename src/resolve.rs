//! Decide which template is actually rendered.
//!
//! Resolution is a pure function of `(catalog, requested id, images)`; call
//! it again whenever the selection or the image set changes.
//!
//! # Example
//!
//! ```
//! use zencollage::{Catalog, Image, resolve};
//!
//! let catalog = Catalog::builtin();
//! // One portrait image cannot form a horizontal strip.
//! let images = [Image::new("a", 600, 800)];
//! let resolution = resolve(&catalog, "horizontal-strip", &images);
//!
//! assert!(resolution.forced_smart);
//! assert_eq!(resolution.effective.id, "masonry-wide");
//! assert_eq!(resolution.requested.unwrap().id, "horizontal-strip");
//! assert_eq!(resolution.requested_compatibility.messages.len(), 2);
//! ```

use log::debug;

use crate::asset::Image;
use crate::catalog::{Catalog, TemplateDefinition};
use crate::constraint::{Compatibility, check_compatibility};
use crate::score::choose_best;

/// The outcome of resolving a template selection.
#[derive(Clone, Debug, PartialEq)]
pub struct Resolution<'c> {
    /// The template to render.
    pub effective: &'c TemplateDefinition,
    /// Whether the scorer picked `effective`.
    pub is_smart: bool,
    /// The scorer's pick, when the scorer ran.
    pub matched: Option<&'c TemplateDefinition>,
    /// The template the caller asked for (the smart pseudo-template on the
    /// smart path, if the catalog declares one).
    pub requested: Option<&'c TemplateDefinition>,
    /// For an explicit request, the requested template's compatibility; on
    /// the smart path, the picked template's.
    pub requested_compatibility: Compatibility,
    /// An explicit request was overridden because the images do not fit it.
    pub forced_smart: bool,
}

impl Resolution<'_> {
    /// Messages explaining why an explicit request was overridden. Empty
    /// unless [`forced_smart`](Self::forced_smart) is set.
    pub fn override_messages(&self) -> &[alloc::string::String] {
        if self.forced_smart {
            &self.requested_compatibility.messages
        } else {
            &[]
        }
    }
}

/// Resolve `requested_id` against `images`.
///
/// An explicit id unknown to the catalog (or naming nothing renderable)
/// resolves to the catalog's safe default. An explicit template the images
/// do not satisfy is replaced by the scorer's pick, with the original
/// request and its failure messages kept for display. With no images,
/// compatibility is moot and an explicit request always stands.
pub fn resolve<'c>(catalog: &'c Catalog, requested_id: &str, images: &[Image]) -> Resolution<'c> {
    if catalog.is_smart_id(requested_id) {
        let best = choose_best(catalog, images).unwrap_or_else(|| catalog.fallback());
        return Resolution {
            effective: best,
            is_smart: true,
            matched: Some(best),
            requested: catalog
                .get(requested_id)
                .filter(|t| t.is_dynamic())
                .or_else(|| catalog.smart()),
            requested_compatibility: check_compatibility(best, images),
            forced_smart: false,
        };
    }

    let template = catalog
        .find_renderable(requested_id)
        .unwrap_or_else(|| catalog.fallback());
    let compatibility = check_compatibility(template, images);

    if compatibility.is_compatible || images.is_empty() {
        return Resolution {
            effective: template,
            is_smart: false,
            matched: None,
            requested: Some(template),
            requested_compatibility: compatibility,
            forced_smart: false,
        };
    }

    let best = choose_best(catalog, images).unwrap_or_else(|| catalog.fallback());
    debug!(
        "template {:?} rejected ({} failed constraints); using {:?}",
        template.id,
        compatibility.messages.len(),
        best.id
    );
    Resolution {
        effective: best,
        is_smart: true,
        matched: Some(best),
        requested: Some(template),
        requested_compatibility: compatibility,
        forced_smart: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{LayoutKind, SMART_TEMPLATE_ID, TemplateSlot};
    use alloc::vec;

    fn landscapes(n: usize) -> alloc::vec::Vec<Image> {
        (0..n)
            .map(|i| Image::new(alloc::format!("img{i}"), 1600, 900))
            .collect()
    }

    #[test]
    fn explicit_compatible_request_stands() {
        let catalog = Catalog::builtin();
        let images = landscapes(2);
        let r = resolve(&catalog, "horizontal-strip", &images);
        assert_eq!(r.effective.id, "horizontal-strip");
        assert!(!r.is_smart);
        assert!(!r.forced_smart);
        assert!(r.matched.is_none());
        assert!(r.requested_compatibility.is_compatible);
        assert!(r.override_messages().is_empty());
    }

    #[test]
    fn explicit_request_with_no_images_stands() {
        let catalog = Catalog::builtin();
        let r = resolve(&catalog, "vertical-strip", &[]);
        assert_eq!(r.effective.id, "vertical-strip");
        assert!(!r.is_smart);
    }

    #[test]
    fn unknown_id_uses_safe_default() {
        let catalog = Catalog::builtin();
        let r = resolve(&catalog, "no-such-template", &landscapes(1));
        assert_eq!(r.effective.id, "masonry-wide");
        assert_eq!(r.requested.map(|t| t.id.as_str()), Some("masonry-wide"));
        assert!(!r.is_smart);
    }

    #[test]
    fn incompatible_request_is_forced_smart() {
        let catalog = Catalog::builtin();
        let images = [Image::new("a", 1000, 800), Image::new("b", 1200, 800)];
        let r = resolve(&catalog, "horizontal-strip", &images);
        assert!(r.is_smart);
        assert!(r.forced_smart);
        assert_eq!(r.effective.id, "masonry-wide");
        assert_eq!(r.matched, Some(r.effective));
        assert_eq!(r.requested.unwrap().id, "horizontal-strip");
        assert_eq!(r.override_messages().len(), 1);
    }

    #[test]
    fn smart_request_reports_pick_compatibility() {
        let catalog = Catalog::builtin();
        let images = landscapes(3);
        let r = resolve(&catalog, SMART_TEMPLATE_ID, &images);
        assert!(r.is_smart);
        assert!(!r.forced_smart);
        assert_eq!(r.effective.id, "horizontal-strip");
        assert_eq!(r.requested.map(|t| t.layout), Some(LayoutKind::Smart));
        assert!(r.requested_compatibility.is_compatible);
    }

    #[test]
    fn smart_request_with_no_images_picks_first_renderable() {
        let catalog = Catalog::builtin();
        let r = resolve(&catalog, SMART_TEMPLATE_ID, &[]);
        assert_eq!(r.effective.id, "masonry-wide");
        assert!(r.is_smart);
    }

    #[test]
    fn smart_id_without_smart_template_in_catalog() {
        let catalog = Catalog::new(vec![
            TemplateDefinition::new("g", LayoutKind::FixedGrid, 1.0)
                .slot(TemplateSlot::new("a", 1.0)),
        ])
        .unwrap();
        let r = resolve(&catalog, SMART_TEMPLATE_ID, &landscapes(1));
        assert!(r.is_smart);
        assert!(r.requested.is_none());
        assert_eq!(r.effective.id, "g");
    }

    #[test]
    fn smart_request_keeps_the_named_smart_template() {
        let catalog = Catalog::new(vec![
            TemplateDefinition::new("auto-a", LayoutKind::Smart, 1.0),
            TemplateDefinition::new("auto-b", LayoutKind::Smart, 1.0),
            TemplateDefinition::new("g", LayoutKind::FixedGrid, 1.0)
                .slot(TemplateSlot::new("a", 1.0)),
        ])
        .unwrap();
        let r = resolve(&catalog, "auto-b", &landscapes(1));
        assert!(r.is_smart);
        assert_eq!(r.requested.map(|t| t.id.as_str()), Some("auto-b"));
        let r = resolve(&catalog, SMART_TEMPLATE_ID, &landscapes(1));
        assert_eq!(r.requested.map(|t| t.id.as_str()), Some("auto-a"));
    }

    #[test]
    fn resolution_is_pure() {
        let catalog = Catalog::builtin();
        let images = [Image::new("a", 600, 800), Image::new("b", 800, 600)];
        for id in [SMART_TEMPLATE_ID, "horizontal-strip", "vertical-strip", "bogus"] {
            assert_eq!(resolve(&catalog, id, &images), resolve(&catalog, id, &images));
        }
    }
}
