//! Template scoring for smart resolution.
//!
//! Scores are only compared with each other. Slotted templates are scored
//! on shape match (weight 5), fill (3) and stage fit (2), minus overflow
//! and underfill penalties. Strips are scored on their total run length.

use alloc::vec::Vec;
use num_traits::Float;

use crate::asset::Image;
use crate::catalog::{Catalog, LayoutKind, TemplateDefinition};
use crate::constraint::check_compatibility;

const RATIO_WEIGHT: f64 = 5.0;
const FILL_WEIGHT: f64 = 3.0;
const STAGE_WEIGHT: f64 = 2.0;
/// Per image beyond the slot count.
const OVERFLOW_PENALTY: f64 = 0.2;
/// Per slot left empty.
const UNDERFILL_PENALTY: f64 = 0.1;
/// Applied to a strip holding a single image.
const LONE_STRIP_PENALTY: f64 = 0.5;

/// Pick the best compatible renderable template for `images`.
///
/// Returns `None` only when the catalog has nothing renderable. With no
/// images, the first renderable template wins outright. If every template
/// is incompatible, the catalog's safe default is returned. Exact ties keep
/// the template declared first.
pub fn choose_best<'c>(catalog: &'c Catalog, images: &[Image]) -> Option<&'c TemplateDefinition> {
    let first = catalog.renderable().next()?;
    if images.is_empty() {
        return Some(first);
    }

    let mut best = catalog.fallback();
    let mut best_score = f64::NEG_INFINITY;
    for template in catalog.renderable() {
        if !check_compatibility(template, images).is_compatible {
            continue;
        }
        let score = score_template(template, images);
        if score > best_score {
            best_score = score;
            best = template;
        }
    }
    Some(best)
}

/// Score one template against `images`. Higher is better.
///
/// Slot-less templates that are not strips score negative infinity and
/// can never be picked.
pub fn score_template(template: &TemplateDefinition, images: &[Image]) -> f64 {
    if template.slots.is_empty() {
        return match template.layout {
            LayoutKind::HorizontalStrip | LayoutKind::VerticalStrip => {
                score_strip(template.layout, images)
            }
            _ => f64::NEG_INFINITY,
        };
    }

    let mut slot_ratios: Vec<f64> = template.slots.iter().map(|s| s.aspect_ratio).collect();
    let mut image_ratios: Vec<f64> = images.iter().map(Image::aspect_ratio).collect();
    slot_ratios.sort_by(f64::total_cmp);
    image_ratios.sort_by(f64::total_cmp);

    let pairs = slot_ratios.len().min(image_ratios.len());
    let ratio_score = if pairs > 0 {
        let total: f64 = slot_ratios
            .iter()
            .zip(&image_ratios)
            .map(|(&slot, &image)| similarity(slot, image))
            .sum();
        total / pairs as f64
    } else {
        0.0
    };

    let slots = slot_ratios.len();
    let fill_score = pairs as f64 / slots as f64;
    let overflow = image_ratios.len().saturating_sub(slots) as f64 * OVERFLOW_PENALTY;
    let underfill = slots.saturating_sub(image_ratios.len()) as f64 * UNDERFILL_PENALTY;

    let stage_score = if image_ratios.is_empty() {
        0.0
    } else {
        let mean = image_ratios.iter().sum::<f64>() / image_ratios.len() as f64;
        similarity(template.stage_aspect_ratio, mean)
    };

    ratio_score * RATIO_WEIGHT + fill_score * FILL_WEIGHT + stage_score * STAGE_WEIGHT
        - overflow
        - underfill
}

/// Sum of run lengths along the strip axis, in units of the cross axis.
fn score_strip(layout: LayoutKind, images: &[Image]) -> f64 {
    if images.is_empty() {
        return f64::NEG_INFINITY;
    }
    let length: f64 = images
        .iter()
        .map(|img| {
            let ratio = img.aspect_ratio();
            if layout == LayoutKind::HorizontalStrip {
                ratio
            } else {
                1.0 / ratio
            }
        })
        .sum();
    let penalty = if images.len() == 1 {
        LONE_STRIP_PENALTY
    } else {
        0.0
    };
    length - penalty
}

/// 1.0 for identical ratios, falling linearly in log space to 0.0 at a
/// factor of e apart.
fn similarity(a: f64, b: f64) -> f64 {
    let diff = Float::abs(Float::ln(a / b));
    (1.0 - diff.min(1.0)).clamp(0.0, 1.0)
}
