//! Assign images to a resolved template's slots.

use alloc::format;
use alloc::vec::Vec;

use crate::asset::Image;
use crate::catalog::{TemplateDefinition, TemplateSlot};

/// A slot paired with the image assigned to it, if any.
#[derive(Clone, Debug, PartialEq)]
pub struct SlotPlacement<'a> {
    pub slot: TemplateSlot,
    pub image: Option<&'a Image>,
}

/// Slot assignments plus the images that did not fit.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlacementResult<'a> {
    /// In the template's slot order.
    pub placements: Vec<SlotPlacement<'a>>,
    /// Overflow, in ascending aspect-ratio order.
    pub unused: Vec<&'a Image>,
}

impl<'a> PlacementResult<'a> {
    /// Placements that received an image, in slot order.
    pub fn filled(&self) -> impl Iterator<Item = (&TemplateSlot, &'a Image)> {
        self.placements
            .iter()
            .filter_map(|p| p.image.map(|img| (&p.slot, img)))
    }
}

/// Pair `images` with the slots of `template`.
///
/// Strips get one synthesized slot per image, in input order, shaped like
/// that image. Slotted templates pair slots and images by aspect-ratio
/// rank: the narrowest slot receives the narrowest image, and so on.
/// Images beyond the slot count are returned as unused, still in the
/// ascending order the ranking produced.
pub fn map_to_slots<'a>(template: &TemplateDefinition, images: &'a [Image]) -> PlacementResult<'a> {
    if images.is_empty() {
        return PlacementResult::default();
    }

    if template.layout.is_strip() {
        let placements = images
            .iter()
            .enumerate()
            .map(|(i, img)| SlotPlacement {
                slot: TemplateSlot::new(format!("{}-{i}", template.id), img.aspect_ratio()),
                image: Some(img),
            })
            .collect();
        return PlacementResult {
            placements,
            unused: Vec::new(),
        };
    }

    if template.slots.is_empty() {
        return PlacementResult {
            placements: Vec::new(),
            unused: images.iter().collect(),
        };
    }

    let mut slot_order: Vec<usize> = (0..template.slots.len()).collect();
    slot_order.sort_by(|&a, &b| {
        template.slots[a]
            .aspect_ratio
            .total_cmp(&template.slots[b].aspect_ratio)
    });
    let mut ranked: Vec<&Image> = images.iter().collect();
    ranked.sort_by(|a, b| a.aspect_ratio().total_cmp(&b.aspect_ratio()));

    let mut placements: Vec<SlotPlacement<'a>> = template
        .slots
        .iter()
        .map(|slot| SlotPlacement {
            slot: slot.clone(),
            image: None,
        })
        .collect();
    for (&slot_index, &img) in slot_order.iter().zip(&ranked) {
        placements[slot_index].image = Some(img);
    }

    let unused = ranked.split_off(ranked.len().min(template.slots.len()));
    PlacementResult { placements, unused }
}
