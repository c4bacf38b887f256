//! Greedy shortest-column masonry packing.
//!
//! Items keep their placement order and each goes into whichever column is
//! currently shortest (leftmost on ties). Every item is exactly one column
//! wide and as tall as its image's aspect ratio demands.

use alloc::vec;
use alloc::vec::Vec;

use crate::asset::Image;
use crate::slots::SlotPlacement;

/// One packed rectangle.
#[derive(Clone, Debug, PartialEq)]
pub struct MasonryItem<'a> {
    /// Slot id of the placement this item came from.
    pub id: &'a str,
    /// Index into the placement list passed to [`pack_masonry`].
    pub placement: usize,
    pub image: &'a Image,
    pub column: usize,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Packed layout in content coordinates (origin at the top-left of the
/// first column).
#[derive(Clone, Debug, PartialEq)]
pub struct MasonryLayout<'a> {
    pub items: Vec<MasonryItem<'a>>,
    pub width: f64,
    pub height: f64,
    pub column_width: f64,
    pub gap: f64,
    pub columns: usize,
    /// Running height of each column, trailing gap included.
    pub column_heights: Vec<f64>,
}

/// Pack the filled placements into `columns` columns of `column_width`.
///
/// Returns `None` when no placement has an image, when `columns` is 0, or
/// when `column_width` is not positive. A negative gap is treated as 0.
pub fn pack_masonry<'a>(
    placements: &'a [SlotPlacement<'a>],
    columns: usize,
    column_width: f64,
    gap: f64,
) -> Option<MasonryLayout<'a>> {
    if columns == 0 || !(column_width > 0.0) {
        return None;
    }
    let gap = if gap > 0.0 { gap } else { 0.0 };

    let mut column_heights = vec![0.0_f64; columns];
    let mut items = Vec::new();
    for (index, placement) in placements.iter().enumerate() {
        let Some(image) = placement.image else {
            continue;
        };
        let ratio = image.aspect_ratio();
        let height = if ratio > 0.0 {
            column_width / ratio
        } else {
            column_width
        };

        let mut column = 0;
        for (c, &h) in column_heights.iter().enumerate().skip(1) {
            if h < column_heights[column] {
                column = c;
            }
        }

        items.push(MasonryItem {
            id: placement.slot.id.as_str(),
            placement: index,
            image,
            column,
            left: column as f64 * (column_width + gap),
            top: column_heights[column],
            width: column_width,
            height,
        });
        column_heights[column] += height + gap;
    }

    if items.is_empty() {
        return None;
    }

    let tallest = column_heights.iter().copied().fold(0.0_f64, f64::max);
    let height = if tallest > 0.0 { tallest - gap } else { tallest };
    let width = columns as f64 * column_width + gap * (columns - 1) as f64;

    Some(MasonryLayout {
        items,
        width,
        height: height.max(0.0),
        column_width,
        gap,
        columns,
        column_heights,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TemplateSlot;
    use alloc::format;

    fn filled(images: &[Image]) -> Vec<SlotPlacement<'_>> {
        images
            .iter()
            .enumerate()
            .map(|(i, img)| SlotPlacement {
                slot: TemplateSlot::new(format!("s{i}"), img.aspect_ratio()),
                image: Some(img),
            })
            .collect()
    }

    fn squares(n: usize) -> Vec<Image> {
        (0..n).map(|i| Image::new(format!("{i}"), 50, 50)).collect()
    }

    // ── null cases ──────────────────────────────────────────────────────

    #[test]
    fn rejects_empty_and_bad_geometry() {
        let images = squares(2);
        let p = filled(&images);
        assert!(pack_masonry(&[], 2, 100.0, 0.0).is_none());
        assert!(pack_masonry(&p, 0, 100.0, 0.0).is_none());
        assert!(pack_masonry(&p, 2, 0.0, 0.0).is_none());
        assert!(pack_masonry(&p, 2, -5.0, 0.0).is_none());
        assert!(pack_masonry(&p, 2, f64::NAN, 0.0).is_none());
    }

    #[test]
    fn rejects_placements_without_images() {
        let empty = [SlotPlacement {
            slot: TemplateSlot::new("a", 1.0),
            image: None,
        }];
        assert!(pack_masonry(&empty, 3, 100.0, 4.0).is_none());
    }

    // ── packing ─────────────────────────────────────────────────────────

    #[test]
    fn four_squares_two_columns_balance() {
        let images = squares(4);
        let p = filled(&images);
        let layout = pack_masonry(&p, 2, 100.0, 0.0).unwrap();
        assert_eq!(layout.column_heights, vec![200.0, 200.0]);
        assert_eq!(layout.height, 200.0);
        assert_eq!(layout.width, 200.0);
        let columns: Vec<usize> = layout.items.iter().map(|i| i.column).collect();
        assert_eq!(columns, vec![0, 1, 0, 1]);
    }

    #[test]
    fn shortest_column_wins_with_gap() {
        let images = [
            Image::new("tall", 100, 200),
            Image::new("sq", 100, 100),
            Image::new("wide", 200, 100),
            Image::new("next", 100, 100),
        ];
        let p = filled(&images);
        let layout = pack_masonry(&p, 2, 100.0, 10.0).unwrap();
        let at: Vec<(usize, f64, f64)> = layout
            .items
            .iter()
            .map(|i| (i.column, i.left, i.top))
            .collect();
        assert_eq!(
            at,
            vec![(0, 0.0, 0.0), (1, 110.0, 0.0), (1, 110.0, 110.0), (1, 110.0, 170.0)]
        );
        assert_eq!(layout.column_heights, vec![210.0, 280.0]);
        assert_eq!(layout.height, 270.0);
        assert_eq!(layout.width, 210.0);
    }

    #[test]
    fn keeps_placement_order_and_indices() {
        let images = squares(2);
        let p = vec![
            SlotPlacement {
                slot: TemplateSlot::new("empty", 1.0),
                image: None,
            },
            SlotPlacement {
                slot: TemplateSlot::new("x", 1.0),
                image: Some(&images[1]),
            },
            SlotPlacement {
                slot: TemplateSlot::new("y", 1.0),
                image: Some(&images[0]),
            },
        ];
        let layout = pack_masonry(&p, 3, 10.0, 0.0).unwrap();
        let order: Vec<(&str, usize, &str)> = layout
            .items
            .iter()
            .map(|i| (i.id, i.placement, i.image.id.as_str()))
            .collect();
        assert_eq!(order, vec![("x", 1, "1"), ("y", 2, "0")]);
        assert_eq!(layout.column_heights, vec![10.0, 10.0, 0.0]);
    }

    #[test]
    fn zero_height_image_is_square() {
        let images = [Image::new("flat", 100, 0)];
        let p = filled(&images);
        let layout = pack_masonry(&p, 1, 80.0, 0.0).unwrap();
        assert_eq!(layout.items[0].height, 80.0);
    }

    #[test]
    fn negative_gap_is_zero() {
        let images = squares(2);
        let p = filled(&images);
        let layout = pack_masonry(&p, 1, 10.0, -3.0).unwrap();
        assert_eq!(layout.gap, 0.0);
        assert_eq!(layout.height, 20.0);
    }

    #[test]
    fn column_spread_bounded_by_tallest_item() {
        let images: Vec<Image> = (0..17)
            .map(|i| Image::new(format!("{i}"), 40 + (i * 53 % 170), 40 + (i * 31 % 190)))
            .collect();
        let p = filled(&images);
        for columns in 1..6 {
            let layout = pack_masonry(&p, columns, 120.0, 0.0).unwrap();
            let tallest_item = layout.items.iter().map(|i| i.height).fold(0.0, f64::max);
            let max = layout.column_heights.iter().copied().fold(0.0, f64::max);
            let min = layout
                .column_heights
                .iter()
                .copied()
                .fold(f64::INFINITY, f64::min);
            assert!(max - min <= tallest_item + 1e-9);
        }
    }
}
