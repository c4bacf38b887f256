//! End-to-end layout pipeline through the public API: resolve, map, pack,
//! plan. No pixels are touched here.

use zencollage::*;

// ---- Fixtures ----

fn images(dims: &[(u32, u32)]) -> Vec<Image> {
    dims.iter()
        .enumerate()
        .map(|(i, &(w, h))| Image::new(format!("img{i}"), w, h))
        .collect()
}

/// A tiny catalog with one of everything, declared in an order that
/// differs from the built-in one.
fn fixture_catalog() -> Catalog {
    Catalog::new(vec![
        TemplateDefinition::new("strip", LayoutKind::HorizontalStrip, 2.0)
            .constraint(TemplateConstraint::min_count(2, "needs two")),
        TemplateDefinition::new("pair", LayoutKind::FixedGrid, 2.0)
            .slot(TemplateSlot::new("left", 1.0))
            .slot(TemplateSlot::new("right", 1.0)),
        TemplateDefinition::new(SMART_TEMPLATE_ID, LayoutKind::Smart, 1.0),
    ])
    .unwrap()
}

// ---- Resolution ----

#[test]
fn compatibility_is_vacuous_for_no_images() {
    let catalog = Catalog::builtin();
    for template in catalog.templates() {
        let result = check_compatibility(template, &[]);
        assert!(result.is_compatible, "{}", template.id);
        assert!(result.messages.is_empty());
    }
}

#[test]
fn orientation_constraint_fails_on_empty_set() {
    let c = TemplateConstraint::orientation(Orientation::Landscape, "wide only");
    assert!(!c.check(&[]));
}

#[test]
fn uniform_tolerance_boundary() {
    let catalog = Catalog::builtin();
    let strip = catalog.get("horizontal-strip").unwrap();
    assert!(check_compatibility(strip, &images(&[(1000, 800), (1009, 800)])).is_compatible);
    assert!(!check_compatibility(strip, &images(&[(1000, 800), (1020, 800)])).is_compatible);
}

#[test]
fn resolve_is_repeatable() {
    let catalog = Catalog::builtin();
    let set = images(&[(640, 480), (480, 640), (500, 500), (1920, 1080)]);
    for id in [SMART_TEMPLATE_ID, "masonry-wide", "horizontal-strip", "vertical-strip", "?"] {
        let first = resolve(&catalog, id, &set);
        for _ in 0..3 {
            assert_eq!(resolve(&catalog, id, &set), first);
        }
    }
}

#[test]
fn forced_smart_keeps_request_and_reasons() {
    let catalog = Catalog::builtin();
    let set = images(&[(600, 800), (610, 800)]);
    let r = resolve(&catalog, "horizontal-strip", &set);
    assert!(r.forced_smart && r.is_smart);
    assert_eq!(r.requested.unwrap().id, "horizontal-strip");
    // Portrait images fail orientation; 610 vs 600 fails 1% uniformity.
    assert_eq!(r.override_messages().len(), 2);
    // The vertical strip rejects them too (not uniform), leaving masonry.
    assert_eq!(r.effective.id, "masonry-wide");
}

#[test]
fn fixture_catalog_is_independent_of_builtin() {
    let catalog = fixture_catalog();
    assert_eq!(catalog.fallback().id, "pair");

    let one = images(&[(300, 100)]);
    let r = resolve(&catalog, "strip", &one);
    assert!(r.forced_smart);
    assert_eq!(r.effective.id, "pair");
    assert_eq!(r.requested_compatibility.messages, vec!["needs two"]);

    let two = images(&[(300, 100), (300, 100)]);
    let r = resolve(&catalog, SMART_TEMPLATE_ID, &two);
    assert_eq!(r.effective.id, "strip");
    assert!(r.requested.is_some_and(|t| t.is_dynamic()));
}

#[test]
fn equal_scores_keep_declaration_order() {
    let catalog = Catalog::new(vec![
        TemplateDefinition::new("one", LayoutKind::FixedGrid, 1.0)
            .slot(TemplateSlot::new("a", 1.0)),
        TemplateDefinition::new("two", LayoutKind::FixedGrid, 1.0)
            .slot(TemplateSlot::new("a", 1.0)),
    ])
    .unwrap();
    let set = images(&[(10, 10)]);
    assert_eq!(choose_best(&catalog, &set).unwrap().id, "one");
    assert_eq!(
        score_template(&catalog.templates()[0], &set),
        score_template(&catalog.templates()[1], &set)
    );
}

// ---- Mapping and packing ----

#[test]
fn slot_count_invariant_on_fixed_grid() {
    let catalog = fixture_catalog();
    let pair = catalog.get("pair").unwrap();
    for m in 1..6 {
        let set = images(&vec![(100, 100); m]);
        let placed = map_to_slots(pair, &set);
        assert_eq!(placed.placements.len(), 2);
        assert_eq!(placed.unused.len(), m.saturating_sub(2));
    }
}

#[test]
fn strips_preserve_input_order() {
    let catalog = Catalog::builtin();
    let strip = catalog.get("vertical-strip").unwrap();
    let set = images(&[(100, 300), (100, 100), (100, 200), (100, 150)]);
    let placed = map_to_slots(strip, &set);
    for (i, p) in placed.placements.iter().enumerate() {
        assert_eq!(p.image, Some(&set[i]));
        assert_eq!(p.slot.id, format!("vertical-strip-{i}"));
    }
}

#[test]
fn masonry_two_columns_of_squares() {
    let set = images(&[(100, 100); 4]);
    let placements: Vec<SlotPlacement<'_>> = set
        .iter()
        .map(|img| SlotPlacement {
            slot: TemplateSlot::new(img.id.clone(), 1.0),
            image: Some(img),
        })
        .collect();
    let layout = pack_masonry(&placements, 2, 100.0, 0.0).unwrap();
    assert_eq!(layout.column_heights, vec![200.0, 200.0]);
    assert_eq!((layout.width, layout.height), (200.0, 200.0));
}

// ---- Export geometry ----

#[test]
fn horizontal_strip_round_trip_geometry() {
    let catalog = Catalog::builtin();
    let strip = catalog.get("horizontal-strip").unwrap();
    let set = images(&[(200, 100), (300, 100)]);
    let placed = map_to_slots(strip, &set);
    let style = StyleOptions {
        spacing: 10.0,
        padding: 5.0,
        border_width: 0.0,
        ..StyleOptions::default()
    };
    let plan = Composition::plan(strip, &placed.placements, &style).unwrap();
    assert_eq!(plan.content_width, 510.0);
    assert_eq!(plan.content_height, 100.0);
    assert_eq!(plan.canvas, Size::new(520, 110));
    let widths: Vec<f64> = plan.draws.iter().map(|d| d.width).collect();
    assert_eq!(widths, vec![200.0, 300.0]);
}

#[test]
fn canvas_formula_holds_with_border() {
    let catalog = Catalog::builtin();
    let strip = catalog.get("horizontal-strip").unwrap();
    let set = images(&[(120, 80), (240, 80), (60, 80)]);
    let placed = map_to_slots(strip, &set);
    for (spacing, padding, border) in [(0.0, 0.0, 0.0), (3.0, 7.0, 2.0), (12.5, 0.5, 1.0)] {
        let style = StyleOptions {
            spacing,
            padding,
            border_width: border,
            ..StyleOptions::default()
        };
        let plan = Composition::plan(strip, &placed.placements, &style).unwrap();
        let expected = 420.0 + spacing * 2.0 + 2.0 * (padding + border);
        assert_eq!(plan.canvas.width, expected.ceil() as u32);
    }
}

#[test]
fn workspace_drives_the_pipeline() {
    let catalog = Catalog::builtin();
    let ws = Workspace::new()
        .add_images(images(&[(900, 1600), (900, 1600), (900, 1600)]))
        .select_template("vertical-strip")
        .set_spacing(4.0);
    let r = ws.resolve(&catalog);
    assert!(!r.is_smart);
    assert_eq!(r.effective.id, "vertical-strip");

    let placed = ws.placements(&catalog);
    let plan = Composition::plan(r.effective, &placed.placements, ws.style()).unwrap();
    assert_eq!(plan.content_width, 900.0);
    assert_eq!(plan.content_height, 1600.0 * 3.0 + 8.0);
}
