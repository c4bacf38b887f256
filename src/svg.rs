//! SVG wireframe of an export composition.
//!
//! Draws the canvas with its background and border, the dashed clip
//! outline, and every draw rectangle labelled with its slot id, scaled
//! into one fixed-size panel. Handy for checking a layout without decoding
//! any pixels.
//!
//! # Example
//!
//! ```
//! use zencollage::{Catalog, Composition, Image, StyleOptions, map_to_slots};
//! use zencollage::svg::render_composition_svg;
//!
//! let catalog = Catalog::builtin();
//! let masonry = catalog.get("masonry-wide").unwrap();
//! let images = [Image::new("a", 800, 600), Image::new("b", 600, 800)];
//! let placed = map_to_slots(masonry, &images);
//! let plan = Composition::plan(masonry, &placed.placements, &StyleOptions::default()).unwrap();
//!
//! let svg = render_composition_svg(&plan);
//! assert!(svg.starts_with("<svg"));
//! ```

use alloc::format;
use alloc::string::String;

use crate::compose::{Composition, RoundedRect};

/// Maximum width of the drawing panel.
const MAX_PANEL_W: f64 = 480.0;
/// Maximum height of the drawing panel.
const MAX_PANEL_H: f64 = 360.0;
/// Horizontal margin.
const MARGIN_X: f64 = 40.0;
/// Top margin, above the title.
const MARGIN_TOP: f64 = 30.0;
/// Height of the title line above the panel.
const LABEL_H: f64 = 22.0;
/// Space under the panel for the annotation.
const FOOTER_H: f64 = 40.0;

/// Render a complete SVG document for `plan`.
pub fn render_composition_svg(plan: &Composition<'_>) -> String {
    let (panel_w, panel_h, scale) = scale_to_fit(plan.canvas.width, plan.canvas.height);
    let total_w = panel_w.max(MAX_PANEL_W) + MARGIN_X * 2.0;
    let total_h = MARGIN_TOP + LABEL_H + panel_h + FOOTER_H;
    let center_x = total_w / 2.0;
    let panel_x = center_x - panel_w / 2.0;
    let panel_y = MARGIN_TOP + LABEL_H;

    let mut svg = String::with_capacity(2048 + plan.draws.len() * 256);
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        total_w as u32, total_h as u32, total_w, total_h
    ));
    svg.push('\n');

    svg.push_str(
        r##"<style>
  text { font-family: "Consolas", "DejaVu Sans Mono", "Courier New", monospace; }
  .label { font-size: 13px; font-weight: bold; fill: #333; }
  .annotation { font-size: 11px; fill: #666; }
  .canvas { fill: none; stroke: #999; stroke-width: 1; stroke-dasharray: 2,2; }
  .clip { fill: none; stroke: #c0392b; stroke-width: 1; stroke-dasharray: 4,2; }
  .draw { fill: #6ba3d6; fill-opacity: 0.8; stroke: #2c6faa; stroke-width: 1; }
  .slot { font-size: 10px; fill: #fff; }
  @media (prefers-color-scheme: dark) {
    .label { fill: #e0e0e0; }
    .annotation { fill: #aaa; }
    .canvas { stroke: #555; }
    .draw { fill: #3a72a4; stroke: #5a9fd4; }
  }
</style>
"##,
    );

    svg.push_str(&format!(
        r#"<text x="{}" y="{}" class="label" text-anchor="middle">{}</text>"#,
        center_x,
        MARGIN_TOP + 14.0,
        escape_xml(&format!(
            "{}  {}×{}",
            plan.layout, plan.canvas.width, plan.canvas.height
        ))
    ));
    svg.push('\n');

    let to_panel = |r: RoundedRect| RoundedRect {
        x: panel_x + r.x * scale,
        y: panel_y + r.y * scale,
        width: r.width * scale,
        height: r.height * scale,
        radius: r.radius * scale,
    };

    // Canvas bounds.
    svg.push_str(&format!(
        r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" class="canvas"/>"#,
        panel_x, panel_y, panel_w, panel_h
    ));
    svg.push('\n');

    // Background and border.
    let outer = to_panel(plan.outer_rect());
    if outer.width > 0.0 && outer.height > 0.0 {
        let style = &plan.style;
        let stroke = if style.border_width > 0.0 {
            format!(
                r#" stroke="{}" stroke-width="{:.1}""#,
                style.border,
                style.border_width * scale
            )
        } else {
            String::new()
        };
        svg.push_str(&format!(
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" rx="{:.1}" fill="{}"{}/>"#,
            outer.x, outer.y, outer.width, outer.height, outer.radius, style.background, stroke
        ));
        svg.push('\n');
    }

    for op in &plan.draws {
        let x = panel_x + op.x * scale;
        let y = panel_y + op.y * scale;
        let w = op.width * scale;
        let h = op.height * scale;
        svg.push_str(&format!(
            r#"<rect x="{x:.1}" y="{y:.1}" width="{w:.1}" height="{h:.1}" class="draw"/>"#
        ));
        svg.push('\n');
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" class="slot">{}</text>"#,
            x + 3.0,
            y + 12.0,
            escape_xml(op.slot_id)
        ));
        svg.push('\n');
    }

    // Clip outline on top so it stays visible.
    let inner = to_panel(plan.inner_rect());
    if inner.width > 0.0 && inner.height > 0.0 {
        svg.push_str(&format!(
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" rx="{:.1}" class="clip"/>"#,
            inner.x, inner.y, inner.width, inner.height, inner.radius
        ));
        svg.push('\n');
    }

    svg.push_str(&format!(
        r#"<text x="{}" y="{:.1}" class="annotation" text-anchor="middle">{}</text>"#,
        center_x,
        panel_y + panel_h + 16.0,
        escape_xml(&format!(
            "content {:.0}×{:.0}, offset {}, {} images",
            plan.content_width,
            plan.content_height,
            plan.offset,
            plan.draws.len()
        ))
    ));
    svg.push('\n');

    svg.push_str("</svg>\n");
    svg
}

/// Panel size for a canvas and the factor that maps canvas units into it.
fn scale_to_fit(width: u32, height: u32) -> (f64, f64, f64) {
    let w = width.max(1) as f64;
    let h = height.max(1) as f64;
    let scale = (MAX_PANEL_W / w).min(MAX_PANEL_H / h);
    (w * scale, h * scale, scale)
}

/// Escape special characters for XML text content.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
