use alloc::sync::Arc;

use image::RgbaImage;
use image::imageops::{self, FilterType};
use log::debug;
use tiny_skia::{
    ColorU8, FillRule, FilterQuality, Mask, Paint, Path, PathBuilder, Pixmap, PixmapPaint, Rect,
    Stroke, Transform,
};

use super::ExportError;
use crate::color::Color;
use crate::compose::{Composition, DrawOp, RoundedRect};

/// Paint the frame, then every draw clipped to the inner frame.
///
/// `bitmaps[i]` is the decoded source of `plan.draws[i]`.
pub(super) fn composite(
    plan: &Composition<'_>,
    bitmaps: &[Arc<RgbaImage>],
) -> Result<Pixmap, ExportError> {
    let (width, height) = (plan.canvas.width, plan.canvas.height);
    let surface = ExportError::Surface { width, height };
    let mut pixmap = Pixmap::new(width, height).ok_or(surface)?;

    if let Some(outer) = rounded_rect_path(plan.outer_rect()) {
        pixmap.fill_path(
            &outer,
            &solid(plan.style.background),
            FillRule::Winding,
            Transform::identity(),
            None,
        );
        if plan.style.border_width > 0.0 {
            let stroke = Stroke {
                width: plan.style.border_width as f32,
                ..Stroke::default()
            };
            pixmap.stroke_path(
                &outer,
                &solid(plan.style.border),
                &stroke,
                Transform::identity(),
                None,
            );
        }
    }

    let Some(inner) = rounded_rect_path(plan.inner_rect()) else {
        debug!("border covers the canvas; no images drawn");
        return Ok(pixmap);
    };
    let mut clip = Mask::new(width, height).ok_or(ExportError::Surface { width, height })?;
    clip.fill_path(&inner, FillRule::Winding, true, Transform::identity());

    for (op, bitmap) in plan.draws.iter().zip(bitmaps) {
        draw(&mut pixmap, op, bitmap, &clip)?;
    }
    Ok(pixmap)
}

fn solid(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint
}

/// Resample `bitmap` into the draw rectangle.
///
/// The bulk of the scaling is done with Lanczos3 to the nearest whole size;
/// the remaining sub-pixel scale and the placement go through the draw
/// transform.
fn draw(
    pixmap: &mut Pixmap,
    op: &DrawOp<'_>,
    bitmap: &RgbaImage,
    clip: &Mask,
) -> Result<(), ExportError> {
    let target_w = (op.width.round() as u32).max(1);
    let target_h = (op.height.round() as u32).max(1);
    let resized;
    let source = if bitmap.dimensions() == (target_w, target_h) {
        bitmap
    } else {
        resized = imageops::resize(bitmap, target_w, target_h, FilterType::Lanczos3);
        &resized
    };

    let layer = to_pixmap(source)?;
    let transform = Transform::from_row(
        (op.width / target_w as f64) as f32,
        0.0,
        0.0,
        (op.height / target_h as f64) as f32,
        op.x as f32,
        op.y as f32,
    );
    let paint = PixmapPaint {
        quality: FilterQuality::Bicubic,
        ..PixmapPaint::default()
    };
    pixmap.draw_pixmap(0, 0, layer.as_ref(), &paint, transform, Some(clip));
    Ok(())
}

/// Straight RGBA8 to a premultiplied tiny-skia layer.
fn to_pixmap(bitmap: &RgbaImage) -> Result<Pixmap, ExportError> {
    let (width, height) = bitmap.dimensions();
    let mut layer = Pixmap::new(width, height).ok_or(ExportError::Surface { width, height })?;
    for (dst, src) in layer.pixels_mut().iter_mut().zip(bitmap.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Ok(layer)
}

/// Rounded rectangle with quadratic corners. `None` when the rectangle has
/// no area.
fn rounded_rect_path(rect: RoundedRect) -> Option<Path> {
    if !(rect.width > 0.0 && rect.height > 0.0) {
        return None;
    }
    let (x, y) = (rect.x as f32, rect.y as f32);
    let (w, h, r) = (rect.width as f32, rect.height as f32, rect.radius as f32);
    if r <= 0.0 {
        return Rect::from_xywh(x, y, w, h).map(PathBuilder::from_rect);
    }

    let mut pb = PathBuilder::new();
    pb.move_to(x + r, y);
    pb.line_to(x + w - r, y);
    pb.quad_to(x + w, y, x + w, y + r);
    pb.line_to(x + w, y + h - r);
    pb.quad_to(x + w, y + h, x + w - r, y + h);
    pb.line_to(x + r, y + h);
    pb.quad_to(x, y + h, x, y + h - r);
    pb.line_to(x, y + r);
    pb.quad_to(x, y, x + r, y);
    pb.close();
    pb.finish()
}
