//! Percentage, center-origin layout to pixel space.
//!
//! Layers store `left`/`top` as percentages of the canvas measured from its center, with `top`
//! growing upward. Raster space has its origin at the top-left with `y` growing downward, so the
//! vertical axis flips here and nowhere else.

use crate::foundation::core::{Affine, Canvas, Point, Vec2};

/// Multiplier from stored text size to rendered pixel size.
pub const TEXT_SCALE: f64 = 3.0;

/// Pixel anchor of a layer positioned at `(left, top)` percent.
pub fn map(canvas: Canvas, left: f64, top: f64) -> Point {
    let w = f64::from(canvas.width);
    let h = f64::from(canvas.height);
    Point::new(w * (left + 50.0) / 100.0, h * (50.0 - top) / 100.0)
}

/// Inverse of [`map`]. A zero-sized canvas has no inverse and yields NaN.
pub fn unmap(canvas: Canvas, point: Point) -> (f64, f64) {
    let w = f64::from(canvas.width);
    let h = f64::from(canvas.height);
    (point.x * 100.0 / w - 50.0, 50.0 - point.y * 100.0 / h)
}

/// Pixel size of a shape whose extent is given in percent of the canvas.
pub fn shape_size(canvas: Canvas, width_pct: f64, height_pct: f64) -> Vec2 {
    Vec2::new(
        width_pct / 100.0 * f64::from(canvas.width),
        height_pct / 100.0 * f64::from(canvas.height),
    )
}

/// Rendered pixel size of a text layer. Independent of canvas size.
pub fn text_font_px(font_size: f64) -> f64 {
    font_size * TEXT_SCALE
}

/// Layer-local to canvas transform: rotate around the origin, then move to the anchor.
///
/// Positive degrees turn clockwise on screen since raster `y` points down.
pub fn layer_transform(canvas: Canvas, left: f64, top: f64, rotation_deg: f64) -> Affine {
    Affine::translate(map(canvas, left, top).to_vec2()) * Affine::rotate(rotation_deg.to_radians())
}

/// Offset that centers a `width x height` box on the local origin.
pub fn centered_box_offset(width: f64, height: f64) -> Vec2 {
    Vec2::new(-width / 2.0, -height / 2.0)
}

#[cfg(test)]
#[path = "../../tests/unit/transform/mapper.rs"]
mod tests;
