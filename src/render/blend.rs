use crate::assets::decode::Raster;
use crate::foundation::core::Canvas;
use crate::foundation::error::{UnderlayError, UnderlayResult};
use crate::foundation::math::{mul_div255_u8, opacity_to_u8};

pub type PremulRgba8 = [u8; 4];

/// Source-over for one premultiplied pixel, with `src` scaled by `opacity`.
///
/// A fully opaque source at opacity 1 replaces `dst` exactly; a transparent source leaves it
/// untouched.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let op = opacity_to_u8(opacity);
    if op == 0 || src[3] == 0 {
        return dst;
    }

    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }
    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255_u8(u16::from(dst[3]), inv));
    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> UnderlayResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(UnderlayError::render(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    if opacity_to_u8(opacity) == 0 {
        return Ok(());
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Composite `raster` over `dst`, stretching it to `canvas` first when the sizes differ.
pub fn blit_stretched(dst: &mut [u8], canvas: Canvas, raster: &Raster) -> UnderlayResult<()> {
    if raster.canvas() == canvas {
        return over_in_place(dst, &raster.rgba8_premul, 1.0);
    }
    let resized = resample_premul(raster, canvas)?;
    over_in_place(dst, &resized, 1.0)
}

/// Resize premultiplied pixels to `canvas` with a triangle filter.
///
/// Filtering premultiplied values keeps transparent edges free of color fringes.
pub fn resample_premul(raster: &Raster, canvas: Canvas) -> UnderlayResult<Vec<u8>> {
    if raster.width == 0 || raster.height == 0 {
        return Ok(vec![0; canvas.byte_len()]);
    }
    let src = image::RgbaImage::from_raw(
        raster.width,
        raster.height,
        raster.rgba8_premul.as_ref().clone(),
    )
    .ok_or_else(|| UnderlayError::render("raster buffer does not match its dimensions"))?;
    let out = image::imageops::resize(
        &src,
        canvas.width,
        canvas.height,
        image::imageops::FilterType::Triangle,
    );
    Ok(out.into_raw())
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

#[cfg(test)]
#[path = "../../tests/unit/render/blend.rs"]
mod tests;
