use std::{path::Path, sync::Arc};

use crate::foundation::{
    core::Canvas,
    error::{UnderlayError, UnderlayResult},
};

#[derive(Clone, Debug, PartialEq, Eq)]
/// Decoded raster in premultiplied RGBA8 form.
///
/// Pixel storage is shared, so cloning a raster (for example into a new scene) is cheap.
pub struct Raster {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl Raster {
    /// Wrap already-premultiplied bytes, checking the buffer length.
    pub fn from_premul(width: u32, height: u32, rgba8_premul: Vec<u8>) -> UnderlayResult<Self> {
        if rgba8_premul.len() != Canvas::new(width, height).byte_len() {
            return Err(UnderlayError::decode(format!(
                "raster byte len {} does not match {width}x{height}",
                rgba8_premul.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }

    /// Wrap straight-alpha bytes, premultiplying them.
    pub fn from_straight(width: u32, height: u32, mut rgba8: Vec<u8>) -> UnderlayResult<Self> {
        premultiply_rgba8_in_place(&mut rgba8);
        Self::from_premul(width, height, rgba8)
    }

    /// A raster filled with one premultiplied color.
    pub fn solid(width: u32, height: u32, rgba8_premul: [u8; 4]) -> Self {
        let data = rgba8_premul.repeat(Canvas::new(width, height).pixel_count());
        Self {
            width,
            height,
            rgba8_premul: Arc::new(data),
        }
    }

    /// Pixel size as a [`Canvas`].
    pub fn canvas(&self) -> Canvas {
        Canvas::new(self.width, self.height)
    }

    /// Premultiplied pixel at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.rgba8_premul.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// Decode encoded image bytes (PNG, JPEG, WebP, ...) and convert to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> UnderlayResult<Raster> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| UnderlayError::decode(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Raster::from_straight(width, height, rgba.into_raw())
}

/// Read and decode an image file.
pub fn load_image(path: &Path) -> UnderlayResult<Raster> {
    let bytes = std::fs::read(path).map_err(|e| {
        UnderlayError::decode(format!("read image '{}': {e}", path.display()))
    })?;
    decode_image(&bytes)
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

pub(crate) fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = (((*c as u16) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
