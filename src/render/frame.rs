use crate::assets::decode::unpremultiply_rgba8_in_place;
use crate::foundation::core::Canvas;
use crate::foundation::math::Fnv1a64;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Rendered composite in tightly packed RGBA8.
pub struct Frame {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Row-major pixel bytes.
    pub data: Vec<u8>,
    /// Whether color channels are premultiplied by alpha.
    pub premultiplied: bool,
}

impl Frame {
    /// Blank premultiplied frame filled with `rgba8_premul`.
    pub fn filled(canvas: Canvas, rgba8_premul: [u8; 4]) -> Self {
        Self {
            width: canvas.width,
            height: canvas.height,
            data: rgba8_premul.repeat(canvas.pixel_count()),
            premultiplied: true,
        }
    }

    pub fn canvas(&self) -> Canvas {
        Canvas::new(self.width, self.height)
    }

    /// Pixel at `(x, y)` in the frame's own alpha convention.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Convert to straight alpha in place, as image encoders expect.
    pub fn into_straight(mut self) -> Self {
        if self.premultiplied {
            unpremultiply_rgba8_in_place(&mut self.data);
            self.premultiplied = false;
        }
        self
    }

    /// Stable 64-bit hash of dimensions and pixel bytes.
    pub fn fingerprint(&self) -> u64 {
        let mut h = Fnv1a64::new_default();
        h.write_u32(self.width);
        h.write_u32(self.height);
        h.write_bytes(&[u8::from(self.premultiplied)]);
        h.write_bytes(&self.data);
        h.finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
