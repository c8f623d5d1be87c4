use std::path::Path;
use std::time::SystemTime;

use anyhow::Context;

use crate::foundation::error::{UnderlayError, UnderlayResult};
use crate::render::frame::Frame;

/// Download name for an export made at `time`: `edited-image-<UTC ISO-8601>.png` with `:` and
/// `.` replaced by `-`.
pub fn export_file_name(time: SystemTime) -> String {
    let utc: chrono::DateTime<chrono::Utc> = time.into();
    format!("edited-image-{}.png", utc.format("%Y-%m-%dT%H-%M-%S-%3fZ"))
}

/// Encode a frame as PNG bytes (straight alpha).
pub fn encode_png(frame: &Frame) -> UnderlayResult<Vec<u8>> {
    let straight = frame.clone().into_straight();
    let mut out = std::io::Cursor::new(Vec::new());
    image::write_buffer_with_format(
        &mut out,
        &straight.data,
        straight.width,
        straight.height,
        image::ExtendedColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| UnderlayError::render(format!("png encode: {e}")))?;
    Ok(out.into_inner())
}

/// Write a frame to `path` as PNG.
#[tracing::instrument(skip(frame), fields(width = frame.width, height = frame.height))]
pub fn export_png(frame: &Frame, path: &Path) -> UnderlayResult<()> {
    if frame.width == 0 || frame.height == 0 {
        return Err(UnderlayError::render("cannot export an empty frame"));
    }
    let bytes = encode_png(frame)?;
    std::fs::write(path, bytes)
        .with_context(|| format!("write png to {}", path.display()))?;
    tracing::info!(path = %path.display(), "exported");
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/export/png.rs"]
mod tests;
