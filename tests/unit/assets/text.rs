use super::*;
use crate::assets::fonts::{FontBook, FontSettings};

fn any_font() -> Option<ResolvedFont> {
    FontBook::new(&FontSettings::default()).resolve("sans-serif", 400)
}

#[test]
fn rejects_non_positive_size() {
    let Some(font) = any_font() else { return };
    let mut engine = TextLayoutEngine::new();
    assert!(
        engine
            .layout_line("x", &font, 0.0, 400, TextBrushRgba8::default())
            .is_err()
    );
    assert!(
        engine
            .layout_line("x", &font, f32::NAN, 400, TextBrushRgba8::default())
            .is_err()
    );
}

#[test]
fn single_line_layout_has_extent_and_no_wrapping() {
    let Some(font) = any_font() else { return };
    let mut engine = TextLayoutEngine::new();
    let layout = engine
        .layout_line(
            "a fairly long line that must never wrap",
            &font,
            30.0,
            800,
            TextBrushRgba8::default(),
        )
        .unwrap();
    assert_eq!(layout.lines().count(), 1);
    assert!(layout.width() > 0.0);
    assert!(layout.height() > 0.0);
}

#[test]
fn registered_family_is_reused() {
    let Some(font) = any_font() else { return };
    let mut engine = TextLayoutEngine::new();
    let a = engine.family_for(&font).unwrap();
    let b = engine.family_for(&font).unwrap();
    assert_eq!(a, b);
    assert_eq!(engine.registered.len(), 1);
}
