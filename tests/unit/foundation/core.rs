use super::*;

#[test]
fn fit_within_keeps_aspect_and_never_upscales() {
    let c = Canvas::new(4000, 2000);
    assert_eq!(c.fit_within(1000), Canvas::new(1000, 500));

    let small = Canvas::new(300, 200);
    assert_eq!(small.fit_within(1000), small);
}

#[test]
fn fit_within_keeps_thin_edges_visible() {
    let c = Canvas::new(10_000, 1);
    assert_eq!(c.fit_within(100), Canvas::new(100, 1));
}

#[test]
fn empty_canvas_is_detected() {
    assert!(Canvas::new(0, 10).is_empty());
    assert!(Canvas::new(10, 0).is_empty());
    assert!(!Canvas::new(1, 1).is_empty());
    assert_eq!(Canvas::new(3, 2).byte_len(), 24);
}

#[test]
fn premultiply_rounds_to_nearest() {
    let c = Rgba8Premul::from_straight_rgba(255, 128, 0, 128);
    assert_eq!(c.to_array(), [128, 64, 0, 128]);
    assert_eq!(Rgba8Premul::transparent().to_array(), [0, 0, 0, 0]);
}
