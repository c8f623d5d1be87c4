use super::*;
use crate::assets::fonts::FontSettings;
use kurbo::Shape as _;

const WHITE: [u8; 4] = [255, 255, 255, 255];
const RED: [u8; 4] = [255, 0, 0, 255];

fn compositor() -> Compositor {
    Compositor::new(RenderSettings::default(), FontBook::empty())
}

fn square(left: f64, top: f64, size: f64, color: &str) -> ShapeLayer {
    ShapeLayer {
        id: 1,
        kind: ShapeKind::Rectangle,
        top,
        left,
        width: size,
        height: size,
        rotation: 0.0,
        color: color.to_string(),
        opacity: 1.0,
    }
}

fn canvas100() -> (Canvas, Raster) {
    (Canvas::new(100, 100), Raster::solid(100, 100, WHITE))
}

#[test]
fn centered_rect_covers_twenty_pixel_square() {
    let (canvas, base) = canvas100();
    let frame = compositor()
        .render(canvas, Some(&base), &[square(0.0, 0.0, 20.0, "#ff0000")], &[], None)
        .unwrap();
    for (x, y) in [(50, 50), (41, 41), (58, 58), (41, 58), (58, 41)] {
        assert_eq!(frame.pixel(x, y), Some(RED), "({x},{y})");
    }
    for (x, y) in [(38, 50), (61, 50), (50, 38), (50, 61), (0, 0), (99, 99)] {
        assert_eq!(frame.pixel(x, y), Some(WHITE), "({x},{y})");
    }
}

#[test]
fn zero_opacity_contributes_nothing() {
    let (canvas, base) = canvas100();
    let mut c = compositor();
    let plain = c.render(canvas, Some(&base), &[], &[], None).unwrap();
    let mut hidden = square(0.0, 0.0, 50.0, "red");
    hidden.opacity = 0.0;
    let with_hidden = c.render(canvas, Some(&base), &[hidden], &[], None).unwrap();
    assert_eq!(plain, with_hidden);
}

#[test]
fn partial_opacity_blends_with_base() {
    let (canvas, base) = canvas100();
    let mut s = square(0.0, 0.0, 50.0, "#000000");
    s.opacity = 0.5;
    let frame = compositor().render(canvas, Some(&base), &[s], &[], None).unwrap();
    let px = frame.pixel(50, 50).unwrap();
    assert_eq!(px[3], 255);
    assert!((125..=130).contains(&px[0]), "{px:?}");
}

#[test]
fn later_shapes_draw_on_top() {
    let (canvas, base) = canvas100();
    let shapes = [square(0.0, 0.0, 40.0, "red"), square(0.0, 0.0, 20.0, "blue")];
    let frame = compositor().render(canvas, Some(&base), &shapes, &[], None).unwrap();
    assert_eq!(frame.pixel(50, 50), Some([0, 0, 255, 255]));
    assert_eq!(frame.pixel(33, 50), Some(RED));
}

#[test]
fn cutout_is_exact_where_opaque_and_transparent_elsewhere() {
    let (canvas, base) = canvas100();
    let mut cutout = vec![0u8; canvas.byte_len()];
    for y in 0..100usize {
        for x in 0..50usize {
            let i = (y * 100 + x) * 4;
            cutout[i..i + 4].copy_from_slice(&[0, 128, 0, 255]);
        }
    }
    let cutout = Raster::from_premul(100, 100, cutout).unwrap();
    let frame = compositor()
        .render(
            canvas,
            Some(&base),
            &[square(0.0, 0.0, 20.0, "red")],
            &[],
            Some(&cutout),
        )
        .unwrap();
    assert_eq!(frame.pixel(45, 50), Some([0, 128, 0, 255]));
    assert_eq!(frame.pixel(5, 5), Some([0, 128, 0, 255]));
    assert_eq!(frame.pixel(55, 50), Some(RED));
    assert_eq!(frame.pixel(90, 90), Some(WHITE));
}

#[test]
fn rendering_is_deterministic() {
    let (canvas, base) = canvas100();
    let mut tri = square(10.0, -5.0, 30.0, "#3af");
    tri.kind = ShapeKind::Triangle;
    tri.rotation = 33.0;
    let mut circle = square(-20.0, 20.0, 25.0, "rgba(200, 10, 10, 0.6)");
    circle.kind = ShapeKind::Circle;
    circle.opacity = 0.7;
    let shapes = [tri, circle];

    let mut c = compositor();
    let a = c.render(canvas, Some(&base), &shapes, &[], None).unwrap();
    let b = c.render(canvas, Some(&base), &shapes, &[], None).unwrap();
    let fresh = compositor().render(canvas, Some(&base), &shapes, &[], None).unwrap();
    assert_eq!(a.fingerprint(), b.fingerprint());
    assert_eq!(a, fresh);
}

#[test]
fn circle_radius_ignores_height() {
    let (canvas, base) = canvas100();
    let mut flat = square(0.0, 0.0, 40.0, "red");
    flat.kind = ShapeKind::Circle;
    flat.height = 10.0;
    let mut tall = flat.clone();
    tall.height = 90.0;

    let mut c = compositor();
    let a = c.render(canvas, Some(&base), &[flat], &[], None).unwrap();
    let b = c.render(canvas, Some(&base), &[tall], &[], None).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.pixel(50, 35), Some(RED));
    assert_eq!(a.pixel(50, 25), Some(WHITE));
}

#[test]
fn triangle_apex_points_up() {
    let (canvas, base) = canvas100();
    let mut tri = square(0.0, 0.0, 40.0, "red");
    tri.kind = ShapeKind::Triangle;
    let frame = compositor().render(canvas, Some(&base), &[tri], &[], None).unwrap();
    assert_eq!(frame.pixel(50, 33), Some(RED));
    assert_eq!(frame.pixel(35, 33), Some(WHITE));
    assert_eq!(frame.pixel(32, 68), Some(RED));
    assert_eq!(frame.pixel(50, 27), Some(WHITE));
}

#[test]
fn rotation_turns_shape_about_its_anchor() {
    let (canvas, base) = canvas100();
    let mut bar = square(0.0, 0.0, 40.0, "red");
    bar.height = 10.0;
    bar.rotation = 90.0;
    let frame = compositor().render(canvas, Some(&base), &[bar], &[], None).unwrap();
    assert_eq!(frame.pixel(50, 35), Some(RED));
    assert_eq!(frame.pixel(35, 50), Some(WHITE));
}

#[test]
fn unparseable_color_is_skipped() {
    let (canvas, base) = canvas100();
    let frame = compositor()
        .render(canvas, Some(&base), &[square(0.0, 0.0, 50.0, "not-a-color")], &[], None)
        .unwrap();
    assert!(frame.data.chunks_exact(4).all(|px| px == WHITE));
}

#[test]
fn base_is_stretched_to_canvas() {
    let base = Raster::solid(10, 10, [0, 0, 255, 255]);
    let frame = compositor()
        .render(Canvas::new(40, 20), Some(&base), &[], &[], None)
        .unwrap();
    assert_eq!((frame.width, frame.height), (40, 20));
    assert!(frame.data.chunks_exact(4).all(|px| px == [0, 0, 255, 255]));
}

#[test]
fn clear_color_and_empty_canvas() {
    let mut c = Compositor::new(
        RenderSettings {
            clear_rgba: Some([0, 0, 0, 255]),
        },
        FontBook::empty(),
    );
    let frame = c.render(Canvas::new(4, 4), None, &[], &[], None).unwrap();
    assert!(frame.data.chunks_exact(4).all(|px| px == [0, 0, 0, 255]));

    let empty = c.render(Canvas::new(0, 7), None, &[], &[], None).unwrap();
    assert!(empty.data.is_empty());
}

#[test]
fn oversized_canvas_is_a_render_error() {
    let err = compositor()
        .render(Canvas::new(70_000, 1), None, &[], &[], None)
        .unwrap_err();
    assert!(matches!(err, UnderlayError::Render(_)));
}

#[test]
fn huge_canvas_fails_before_allocating() {
    // 70000 x 70000 RGBA would need about 19.6 GB.
    let err = compositor()
        .render(Canvas::new(70_000, 70_000), None, &[], &[], None)
        .unwrap_err();
    assert!(matches!(err, UnderlayError::Render(_)));
}

#[test]
fn text_without_fonts_is_skipped() {
    let (canvas, base) = canvas100();
    let frame = compositor()
        .render(canvas, Some(&base), &[], &[TextLayer::default()], None)
        .unwrap();
    assert!(frame.data.chunks_exact(4).all(|px| px == WHITE));
}

#[test]
fn mixed_layer_list_keeps_shapes_below_text() {
    let (canvas, base) = canvas100();
    let a = square(0.0, 0.0, 40.0, "red");
    let b = square(0.0, 0.0, 20.0, "blue");
    let layers = [
        Layer::Text(TextLayer::default()),
        Layer::Shape(a.clone()),
        Layer::Shape(b.clone()),
    ];
    let mut c = compositor();
    let mixed = c.render_layers(canvas, Some(&base), &layers, None).unwrap();
    let split = c
        .render(canvas, Some(&base), &[a, b], &[TextLayer::default()], None)
        .unwrap();
    assert_eq!(mixed, split);
}

#[test]
fn text_box_center_lands_on_anchor() {
    let canvas = Canvas::new(100, 100);
    let mut layer = TextLayer::default();
    layer.text = "hi".into();
    let t = text_transform(canvas, &layer, 36.0, 40.0);
    let center = t * Point::new(18.0, 20.0);
    assert!((center.x - 50.0).abs() < 1e-9 && (center.y - 50.0).abs() < 1e-9);

    layer.rotation = 45.0;
    let t = text_transform(canvas, &layer, 36.0, 40.0);
    let center = t * Point::new(18.0, 20.0);
    assert!((center.x - 50.0).abs() < 1e-9 && (center.y - 50.0).abs() < 1e-9);
}

#[test]
fn shape_paths_are_centered() {
    let r = shape_path(ShapeKind::Rectangle, 20.0, 10.0).bounding_box();
    assert_eq!(r, Rect::new(-10.0, -5.0, 10.0, 5.0));

    let c = shape_path(ShapeKind::Circle, 20.0, 999.0).bounding_box();
    assert!((c.height() - 20.0).abs() < 0.5 && (c.width() - 20.0).abs() < 0.5);

    let t = shape_path(ShapeKind::Triangle, 20.0, 10.0).bounding_box();
    assert_eq!(t, Rect::new(-10.0, -5.0, 10.0, 5.0));
}

fn system_compositor() -> Option<Compositor> {
    let fonts = FontBook::new(&FontSettings::default());
    if fonts.is_empty() {
        return None;
    }
    Some(Compositor::new(RenderSettings::default(), fonts))
}

fn hi_layer() -> TextLayer {
    TextLayer {
        text: "hi".into(),
        font_family: "sans-serif".into(),
        font_weight: 700,
        font_size: 10.0,
        color: "#000000".into(),
        ..TextLayer::default()
    }
}

#[test]
fn text_ink_is_centered_on_anchor() {
    let Some(mut c) = system_compositor() else { return };
    let (canvas, base) = canvas100();
    let frame = c.render(canvas, Some(&base), &[], &[hi_layer()], None).unwrap();

    // Ink bounding box over clearly covered pixels, ignoring faint antialiasing.
    let (mut x0, mut y0, mut x1, mut y1) = (u32::MAX, u32::MAX, 0, 0);
    for y in 0..100 {
        for x in 0..100 {
            let px = frame.pixel(x, y).unwrap();
            if px[0] < 128 {
                x0 = x0.min(x);
                y0 = y0.min(y);
                x1 = x1.max(x);
                y1 = y1.max(y);
            }
        }
    }
    assert!(x0 <= x1, "text drew nothing");
    let cx = f64::from(x0 + x1 + 1) / 2.0;
    let cy = f64::from(y0 + y1 + 1) / 2.0;
    assert!((cx - 50.0).abs() <= 3.0, "ink x center {cx} ({x0}..={x1})");
    assert!((cy - 50.0).abs() <= 3.0, "ink y center {cy} ({y0}..={y1})");
}

#[test]
fn text_draws_above_shapes_and_below_cutout() {
    let Some(mut c) = system_compositor() else { return };
    let (canvas, base) = canvas100();
    let mut text = hi_layer();
    text.color = "#00ff00".into();
    let shapes = [square(0.0, 0.0, 100.0, "red")];

    let frame = c.render(canvas, Some(&base), &shapes, &[text.clone()], None).unwrap();
    assert!(frame.data.chunks_exact(4).any(|px| px[1] > 128));

    let cover = Raster::solid(100, 100, [0, 0, 255, 255]);
    let covered = c
        .render(canvas, Some(&base), &shapes, &[text], Some(&cover))
        .unwrap();
    assert!(covered.data.chunks_exact(4).all(|px| px == [0, 0, 255, 255]));
}
