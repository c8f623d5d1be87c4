use super::*;
use serde_json::json;

#[test]
fn parses_camel_case_text_keys() {
    assert_eq!(
        TextAttr::parse("fontSize", json!(120)).unwrap(),
        TextAttr::FontSize(120.0)
    );
    assert_eq!(
        TextAttr::parse("fontWeight", json!(700)).unwrap(),
        TextAttr::FontWeight(700)
    );
    assert_eq!(
        TextAttr::parse("text", json!("hello")).unwrap(),
        TextAttr::Text("hello".into())
    );
}

#[test]
fn numeric_strings_from_sliders_are_accepted() {
    assert_eq!(
        TextAttr::parse("left", json!("-12.5")).unwrap(),
        TextAttr::Left(-12.5)
    );
    assert_eq!(
        ShapeAttr::parse("width", json!("40")).unwrap(),
        ShapeAttr::Width(40.0)
    );
}

#[test]
fn unknown_keys_and_bad_values_are_validation_errors() {
    let bad = [
        TextAttr::parse("fontsize", json!(10)).err(),
        TextAttr::parse("text", json!(3)).err(),
        TextAttr::parse("opacity", json!(1.5)).err(),
        TextAttr::parse("fontWeight", json!(50)).err(),
        TextAttr::parse("left", json!(null)).err(),
    ];
    for err in bad {
        assert!(matches!(err, Some(UnderlayError::Validation(_))));
    }
    assert!(ShapeAttr::parse("type", json!("hexagon")).is_err());
    assert!(ShapeAttr::parse("height", json!(-1)).is_err());
    assert!(ShapeAttr::parse("radius", json!(1)).is_err());
}

#[test]
fn apply_touches_only_the_named_field() {
    let mut t = TextLayer::default();
    t.id = 3;
    TextAttr::parse("color", json!("#ff0000")).unwrap().apply(&mut t);
    assert_eq!(t.color, "#ff0000");
    let mut expected = TextLayer::default();
    expected.id = 3;
    expected.color = "#ff0000".into();
    assert_eq!(t, expected);
}

#[test]
fn whole_update_replaces_record_but_keeps_id() {
    let mut s = ShapeLayer::default();
    s.id = 2;
    let attr = ShapeAttr::parse(
        "update",
        json!({
            "id": 77,
            "type": "circle",
            "top": 5.0,
            "left": 6.0,
            "width": 30.0,
            "height": 10.0,
            "rotation": 15.0,
            "color": "blue",
            "opacity": 0.25
        }),
    )
    .unwrap();
    attr.apply(&mut s);
    assert_eq!(s.id, 2);
    assert_eq!(s.kind, ShapeKind::Circle);
    assert_eq!(s.color, "blue");
    assert_eq!(s.opacity, 0.25);
}

#[test]
fn whole_update_is_validated() {
    let mut bad = serde_json::to_value(TextLayer::default()).unwrap();
    bad["fontWeight"] = json!(1000);
    assert!(TextAttr::parse("update", bad).is_err());
}
