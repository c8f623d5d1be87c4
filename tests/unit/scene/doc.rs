use super::*;
use serde_json::json;

fn temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("underlay-doc-{tag}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn minimal_doc_parses_with_defaults() {
    let doc = SceneDoc::from_json(r#"{"base": "photo.png"}"#).unwrap();
    assert_eq!(doc.base, PathBuf::from("photo.png"));
    assert!(doc.cutout.is_none() && doc.shapes.is_empty() && doc.texts.is_empty());
    assert!(doc.validate().is_ok());
}

#[test]
fn unknown_fields_are_serde_errors() {
    let err = SceneDoc::from_json(r#"{"base": "a.png", "layers": []}"#).unwrap_err();
    assert!(matches!(err, UnderlayError::Serde(_)));
}

#[test]
fn validate_checks_layers() {
    let mut doc = SceneDoc::from_json(r#"{"base": "a.png"}"#).unwrap();
    let mut s = ShapeLayer::default();
    s.opacity = 2.0;
    doc.shapes.push(s);
    assert!(matches!(doc.validate(), Err(UnderlayError::Validation(_))));
}

#[test]
fn from_path_resolves_relative_images_and_loads() {
    let dir = temp_dir("load");
    image::RgbaImage::from_pixel(4, 2, image::Rgba([0, 0, 255, 255]))
        .save(dir.join("base.png"))
        .unwrap();
    let scene_json = json!({
        "base": "base.png",
        "cutout": "missing.png",
        "shapes": [{
            "id": 1, "type": "rectangle", "top": 0, "left": 0,
            "width": 50, "height": 50, "rotation": 0, "color": "red", "opacity": 1
        }]
    });
    let path = dir.join("scene.json");
    std::fs::write(&path, scene_json.to_string()).unwrap();

    let doc = SceneDoc::from_path(&path).unwrap();
    assert_eq!(doc.base, dir.join("base.png"));
    let scene = doc.load().unwrap();
    assert_eq!(scene.base_image().unwrap().canvas(), crate::foundation::core::Canvas::new(4, 2));
    assert!(scene.cutout_image().is_none());
    assert_eq!(scene.shapes().len(), 1);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn round_trips_through_pretty_json() {
    let doc = SceneDoc {
        base: "b.png".into(),
        cutout: Some("c.png".into()),
        shapes: vec![ShapeLayer::default()],
        texts: vec![TextLayer::default()],
        render: RenderSettings::default(),
    };
    let back = SceneDoc::from_json(&doc.to_json_pretty().unwrap()).unwrap();
    assert_eq!(back, doc);
}
