use crate::layers::model::{LayerRef, ShapeKind};

/// Editor UI event, as sent by the control panel.
///
/// Serialized with a `"type"` tag in snake_case, e.g.
/// `{"type": "update_attribute", "target": {"layer": "text", "id": 1}, "key": "left", "value": 12}`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiEvent {
    /// Add a text layer with the editor defaults, optionally with its own text.
    AddText {
        #[serde(default)]
        text: Option<String>,
    },
    /// Add a shape with the editor defaults.
    AddShape {
        #[serde(default)]
        kind: ShapeKind,
    },
    /// Set one attribute (camelCase key) on a layer.
    UpdateAttribute {
        target: LayerRef,
        key: String,
        value: serde_json::Value,
    },
    Remove {
        target: LayerRef,
    },
    Duplicate {
        target: LayerRef,
    },
    /// Change the selection; `null` clears it.
    Select {
        #[serde(default)]
        target: Option<LayerRef>,
    },
}
