use crate::foundation::error::{UnderlayError, UnderlayResult};

/// Layer identifier. Unique within its own collection only.
pub type LayerId = u32;

/// A text overlay positioned in percentage, center-origin units.
///
/// Field names serialize in the camelCase form emitted by the editor UI.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextLayer {
    #[serde(default)]
    pub id: LayerId,
    #[serde(default)]
    pub text: String,
    pub font_family: String,
    /// CSS weight, 100..=900.
    pub font_weight: u16,
    /// Size at normalization scale; rendered at `font_size * TEXT_SCALE` pixels.
    pub font_size: f64,
    pub color: String,
    pub opacity: f64,
    /// Degrees, clockwise on screen.
    pub rotation: f64,
    /// Percent of canvas width from center, rightward positive.
    pub left: f64,
    /// Percent of canvas height from center, upward positive.
    pub top: f64,
    /// Stored for the editor; the compositor does not paint shadows.
    #[serde(default = "default_shadow_color")]
    pub shadow_color: String,
    #[serde(default = "default_shadow_size")]
    pub shadow_size: f64,
}

fn default_shadow_color() -> String {
    "rgba(0, 0, 0, 0.8)".to_string()
}

fn default_shadow_size() -> f64 {
    4.0
}

impl Default for TextLayer {
    fn default() -> Self {
        Self {
            id: 0,
            text: "edit".to_string(),
            font_family: "Inter".to_string(),
            font_weight: 800,
            font_size: 200.0,
            color: "white".to_string(),
            opacity: 1.0,
            rotation: 0.0,
            left: 0.0,
            top: 0.0,
            shadow_color: default_shadow_color(),
            shadow_size: default_shadow_size(),
        }
    }
}

impl TextLayer {
    /// Check numeric ranges. Colors are checked at render time, where a bad one is skipped.
    pub fn validate(&self) -> UnderlayResult<()> {
        if !(100..=900).contains(&self.font_weight) {
            return Err(UnderlayError::validation(format!(
                "text fontWeight must be within 100..=900, got {}",
                self.font_weight
            )));
        }
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(UnderlayError::validation(
                "text fontSize must be finite and > 0",
            ));
        }
        validate_opacity(self.opacity)?;
        validate_finite("text", &[
            ("rotation", self.rotation),
            ("left", self.left),
            ("top", self.top),
            ("shadowSize", self.shadow_size),
        ])
    }
}

/// The primitive shapes the editor can place.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Rectangle,
    /// Radius follows `width` only; `height` is ignored for circles.
    Circle,
    Triangle,
}

/// A filled vector shape positioned in percentage, center-origin units.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeLayer {
    #[serde(default)]
    pub id: LayerId,
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    pub top: f64,
    pub left: f64,
    /// Percent of canvas width.
    pub width: f64,
    /// Percent of canvas height.
    pub height: f64,
    pub rotation: f64,
    pub color: String,
    pub opacity: f64,
}

impl Default for ShapeLayer {
    fn default() -> Self {
        Self {
            id: 0,
            kind: ShapeKind::Rectangle,
            top: 0.0,
            left: 0.0,
            width: 100.0,
            height: 100.0,
            rotation: 0.0,
            color: "#000000".to_string(),
            opacity: 1.0,
        }
    }
}

impl ShapeLayer {
    pub fn validate(&self) -> UnderlayResult<()> {
        validate_opacity(self.opacity)?;
        if self.width < 0.0 || self.height < 0.0 {
            return Err(UnderlayError::validation(
                "shape width/height must be >= 0",
            ));
        }
        validate_finite("shape", &[
            ("top", self.top),
            ("left", self.left),
            ("width", self.width),
            ("height", self.height),
            ("rotation", self.rotation),
        ])
    }
}

fn validate_opacity(opacity: f64) -> UnderlayResult<()> {
    if !(0.0..=1.0).contains(&opacity) {
        return Err(UnderlayError::validation(format!(
            "opacity must be within 0..=1, got {opacity}"
        )));
    }
    Ok(())
}

fn validate_finite(what: &str, fields: &[(&str, f64)]) -> UnderlayResult<()> {
    for (name, v) in fields {
        if !v.is_finite() {
            return Err(UnderlayError::validation(format!(
                "{what} {name} must be finite"
            )));
        }
    }
    Ok(())
}

/// Either kind of layer, for APIs that accept both.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "layer", rename_all = "lowercase")]
pub enum Layer {
    Text(TextLayer),
    Shape(ShapeLayer),
}

impl Layer {
    pub fn id(&self) -> LayerId {
        match self {
            Self::Text(t) => t.id,
            Self::Shape(s) => s.id,
        }
    }

    pub fn layer_ref(&self) -> LayerRef {
        match self {
            Self::Text(t) => LayerRef::Text(t.id),
            Self::Shape(s) => LayerRef::Shape(s.id),
        }
    }
}

/// Non-owning reference to a layer in either collection (selection only).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(tag = "layer", content = "id", rename_all = "lowercase")]
pub enum LayerRef {
    Text(LayerId),
    Shape(LayerId),
}

/// Access to the id of a collection entry.
pub trait Keyed: Clone {
    fn id(&self) -> LayerId;
    fn set_id(&mut self, id: LayerId);
}

impl Keyed for TextLayer {
    fn id(&self) -> LayerId {
        self.id
    }

    fn set_id(&mut self, id: LayerId) {
        self.id = id;
    }
}

impl Keyed for ShapeLayer {
    fn id(&self) -> LayerId {
        self.id
    }

    fn set_id(&mut self, id: LayerId) {
        self.id = id;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layers/model.rs"]
mod tests;
