use serde_json::Value;

use crate::foundation::error::{UnderlayError, UnderlayResult};
use crate::layers::model::{ShapeKind, ShapeLayer, TextLayer};

/// A single typed edit to a [`TextLayer`].
#[derive(Clone, Debug, PartialEq)]
pub enum TextAttr {
    Text(String),
    FontFamily(String),
    FontWeight(u16),
    FontSize(f64),
    Color(String),
    Opacity(f64),
    Rotation(f64),
    Left(f64),
    Top(f64),
    ShadowColor(String),
    ShadowSize(f64),
    /// Replace every field except the id.
    Whole(Box<TextLayer>),
}

/// A single typed edit to a [`ShapeLayer`].
#[derive(Clone, Debug, PartialEq)]
pub enum ShapeAttr {
    Kind(ShapeKind),
    Top(f64),
    Left(f64),
    Width(f64),
    Height(f64),
    Rotation(f64),
    Color(String),
    Opacity(f64),
    /// Replace every field except the id.
    Whole(Box<ShapeLayer>),
}

impl TextAttr {
    /// Parse an editor attribute update. Keys are the camelCase field names, plus `"update"`
    /// carrying a whole layer record.
    pub fn parse(key: &str, value: Value) -> UnderlayResult<Self> {
        Ok(match key {
            "text" => Self::Text(string(key, value)?),
            "fontFamily" => Self::FontFamily(string(key, value)?),
            "fontWeight" => {
                let w = number(key, &value)?;
                if !(100.0..=900.0).contains(&w) {
                    return Err(UnderlayError::validation(format!(
                        "fontWeight must be within 100..=900, got {w}"
                    )));
                }
                Self::FontWeight(w.round() as u16)
            }
            "fontSize" => {
                let s = number(key, &value)?;
                if s <= 0.0 {
                    return Err(UnderlayError::validation("fontSize must be > 0"));
                }
                Self::FontSize(s)
            }
            "color" => Self::Color(string(key, value)?),
            "opacity" => Self::Opacity(opacity(&value)?),
            "rotation" => Self::Rotation(number(key, &value)?),
            "left" => Self::Left(number(key, &value)?),
            "top" => Self::Top(number(key, &value)?),
            "shadowColor" => Self::ShadowColor(string(key, value)?),
            "shadowSize" => Self::ShadowSize(number(key, &value)?),
            "update" => {
                let layer: TextLayer = serde_json::from_value(value)
                    .map_err(|e| UnderlayError::validation(format!("update: {e}")))?;
                layer.validate()?;
                Self::Whole(Box::new(layer))
            }
            other => {
                return Err(UnderlayError::validation(format!(
                    "unknown text attribute '{other}'"
                )));
            }
        })
    }

    pub fn apply(self, layer: &mut TextLayer) {
        match self {
            Self::Text(v) => layer.text = v,
            Self::FontFamily(v) => layer.font_family = v,
            Self::FontWeight(v) => layer.font_weight = v,
            Self::FontSize(v) => layer.font_size = v,
            Self::Color(v) => layer.color = v,
            Self::Opacity(v) => layer.opacity = v,
            Self::Rotation(v) => layer.rotation = v,
            Self::Left(v) => layer.left = v,
            Self::Top(v) => layer.top = v,
            Self::ShadowColor(v) => layer.shadow_color = v,
            Self::ShadowSize(v) => layer.shadow_size = v,
            Self::Whole(v) => {
                let id = layer.id;
                *layer = *v;
                layer.id = id;
            }
        }
    }
}

impl ShapeAttr {
    /// Parse an editor attribute update; see [`TextAttr::parse`].
    pub fn parse(key: &str, value: Value) -> UnderlayResult<Self> {
        Ok(match key {
            "type" => Self::Kind(
                serde_json::from_value(value)
                    .map_err(|e| UnderlayError::validation(format!("type: {e}")))?,
            ),
            "top" => Self::Top(number(key, &value)?),
            "left" => Self::Left(number(key, &value)?),
            "width" => Self::Width(extent(key, &value)?),
            "height" => Self::Height(extent(key, &value)?),
            "rotation" => Self::Rotation(number(key, &value)?),
            "color" => Self::Color(string(key, value)?),
            "opacity" => Self::Opacity(opacity(&value)?),
            "update" => {
                let shape: ShapeLayer = serde_json::from_value(value)
                    .map_err(|e| UnderlayError::validation(format!("update: {e}")))?;
                shape.validate()?;
                Self::Whole(Box::new(shape))
            }
            other => {
                return Err(UnderlayError::validation(format!(
                    "unknown shape attribute '{other}'"
                )));
            }
        })
    }

    pub fn apply(self, shape: &mut ShapeLayer) {
        match self {
            Self::Kind(v) => shape.kind = v,
            Self::Top(v) => shape.top = v,
            Self::Left(v) => shape.left = v,
            Self::Width(v) => shape.width = v,
            Self::Height(v) => shape.height = v,
            Self::Rotation(v) => shape.rotation = v,
            Self::Color(v) => shape.color = v,
            Self::Opacity(v) => shape.opacity = v,
            Self::Whole(v) => {
                let id = shape.id;
                *shape = *v;
                shape.id = id;
            }
        }
    }
}

fn string(key: &str, value: Value) -> UnderlayResult<String> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(UnderlayError::validation(format!(
            "{key} expects a string, got {other}"
        ))),
    }
}

fn number(key: &str, value: &Value) -> UnderlayResult<f64> {
    // Range inputs hand over strings such as "42".
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match n {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(UnderlayError::validation(format!(
            "{key} expects a finite number, got {value}"
        ))),
    }
}

fn extent(key: &str, value: &Value) -> UnderlayResult<f64> {
    let v = number(key, value)?;
    if v < 0.0 {
        return Err(UnderlayError::validation(format!("{key} must be >= 0")));
    }
    Ok(v)
}

fn opacity(value: &Value) -> UnderlayResult<f64> {
    let v = number("opacity", value)?;
    if !(0.0..=1.0).contains(&v) {
        return Err(UnderlayError::validation(format!(
            "opacity must be within 0..=1, got {v}"
        )));
    }
    Ok(v)
}

#[cfg(test)]
#[path = "../../tests/unit/layers/attr.rs"]
mod tests;
