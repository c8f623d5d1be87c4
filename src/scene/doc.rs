use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::assets::decode::load_image;
use crate::foundation::error::{UnderlayError, UnderlayResult};
use crate::layers::model::{ShapeLayer, TextLayer};
use crate::render::compositor::RenderSettings;
use crate::scene::composite::CompositeScene;

/// Scene description read by the command line renderer.
///
/// Relative image paths resolve against the directory holding the scene file.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SceneDoc {
    pub base: PathBuf,
    #[serde(default)]
    pub cutout: Option<PathBuf>,
    #[serde(default)]
    pub shapes: Vec<ShapeLayer>,
    #[serde(default)]
    pub texts: Vec<TextLayer>,
    #[serde(default)]
    pub render: RenderSettings,
}

impl SceneDoc {
    pub fn from_json(json: &str) -> UnderlayResult<Self> {
        serde_json::from_str(json).map_err(|e| UnderlayError::serde(format!("scene json: {e}")))
    }

    /// Read, parse and validate a scene file.
    pub fn from_path(path: &Path) -> UnderlayResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read scene {}", path.display()))?;
        let mut doc = Self::from_json(&text)?;
        if let Some(dir) = path.parent() {
            doc.base = dir.join(&doc.base);
            doc.cutout = doc.cutout.map(|c| dir.join(c));
        }
        doc.validate()?;
        Ok(doc)
    }

    pub fn to_json_pretty(&self) -> UnderlayResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| UnderlayError::serde(e.to_string()))
    }

    pub fn validate(&self) -> UnderlayResult<()> {
        if self.base.as_os_str().is_empty() {
            return Err(UnderlayError::validation("scene base path must be non-empty"));
        }
        CompositeScene::with_layers(self.shapes.clone(), self.texts.clone()).map(|_| ())
    }

    /// Decode the images and build a scene. A cutout that fails to decode is left out.
    #[tracing::instrument(skip(self), fields(base = %self.base.display()))]
    pub fn load(&self) -> UnderlayResult<CompositeScene> {
        let mut scene = CompositeScene::with_layers(self.shapes.clone(), self.texts.clone())?;
        let token = scene.set_base_image(load_image(&self.base)?);
        if let Some(cutout) = &self.cutout {
            scene.apply_cutout(token, load_image(cutout));
        }
        Ok(scene)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/doc.rs"]
mod tests;
