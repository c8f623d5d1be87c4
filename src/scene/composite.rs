use std::fmt;

use crate::assets::decode::{Raster, decode_image};
use crate::foundation::core::Canvas;
use crate::foundation::error::{Applied, Mutation, UnderlayError, UnderlayResult};
use crate::layers::attr::{ShapeAttr, TextAttr};
use crate::layers::model::{Layer, LayerRef, ShapeLayer, TextLayer};
use crate::layers::stack::LayerStack;
use crate::render::compositor::Compositor;
use crate::render::frame::Frame;

/// Identity of one base image within a scene.
///
/// Work started for a base image (decode, background removal) carries the token current at
/// start. Replacing the base image bumps the generation, so late results for the old image no
/// longer match.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SceneToken {
    generation: u64,
}

impl SceneToken {
    pub const fn generation(self) -> u64 {
        self.generation
    }
}

impl fmt::Debug for SceneToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SceneToken(gen{})", self.generation)
    }
}

/// Output size selection for a render.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "target", rename_all = "snake_case")]
pub enum RenderTarget {
    /// Native size of the base image.
    Export,
    /// Base image size scaled down so the longer edge fits `max_edge`.
    Preview { max_edge: u32 },
    /// An explicit size; everything is stretched to it.
    Fixed { width: u32, height: u32 },
}

/// Editable composite: base image, optional cutout, and the two layer collections.
#[derive(Clone, Debug, Default)]
pub struct CompositeScene {
    base: Option<Raster>,
    cutout: Option<Raster>,
    shapes: LayerStack<ShapeLayer>,
    texts: LayerStack<TextLayer>,
    selected: Option<LayerRef>,
    generation: u64,
}

impl CompositeScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a scene from existing layer lists. Fails on duplicate ids or invalid layers.
    pub fn with_layers(shapes: Vec<ShapeLayer>, texts: Vec<TextLayer>) -> UnderlayResult<Self> {
        for s in &shapes {
            s.validate()?;
        }
        for t in &texts {
            t.validate()?;
        }
        let shapes = LayerStack::from_vec(shapes)
            .ok_or_else(|| UnderlayError::validation("duplicate shape id"))?;
        let texts = LayerStack::from_vec(texts)
            .ok_or_else(|| UnderlayError::validation("duplicate text id"))?;
        Ok(Self {
            shapes,
            texts,
            ..Self::default()
        })
    }

    pub fn token(&self) -> SceneToken {
        SceneToken {
            generation: self.generation,
        }
    }

    /// Install a new base image. Layers are kept; any cutout belongs to the old image and is
    /// dropped.
    #[tracing::instrument(skip_all, fields(width = raster.width, height = raster.height))]
    pub fn set_base_image(&mut self, raster: Raster) -> SceneToken {
        self.generation += 1;
        self.base = Some(raster);
        self.cutout = None;
        tracing::info!(generation = self.generation, "base image replaced");
        self.token()
    }

    /// Decode `bytes` and install them as the base image.
    ///
    /// On failure the previous base image (if any) stays in place and the error is returned.
    pub fn load_base_image(&mut self, bytes: &[u8]) -> UnderlayResult<SceneToken> {
        match decode_image(bytes) {
            Ok(raster) => Ok(self.set_base_image(raster)),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    kept_previous = self.base.is_some(),
                    "base image decode failed"
                );
                Err(e)
            }
        }
    }

    /// Hand back a background-removal result started for `token`.
    pub fn apply_cutout(&mut self, token: SceneToken, result: UnderlayResult<Raster>) -> Applied {
        if token != self.token() {
            tracing::debug!(?token, current = ?self.token(), "stale cutout discarded");
            return Applied::Stale;
        }
        match result {
            Ok(raster) => {
                if let Some(base) = &self.base
                    && base.canvas() != raster.canvas()
                {
                    tracing::debug!(
                        base = ?base.canvas(),
                        cutout = ?raster.canvas(),
                        "cutout size differs from base; it will be stretched"
                    );
                }
                self.cutout = Some(raster);
            }
            Err(e) => {
                tracing::warn!(error = %e, "background removal failed; rendering without cutout");
            }
        }
        Applied::Applied
    }

    pub fn base_image(&self) -> Option<&Raster> {
        self.base.as_ref()
    }

    pub fn cutout_image(&self) -> Option<&Raster> {
        self.cutout.as_ref()
    }

    pub fn shapes(&self) -> &LayerStack<ShapeLayer> {
        &self.shapes
    }

    pub fn texts(&self) -> &LayerStack<TextLayer> {
        &self.texts
    }

    pub fn selected(&self) -> Option<LayerRef> {
        self.selected
    }

    /// Append a text layer built from `template` under a fresh id.
    pub fn add_text(&mut self, template: TextLayer) -> UnderlayResult<TextLayer> {
        self.texts.add(template)
    }

    /// Append a shape built from `template` under a fresh id and select it.
    pub fn add_shape(&mut self, template: ShapeLayer) -> UnderlayResult<ShapeLayer> {
        let shape = self.shapes.add(template)?;
        self.selected = Some(LayerRef::Shape(shape.id));
        Ok(shape)
    }

    pub fn update_text(&mut self, id: u32, attr: TextAttr) -> Mutation {
        self.texts.update(id, |t| attr.apply(t))
    }

    pub fn update_shape(&mut self, id: u32, attr: ShapeAttr) -> Mutation {
        self.shapes.update(id, |s| attr.apply(s))
    }

    /// Parse and apply an editor attribute update addressed by key name.
    pub fn update_attribute(
        &mut self,
        target: LayerRef,
        key: &str,
        value: serde_json::Value,
    ) -> UnderlayResult<Mutation> {
        let m = match target {
            LayerRef::Text(id) => self.update_text(id, TextAttr::parse(key, value)?),
            LayerRef::Shape(id) => self.update_shape(id, ShapeAttr::parse(key, value)?),
        };
        if !m.changed() {
            tracing::debug!(?target, key, "attribute update for missing layer ignored");
        }
        Ok(m)
    }

    /// Copy the referenced layer to the top of its collection. `Ok(None)` when it does not exist.
    pub fn duplicate(&mut self, target: LayerRef) -> UnderlayResult<Option<Layer>> {
        Ok(match target {
            LayerRef::Text(id) => match self.texts.get(id).cloned() {
                Some(t) => Some(Layer::Text(self.texts.duplicate(&t)?)),
                None => None,
            },
            LayerRef::Shape(id) => match self.shapes.get(id).cloned() {
                Some(s) => Some(Layer::Shape(self.shapes.duplicate(&s)?)),
                None => None,
            },
        })
    }

    /// Remove the referenced layer, clearing the selection if it pointed there.
    pub fn remove(&mut self, target: LayerRef) -> Mutation {
        let m = match target {
            LayerRef::Text(id) => self.texts.remove(id),
            LayerRef::Shape(id) => self.shapes.remove(id),
        };
        if self.selected == Some(target) {
            self.selected = None;
        }
        m
    }

    /// Select a layer, or clear the selection with `None`. Selecting a missing layer is a no-op.
    pub fn select(&mut self, target: Option<LayerRef>) -> Mutation {
        if let Some(r) = target
            && self.layer(r).is_none()
        {
            return Mutation::Noop;
        }
        if self.selected == target {
            return Mutation::Noop;
        }
        self.selected = target;
        Mutation::Applied
    }

    pub fn layer(&self, target: LayerRef) -> Option<Layer> {
        match target {
            LayerRef::Text(id) => self.texts.get(id).cloned().map(Layer::Text),
            LayerRef::Shape(id) => self.shapes.get(id).cloned().map(Layer::Shape),
        }
    }

    /// Canvas size for `target`. Without a base image only [`RenderTarget::Fixed`] has a size.
    pub fn canvas_for(&self, target: RenderTarget) -> Canvas {
        let native = self.base.as_ref().map(Raster::canvas);
        match target {
            RenderTarget::Export => native.unwrap_or(Canvas::new(0, 0)),
            RenderTarget::Preview { max_edge } => native
                .map(|c| c.fit_within(max_edge))
                .unwrap_or(Canvas::new(0, 0)),
            RenderTarget::Fixed { width, height } => Canvas::new(width, height),
        }
    }

    pub fn render(&self, compositor: &mut Compositor, target: RenderTarget) -> UnderlayResult<Frame> {
        compositor.render(
            self.canvas_for(target),
            self.base.as_ref(),
            self.shapes.as_slice(),
            self.texts.as_slice(),
            self.cutout.as_ref(),
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/composite.rs"]
mod tests;
