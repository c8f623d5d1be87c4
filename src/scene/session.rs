use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};

use crate::assets::decode::Raster;
use crate::assets::fonts::FontBook;
use crate::export::png::{export_file_name, export_png};
use crate::foundation::error::{Applied, Mutation, UnderlayResult};
use crate::layers::attr::{ShapeAttr, TextAttr};
use crate::layers::model::{LayerRef, ShapeLayer, TextLayer};
use crate::render::compositor::{Compositor, RenderSettings};
use crate::render::frame::Frame;
use crate::scene::composite::{CompositeScene, RenderTarget, SceneToken};
use crate::scene::cutout::BackgroundRemover;
use crate::scene::debounce::{DEFAULT_DEBOUNCE, Debouncer};
use crate::scene::events::UiEvent;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Session configuration.
pub struct SessionOpts {
    /// Settle time for debounced attribute edits.
    #[serde(default = "default_debounce")]
    pub debounce: Duration,
    #[serde(default)]
    pub render: RenderSettings,
}

fn default_debounce() -> Duration {
    DEFAULT_DEBOUNCE
}

impl Default for SessionOpts {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            render: RenderSettings::default(),
        }
    }
}

/// An attribute edit parsed at submit time, waiting for its debounce deadline.
#[derive(Clone, Debug, PartialEq)]
enum PendingAttr {
    Text(TextAttr),
    Shape(ShapeAttr),
}

fn parse_attr(
    target: LayerRef,
    key: &str,
    value: serde_json::Value,
) -> UnderlayResult<PendingAttr> {
    Ok(match target {
        LayerRef::Text(_) => PendingAttr::Text(TextAttr::parse(key, value)?),
        LayerRef::Shape(_) => PendingAttr::Shape(ShapeAttr::parse(key, value)?),
    })
}

/// One editing session: the scene, its compositor, debounced edits and render bookkeeping.
///
/// Every state change marks the session dirty; [`EditorSession::render_if_dirty`] turns any
/// number of changes into a single render.
pub struct EditorSession {
    scene: CompositeScene,
    compositor: Compositor,
    pending: Debouncer<(LayerRef, String), PendingAttr>,
    dirty: bool,
    renders: u64,
}

impl EditorSession {
    pub fn new(opts: SessionOpts, fonts: FontBook) -> Self {
        Self {
            scene: CompositeScene::new(),
            compositor: Compositor::new(opts.render, fonts),
            pending: Debouncer::new(opts.debounce),
            dirty: true,
            renders: 0,
        }
    }

    /// Start from an existing scene, for example one loaded from a scene file.
    pub fn with_scene(opts: SessionOpts, fonts: FontBook, scene: CompositeScene) -> Self {
        Self {
            scene,
            ..Self::new(opts, fonts)
        }
    }

    pub fn scene(&self) -> &CompositeScene {
        &self.scene
    }

    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Number of renders performed so far.
    pub fn render_count(&self) -> u64 {
        self.renders
    }

    pub fn set_base_image(&mut self, raster: Raster) -> SceneToken {
        self.dirty = true;
        self.scene.set_base_image(raster)
    }

    /// Decode and install a base image; on failure the previous one stays.
    pub fn load_base_image(&mut self, bytes: &[u8]) -> UnderlayResult<SceneToken> {
        let token = self.scene.load_base_image(bytes)?;
        self.dirty = true;
        Ok(token)
    }

    pub fn apply_cutout(&mut self, token: SceneToken, result: UnderlayResult<Raster>) -> Applied {
        let applied = self.scene.apply_cutout(token, result);
        if applied == Applied::Applied {
            self.dirty = true;
        }
        applied
    }

    /// Run `remover` on the current base image and apply its result. Without a base image this
    /// does nothing.
    pub fn remove_background(&mut self, remover: &mut dyn BackgroundRemover) -> Option<Applied> {
        let token = self.scene.token();
        let result = remover.remove(self.scene.base_image()?);
        Some(self.apply_cutout(token, result))
    }

    /// Apply one UI event immediately.
    #[tracing::instrument(skip(self))]
    pub fn apply(&mut self, event: UiEvent) -> UnderlayResult<Mutation> {
        let m = match event {
            UiEvent::AddText { text } => {
                let mut template = TextLayer::default();
                if let Some(text) = text {
                    template.text = text;
                }
                self.scene.add_text(template)?;
                Mutation::Applied
            }
            UiEvent::AddShape { kind } => {
                self.scene.add_shape(ShapeLayer {
                    kind,
                    ..ShapeLayer::default()
                })?;
                Mutation::Applied
            }
            UiEvent::UpdateAttribute { target, key, value } => {
                // A rejected value leaves any pending edit for the key untouched.
                let attr = parse_attr(target, &key, value)?;
                self.pending.cancel(&(target, key.clone()));
                let m = self.apply_attr(target, attr);
                if !m.changed() {
                    tracing::debug!(
                        ?target,
                        key = %key,
                        "attribute update for missing layer ignored"
                    );
                }
                m
            }
            UiEvent::Remove { target } => {
                // Ids are reused, so edits still queued for this layer must not land on its
                // successor.
                let dropped = self.pending.cancel_where(|(r, _)| *r == target);
                if dropped > 0 {
                    tracing::debug!(?target, dropped, "pending edits of removed layer dropped");
                }
                self.scene.remove(target)
            }
            UiEvent::Duplicate { target } => match self.scene.duplicate(target)? {
                Some(_) => Mutation::Applied,
                None => Mutation::Noop,
            },
            UiEvent::Select { target } => self.scene.select(target),
        };
        if m.changed() {
            self.dirty = true;
        } else {
            tracing::debug!("event changed nothing");
        }
        Ok(m)
    }

    /// Queue an attribute edit to commit once it has settled. The value is checked now, so a bad
    /// key or value fails here rather than at commit.
    pub fn submit_attribute(
        &mut self,
        target: LayerRef,
        key: &str,
        value: serde_json::Value,
        now: Instant,
    ) -> UnderlayResult<()> {
        let attr = parse_attr(target, key, value)?;
        if self.pending.submit((target, key.to_string()), attr, now) {
            tracing::debug!(?target, key, "pending edit superseded");
        }
        Ok(())
    }

    /// Commit debounced edits whose deadline has passed. Returns how many changed a layer.
    pub fn poll(&mut self, now: Instant) -> usize {
        let due = self.pending.poll(now);
        self.commit(due)
    }

    /// Commit every pending edit now.
    pub fn flush_pending(&mut self) -> usize {
        let all = self.pending.flush();
        self.commit(all)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_idle()
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.pending.next_due()
    }

    fn commit(&mut self, edits: Vec<((LayerRef, String), PendingAttr)>) -> usize {
        let mut changed = 0;
        for ((target, _key), attr) in edits {
            if self.apply_attr(target, attr).changed() {
                changed += 1;
            }
        }
        if changed > 0 {
            self.dirty = true;
        }
        changed
    }

    fn apply_attr(&mut self, target: LayerRef, attr: PendingAttr) -> Mutation {
        match (target, attr) {
            (LayerRef::Text(id), PendingAttr::Text(a)) => self.scene.update_text(id, a),
            (LayerRef::Shape(id), PendingAttr::Shape(a)) => self.scene.update_shape(id, a),
            _ => Mutation::Noop,
        }
    }

    /// Render unconditionally and clear the dirty flag.
    pub fn render(&mut self, target: RenderTarget) -> UnderlayResult<Frame> {
        let frame = self.scene.render(&mut self.compositor, target)?;
        self.dirty = false;
        self.renders += 1;
        Ok(frame)
    }

    /// Render only if something changed since the last render.
    pub fn render_if_dirty(&mut self, target: RenderTarget) -> UnderlayResult<Option<Frame>> {
        if !self.dirty {
            tracing::debug!("render skipped, scene unchanged");
            return Ok(None);
        }
        self.render(target).map(Some)
    }

    /// Commit pending edits, render at native size and write a PNG into `dir`.
    ///
    /// Returns the written path, named per [`export_file_name`].
    pub fn export(&mut self, dir: &Path, now: SystemTime) -> UnderlayResult<PathBuf> {
        self.flush_pending();
        let frame = self.render(RenderTarget::Export)?;
        let path = dir.join(export_file_name(now));
        export_png(&frame, &path)?;
        Ok(path)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/session.rs"]
mod tests;
