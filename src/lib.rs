//! Underlay composites a photo with text and vector shapes placed *behind* its subject.
//!
//! A scene holds a base image, an optional background-removed cutout of the same photo, and two
//! ordered layer collections. Rendering always draws in the same order: base, shapes, text, then
//! the cutout on top, so overlays appear to sit behind the foreground.
//!
//! - Build a [`CompositeScene`] (or drive one through an [`EditorSession`])
//! - Render it with a [`Compositor`] into a [`Frame`]
//! - Write the frame with [`export_png`]
#![forbid(unsafe_code)]

mod assets;
mod export;
mod foundation;
mod layers;
mod render;
mod scene;
mod transform;

pub use crate::assets::color::Color;
pub use crate::assets::decode::{Raster, decode_image, load_image};
pub use crate::assets::fonts::{FontBook, FontSettings, ResolvedFont};
pub use crate::export::png::{encode_png, export_file_name, export_png};
pub use crate::foundation::core::{Affine, BezPath, Canvas, Point, Rect, Rgba8Premul, Vec2};
pub use crate::foundation::error::{Applied, Mutation, UnderlayError, UnderlayResult};
pub use crate::layers::attr::{ShapeAttr, TextAttr};
pub use crate::layers::model::{Keyed, Layer, LayerId, LayerRef, ShapeKind, ShapeLayer, TextLayer};
pub use crate::layers::stack::LayerStack;
pub use crate::render::compositor::{Compositor, RenderSettings};
pub use crate::render::frame::Frame;
pub use crate::scene::composite::{CompositeScene, RenderTarget, SceneToken};
pub use crate::scene::cutout::{BackgroundRemover, PrecomputedCutout};
pub use crate::scene::debounce::{DEFAULT_DEBOUNCE, Debouncer};
pub use crate::scene::doc::SceneDoc;
pub use crate::scene::events::UiEvent;
pub use crate::scene::session::{EditorSession, SessionOpts};
pub use crate::transform::mapper::{
    TEXT_SCALE, centered_box_offset, layer_transform, map, shape_size, text_font_px, unmap,
};
