use std::collections::HashMap;

use kurbo::Shape as _;

use crate::assets::color::Color;
use crate::assets::decode::Raster;
use crate::assets::fonts::{FontBook, ResolvedFont};
use crate::assets::text::{TextBrushRgba8, TextLayoutEngine};
use crate::foundation::core::{Affine, BezPath, Canvas, Point, Rect, Rgba8Premul};
use crate::foundation::error::{UnderlayError, UnderlayResult};
use crate::layers::model::{Layer, ShapeKind, ShapeLayer, TextLayer};
use crate::render::blend;
use crate::render::frame::Frame;
use crate::transform::mapper;

const PATH_TOLERANCE: f64 = 0.1;

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Compositor settings.
pub struct RenderSettings {
    /// Straight-alpha color the target is cleared to before the base image; transparent if unset.
    #[serde(default)]
    pub clear_rgba: Option<[u8; 4]>,
}

/// One drawable layer, borrowed from the scene.
#[derive(Clone, Copy, Debug)]
enum DrawCmd<'a> {
    Shape(&'a ShapeLayer),
    Text(&'a TextLayer),
}

/// All shapes in order, then all text in order.
fn draw_order<'a>(shapes: &'a [ShapeLayer], texts: &'a [TextLayer]) -> Vec<DrawCmd<'a>> {
    shapes
        .iter()
        .map(DrawCmd::Shape)
        .chain(texts.iter().map(DrawCmd::Text))
        .collect()
}

struct Scratch {
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
}

impl Scratch {
    fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            ctx: vello_cpu::RenderContext::new(width, height),
            pixmap: vello_cpu::Pixmap::new(width, height),
        }
    }

    /// Rasterize what was recorded since the last reset and composite it over `dst`.
    fn flush_over(&mut self, dst: &mut [u8], opacity: f32) -> UnderlayResult<()> {
        self.ctx.flush();
        self.pixmap.data_as_u8_slice_mut().fill(0);
        self.ctx.render_to_pixmap(&mut self.pixmap);
        blend::over_in_place(dst, self.pixmap.data_as_u8_slice(), opacity)
    }
}

/// Layered image compositor.
///
/// Draw order is fixed: clear, base image stretched to the canvas, shapes, text, then the cutout
/// stretched to the canvas on top. Each shape and text layer is rasterized on its own and then
/// blended with its opacity, so layers never leak paint or transform state into each other.
///
/// The compositor keeps scratch surfaces and font caches between calls; results depend only on
/// the inputs.
pub struct Compositor {
    settings: RenderSettings,
    fonts: FontBook,
    text: TextLayoutEngine,
    font_data: HashMap<(String, u16, u32), vello_cpu::peniko::FontData>,
    scratch: Option<Scratch>,
}

impl Compositor {
    pub fn new(settings: RenderSettings, fonts: FontBook) -> Self {
        Self {
            settings,
            fonts,
            text: TextLayoutEngine::new(),
            font_data: HashMap::new(),
            scratch: None,
        }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    pub fn fonts_mut(&mut self) -> &mut FontBook {
        &mut self.fonts
    }

    /// Composite the scene into a `canvas`-sized premultiplied frame.
    ///
    /// A zero-sized canvas yields an empty frame. Layers with an unparseable color or no usable
    /// font are skipped with a warning.
    #[tracing::instrument(
        skip_all,
        fields(
            width = canvas.width,
            height = canvas.height,
            shapes = shapes.len(),
            texts = texts.len(),
            cutout = cutout.is_some()
        )
    )]
    pub fn render(
        &mut self,
        canvas: Canvas,
        base: Option<&Raster>,
        shapes: &[ShapeLayer],
        texts: &[TextLayer],
        cutout: Option<&Raster>,
    ) -> UnderlayResult<Frame> {
        self.render_cmds(canvas, base, &draw_order(shapes, texts), cutout)
    }

    /// Like [`Compositor::render`] for a mixed list. Shapes still draw below all text; relative
    /// order within each kind follows the list.
    pub fn render_layers(
        &mut self,
        canvas: Canvas,
        base: Option<&Raster>,
        layers: &[Layer],
        cutout: Option<&Raster>,
    ) -> UnderlayResult<Frame> {
        let mut shapes = Vec::new();
        let mut texts = Vec::new();
        for layer in layers {
            match layer {
                Layer::Shape(s) => shapes.push(DrawCmd::Shape(s)),
                Layer::Text(t) => texts.push(DrawCmd::Text(t)),
            }
        }
        shapes.extend(texts);
        self.render_cmds(canvas, base, &shapes, cutout)
    }

    fn render_cmds(
        &mut self,
        canvas: Canvas,
        base: Option<&Raster>,
        cmds: &[DrawCmd<'_>],
        cutout: Option<&Raster>,
    ) -> UnderlayResult<Frame> {
        let clear = self
            .settings
            .clear_rgba
            .map(|[r, g, b, a]| Rgba8Premul::from_straight_rgba(r, g, b, a).to_array())
            .unwrap_or([0, 0, 0, 0]);
        if canvas.is_empty() {
            return Ok(Frame::filled(canvas, clear));
        }
        // Reject sizes the rasterizer cannot address before allocating the frame.
        surface_dims(canvas)?;
        let mut frame = Frame::filled(canvas, clear);

        if let Some(base) = base {
            blend::blit_stretched(&mut frame.data, canvas, base)?;
        }
        for cmd in cmds {
            match *cmd {
                DrawCmd::Shape(s) => self.draw_shape(&mut frame.data, canvas, s)?,
                DrawCmd::Text(t) => self.draw_text(&mut frame.data, canvas, t)?,
            }
        }
        if let Some(cutout) = cutout {
            blend::blit_stretched(&mut frame.data, canvas, cutout)?;
        }
        Ok(frame)
    }

    fn scratch_for(&mut self, canvas: Canvas) -> UnderlayResult<&mut Scratch> {
        let (w, h) = surface_dims(canvas)?;
        let reuse = self
            .scratch
            .as_ref()
            .is_some_and(|s| s.width == w && s.height == h);
        if !reuse {
            self.scratch = None;
        }
        let scratch = self.scratch.get_or_insert_with(|| Scratch::new(w, h));
        scratch.ctx.reset();
        scratch.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        Ok(scratch)
    }

    fn draw_shape(&mut self, dst: &mut [u8], canvas: Canvas, shape: &ShapeLayer) -> UnderlayResult<()> {
        if shape.opacity.is_nan() || shape.opacity <= 0.0 {
            tracing::debug!(id = shape.id, "shape fully transparent, skipped");
            return Ok(());
        }
        let color = match Color::parse(&shape.color) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(id = shape.id, error = %e, "shape color unparseable, skipped");
                return Ok(());
            }
        };

        let size = mapper::shape_size(canvas, shape.width, shape.height);
        let path = shape_path(shape.kind, size.x, size.y);
        let transform = mapper::layer_transform(canvas, shape.left, shape.top, shape.rotation);

        let scratch = self.scratch_for(canvas)?;
        scratch.ctx.set_transform(affine_to_cpu(transform));
        scratch.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
        scratch.ctx.fill_path(&bezpath_to_cpu(&path));
        scratch.flush_over(dst, shape.opacity as f32)
    }

    fn draw_text(&mut self, dst: &mut [u8], canvas: Canvas, layer: &TextLayer) -> UnderlayResult<()> {
        if layer.opacity.is_nan() || layer.opacity <= 0.0 || layer.text.is_empty() {
            tracing::debug!(id = layer.id, "text layer draws nothing, skipped");
            return Ok(());
        }
        let color = match Color::parse(&layer.color) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(id = layer.id, error = %e, "text color unparseable, skipped");
                return Ok(());
            }
        };
        let Some(font) = self.fonts.resolve(&layer.font_family, layer.font_weight) else {
            return Ok(());
        };

        let brush = TextBrushRgba8 {
            r: color.r,
            g: color.g,
            b: color.b,
            a: color.a,
        };
        let size_px = mapper::text_font_px(layer.font_size) as f32;
        let layout = match self
            .text
            .layout_line(&layer.text, &font, size_px, layer.font_weight, brush)
        {
            Ok(l) => l,
            Err(e) => {
                tracing::warn!(id = layer.id, error = %e, "text layout failed, skipped");
                return Ok(());
            }
        };
        let transform = text_transform(
            canvas,
            layer,
            f64::from(layout.width()),
            f64::from(layout.height()),
        );
        let font_data = self.font_data_for(&font);

        let scratch = self.scratch_for(canvas)?;
        scratch.ctx.set_transform(affine_to_cpu(transform));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                scratch.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                scratch
                    .ctx
                    .glyph_run(&font_data)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        scratch.flush_over(dst, layer.opacity as f32)
    }

    fn font_data_for(&mut self, font: &ResolvedFont) -> vello_cpu::peniko::FontData {
        self.font_data
            .entry((font.family.clone(), font.weight, font.index))
            .or_insert_with(|| {
                vello_cpu::peniko::FontData::new(
                    vello_cpu::peniko::Blob::from(font.data.as_ref().clone()),
                    font.index,
                )
            })
            .clone()
    }
}

fn surface_dims(canvas: Canvas) -> UnderlayResult<(u16, u16)> {
    let w: u16 = canvas
        .width
        .try_into()
        .map_err(|_| UnderlayError::render("canvas width exceeds u16"))?;
    let h: u16 = canvas
        .height
        .try_into()
        .map_err(|_| UnderlayError::render("canvas height exceeds u16"))?;
    Ok((w, h))
}

/// Outline of a shape centered on the local origin.
pub(crate) fn shape_path(kind: ShapeKind, width: f64, height: f64) -> BezPath {
    let (hw, hh) = (width / 2.0, height / 2.0);
    match kind {
        ShapeKind::Rectangle => Rect::new(-hw, -hh, hw, hh).to_path(PATH_TOLERANCE),
        ShapeKind::Circle => kurbo::Circle::new(Point::ORIGIN, hw).to_path(PATH_TOLERANCE),
        ShapeKind::Triangle => {
            let mut p = BezPath::new();
            p.move_to(Point::new(-hw, hh));
            p.line_to(Point::new(0.0, -hh));
            p.line_to(Point::new(hw, hh));
            p.close_path();
            p
        }
    }
}

/// Transform for a laid-out text block: the block's box is centered on the layer anchor.
pub(crate) fn text_transform(canvas: Canvas, layer: &TextLayer, width: f64, height: f64) -> Affine {
    mapper::layer_transform(canvas, layer.left, layer.top, layer.rotation)
        * Affine::translate(mapper::centered_box_offset(width, height))
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
