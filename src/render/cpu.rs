use std::{
    collections::{HashMap, VecDeque},
    path::Path,
    sync::Arc,
};

use crate::{
    assets::{raster::RasterImage, vector::VectorDocument},
    foundation::core::{Affine, BezPath, Canvas, Color, Point, Rect},
    foundation::error::{OverlayError, OverlayResult},
    render::surface::{
        FontExtents, FontFace, FontSpec, GlyphStyle, LineCap, LineJoin, Paint, StrokeStyle,
        Surface, VectorPlacement,
    },
};

/// Raw font bytes for the two faces overlays use.
///
/// The monospace face falls back to the sans face when not supplied.
#[derive(Clone, Debug)]
pub struct FontSet {
    sans: Arc<Vec<u8>>,
    monospace: Option<Arc<Vec<u8>>>,
}

impl FontSet {
    /// Build from in-memory font files.
    pub fn new(sans: Vec<u8>, monospace: Option<Vec<u8>>) -> Self {
        Self {
            sans: Arc::new(sans),
            monospace: monospace.map(Arc::new),
        }
    }

    /// Read font files from disk.
    pub fn from_files(sans: &Path, monospace: Option<&Path>) -> OverlayResult<Self> {
        let read = |p: &Path| {
            std::fs::read(p)
                .map_err(|e| OverlayError::load(format!("read font '{}': {e}", p.display())))
        };
        let sans_bytes = read(sans)?;
        let mono_bytes = monospace.map(read).transpose()?;
        Ok(Self::new(sans_bytes, mono_bytes))
    }

    fn bytes(&self, face: FontFace) -> &Arc<Vec<u8>> {
        match face {
            FontFace::Sans => &self.sans,
            FontFace::Monospace => self.monospace.as_ref().unwrap_or(&self.sans),
        }
    }
}

/// Options for [`CpuSurface`].
#[derive(Clone, Debug, Default)]
pub struct RenderSettings {
    /// If set, [`Surface::clear`] fills the canvas with this straight RGBA8 colour instead of
    /// transparent black.
    pub clear_rgba: Option<[u8; 4]>,
}

/// A rendered frame.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Straight-alpha copy of the pixel data, as image encoders expect.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        if !self.premultiplied {
            return self.data.clone();
        }
        let mut out = self.data.clone();
        for px in out.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a == 0 || a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        out
    }

    /// Straight-alpha RGBA8 of the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        let mut rgba = [px[0], px[1], px[2], px[3]];
        if self.premultiplied && rgba[3] != 0 && rgba[3] != 255 {
            let a = u16::from(rgba[3]);
            for c in &mut rgba[..3] {
                *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        Some(rgba)
    }
}

struct ShapedFace {
    family: String,
    font: vello_cpu::peniko::FontData,
}

struct Shaped {
    layout: parley::Layout<()>,
    baseline: f64,
}

const DEFAULT_SVG_CACHE_CAPACITY: usize = 16;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct SvgRasterKey {
    source: String,
    width: u32,
    height: u32,
}

/// Software [`Surface`] backed by `vello_cpu`, shaping text with `parley` and rasterising
/// vector documents with `resvg`.
pub struct CpuSurface {
    canvas: Canvas,
    settings: RenderSettings,
    ctx: vello_cpu::RenderContext,
    transforms: Vec<Affine>,
    clip_depth: usize,
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    sans: ShapedFace,
    monospace: ShapedFace,
    svg_cache: HashMap<SvgRasterKey, vello_cpu::Image>,
    svg_lru: VecDeque<SvgRasterKey>,
    svg_capacity: usize,
}

impl std::fmt::Debug for CpuSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuSurface")
            .field("canvas", &self.canvas)
            .field("transforms", &self.transforms.len())
            .field("clip_depth", &self.clip_depth)
            .field("svg_cached", &self.svg_lru.len())
            .finish_non_exhaustive()
    }
}

impl CpuSurface {
    /// Create a surface of `canvas` size with the given faces registered.
    ///
    /// Rasterised vector documents are kept in an LRU cache sized by
    /// `OVERLAYER_SVG_CACHE_CAPACITY`.
    pub fn new(canvas: Canvas, fonts: &FontSet, settings: RenderSettings) -> OverlayResult<Self> {
        let width: u16 = canvas
            .width
            .try_into()
            .map_err(|_| OverlayError::render("canvas width exceeds u16"))?;
        let height: u16 = canvas
            .height
            .try_into()
            .map_err(|_| OverlayError::render("canvas height exceeds u16"))?;

        let mut font_ctx = parley::FontContext::default();
        let sans = register_face(&mut font_ctx, fonts.bytes(FontFace::Sans))?;
        let monospace = register_face(&mut font_ctx, fonts.bytes(FontFace::Monospace))?;

        let mut surface = Self {
            canvas,
            settings,
            ctx: vello_cpu::RenderContext::new(width, height),
            transforms: Vec::new(),
            clip_depth: 0,
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            sans,
            monospace,
            svg_cache: HashMap::new(),
            svg_lru: VecDeque::new(),
            svg_capacity: std::env::var("OVERLAYER_SVG_CACHE_CAPACITY")
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
                .filter(|&n| n > 0)
                .unwrap_or(DEFAULT_SVG_CACHE_CAPACITY),
        };
        surface.clear();
        Ok(surface)
    }

    /// Canvas the surface draws into.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Rasterise everything drawn since the last clear.
    pub fn finish(&mut self) -> OverlayResult<FrameRGBA> {
        let width: u16 = self
            .canvas
            .width
            .try_into()
            .map_err(|_| OverlayError::render("canvas width exceeds u16"))?;
        let height: u16 = self
            .canvas
            .height
            .try_into()
            .map_err(|_| OverlayError::render("canvas height exceeds u16"))?;
        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        Ok(FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }

    fn current(&self) -> Affine {
        self.transforms.last().copied().unwrap_or(Affine::IDENTITY)
    }

    fn face(&self, face: FontFace) -> &ShapedFace {
        match face {
            FontFace::Sans => &self.sans,
            FontFace::Monospace => &self.monospace,
        }
    }

    fn shape(&mut self, font: FontSpec, text: &str) -> OverlayResult<Shaped> {
        if !font.size.is_finite() || font.size <= 0.0 {
            return Err(OverlayError::render("font size must be finite and > 0"));
        }
        let family = match font.face {
            FontFace::Sans => self.sans.family.clone(),
            FontFace::Monospace => self.monospace.family.clone(),
        };

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(font.size as f32));
        builder.push_default(parley::style::StyleProperty::Brush(()));

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);

        let baseline = layout
            .lines()
            .next()
            .map(|line| f64::from(line.metrics().baseline))
            .unwrap_or(0.0);
        Ok(Shaped { layout, baseline })
    }

    fn svg_paint_for(
        &mut self,
        doc: &VectorDocument,
        transform: Affine,
    ) -> OverlayResult<(vello_cpu::Image, f64, f64, Affine)> {
        let (w, h, transform_adjust) = svg_raster_params(doc.tree(), transform)?;
        let key = SvgRasterKey {
            source: doc.source().to_owned(),
            width: w,
            height: h,
        };
        if let Some(paint) = self.svg_cache.get(&key).cloned() {
            self.touch_svg(&key);
            return Ok((paint, f64::from(w), f64::from(h), transform_adjust));
        }

        let rgba8_premul = rasterize_svg_to_premul_rgba8(doc.tree(), w, h)?;
        let pixmap = image_premul_bytes_to_pixmap(&rgba8_premul, w, h)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        self.insert_svg(key, paint.clone());
        Ok((paint, f64::from(w), f64::from(h), transform_adjust))
    }

    fn insert_svg(&mut self, key: SvgRasterKey, paint: vello_cpu::Image) {
        self.svg_cache.insert(key.clone(), paint);
        self.touch_svg(&key);
        while self.svg_lru.len() > self.svg_capacity {
            if let Some(old) = self.svg_lru.pop_front() {
                self.svg_cache.remove(&old);
            }
        }
    }

    fn touch_svg(&mut self, key: &SvgRasterKey) {
        if let Some(pos) = self.svg_lru.iter().position(|k| k == key) {
            self.svg_lru.remove(pos);
        }
        self.svg_lru.push_back(key.clone());
    }

    fn draw_svg(&mut self, doc: &VectorDocument, transform: Affine) -> OverlayResult<()> {
        let (paint, w, h, transform_adjust) = self.svg_paint_for(doc, transform)?;
        self.ctx.set_transform(affine_to_cpu(transform_adjust));
        self.ctx.set_paint(paint);
        self.ctx
            .fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));
        Ok(())
    }
}

impl Surface for CpuSurface {
    fn clear(&mut self) {
        self.ctx.reset();
        self.transforms.clear();
        self.clip_depth = 0;
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        if let Some([r, g, b, a]) = self.settings.clear_rgba {
            self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            self.ctx
                .set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
            self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                self.canvas.width_f64(),
                self.canvas.height_f64(),
            ));
        }
    }

    fn push_transform(&mut self, transform: Affine) {
        let next = self.current() * transform;
        self.transforms.push(next);
    }

    fn pop_transform(&mut self) {
        self.transforms.pop();
    }

    fn push_clip(&mut self, rect: Rect) {
        self.ctx.set_transform(affine_to_cpu(self.current()));
        self.ctx.push_clip_layer(&bezpath_to_cpu(&rect_path(rect)));
        self.clip_depth += 1;
    }

    fn pop_clip(&mut self) {
        if self.clip_depth > 0 {
            self.ctx.pop_layer();
            self.clip_depth -= 1;
        }
    }

    fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
        self.ctx.set_transform(affine_to_cpu(self.current()));
        match paint {
            Paint::Solid(c) => self.ctx.set_paint(color_to_cpu(*c)),
            Paint::Radial(g) => {
                let stops: Vec<vello_cpu::peniko::ColorStop> = g
                    .stops
                    .iter()
                    .map(|s| vello_cpu::peniko::ColorStop::from((s.offset, color_to_cpu(s.color))))
                    .collect();
                let gradient =
                    vello_cpu::peniko::Gradient::new_radial(point_to_cpu(g.center), g.radius as f32)
                        .with_stops(stops.as_slice());
                self.ctx.set_paint(gradient);
            }
        }
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            rect.x0, rect.y0, rect.x1, rect.y1,
        ));
    }

    fn stroke_path(&mut self, path: &BezPath, style: &StrokeStyle, color: Color) {
        let cap = match style.cap {
            LineCap::Butt => vello_cpu::kurbo::Cap::Butt,
            LineCap::Round => vello_cpu::kurbo::Cap::Round,
        };
        let join = match style.join {
            LineJoin::Miter => vello_cpu::kurbo::Join::Miter,
            LineJoin::Round => vello_cpu::kurbo::Join::Round,
        };
        self.ctx.set_transform(affine_to_cpu(self.current()));
        self.ctx.set_stroke(
            vello_cpu::kurbo::Stroke::new(style.width)
                .with_caps(cap)
                .with_join(join),
        );
        self.ctx.set_paint(color_to_cpu(color));
        self.ctx.stroke_path(&bezpath_to_cpu(path));
    }

    fn font_extents(&mut self, font: FontSpec) -> OverlayResult<FontExtents> {
        let shaped = self.shape(font, "0")?;
        let line = shaped
            .layout
            .lines()
            .next()
            .ok_or_else(|| OverlayError::render("font produced no line metrics"))?;
        let m = line.metrics();
        Ok(FontExtents {
            ascent: f64::from(m.ascent),
            descent: f64::from(m.descent),
            height: f64::from(m.line_height),
        })
    }

    fn text_advance(&mut self, font: FontSpec, text: &str) -> OverlayResult<f64> {
        let shaped = self.shape(font, text)?;
        let mut advance = 0.0;
        for line in shaped.layout.lines() {
            for item in line.items() {
                if let parley::layout::PositionedLayoutItem::GlyphRun(run) = item {
                    advance += f64::from(run.advance());
                }
            }
        }
        Ok(advance)
    }

    fn draw_text(
        &mut self,
        font: FontSpec,
        text: &str,
        origin: Point,
        style: GlyphStyle,
    ) -> OverlayResult<()> {
        let shaped = self.shape(font, text)?;
        let cpu_font = self.face(font.face).font.clone();
        let transform =
            self.current() * Affine::translate((origin.x, origin.y - shaped.baseline));
        self.ctx.set_transform(affine_to_cpu(transform));

        match style {
            GlyphStyle::Fill(c) => self.ctx.set_paint(color_to_cpu(c)),
            GlyphStyle::Outline { color, width } => {
                self.ctx.set_paint(color_to_cpu(color));
                self.ctx.set_stroke(
                    vello_cpu::kurbo::Stroke::new(width).with_join(vello_cpu::kurbo::Join::Round),
                );
            }
        }

        for line in shaped.layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                let builder = self
                    .ctx
                    .glyph_run(&cpu_font)
                    .font_size(run.run().font_size());
                match style {
                    GlyphStyle::Fill(_) => builder.fill_glyphs(glyphs),
                    GlyphStyle::Outline { .. } => builder.stroke_glyphs(glyphs),
                }
            }
        }
        Ok(())
    }

    fn draw_vector(
        &mut self,
        doc: &VectorDocument,
        placement: VectorPlacement,
    ) -> OverlayResult<()> {
        match placement {
            VectorPlacement::Transform(t) => {
                let transform = self.current() * t;
                self.draw_svg(doc, transform)
            }
            VectorPlacement::Viewport(rect) => {
                if ![rect.x0, rect.y0, rect.x1, rect.y1]
                    .iter()
                    .all(|v| v.is_finite())
                {
                    return Err(OverlayError::render(format!(
                        "vector '{}' viewport is not finite",
                        doc.source()
                    )));
                }
                let (vw, vh) = (rect.width(), rect.height());
                let (dw, dh) = doc.size();
                if vw <= 0.0 || vh <= 0.0 || dw <= 0.0 || dh <= 0.0 {
                    return Ok(());
                }
                let fit = fit_viewport(rect, dw, dh);
                self.push_clip(rect);
                let transform = self.current() * fit;
                let res = self.draw_svg(doc, transform);
                self.pop_clip();
                res
            }
        }
    }

    fn draw_image(&mut self, image: &RasterImage, origin: Point) -> OverlayResult<()> {
        let pixmap =
            image_premul_bytes_to_pixmap(&image.rgba8_premul, image.width, image.height)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        let transform = self.current() * Affine::translate((origin.x, origin.y));
        self.ctx.set_transform(affine_to_cpu(transform));
        self.ctx.set_paint(paint);
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(image.width),
            f64::from(image.height),
        ));
        Ok(())
    }
}

/// Uniform scale that fits a `doc_w × doc_h` document inside `rect`, centred.
pub fn fit_viewport(rect: Rect, doc_w: f64, doc_h: f64) -> Affine {
    let scale = (rect.width() / doc_w).min(rect.height() / doc_h);
    let x = rect.x0 + (rect.width() - doc_w * scale) / 2.0;
    let y = rect.y0 + (rect.height() - doc_h * scale) / 2.0;
    Affine::translate((x, y)) * Affine::scale(scale)
}

fn register_face(
    font_ctx: &mut parley::FontContext,
    bytes: &Arc<Vec<u8>>,
) -> OverlayResult<ShapedFace> {
    let families = font_ctx
        .collection
        .register_fonts(parley::fontique::Blob::from(bytes.as_ref().clone()), None);
    let family_id = families
        .first()
        .map(|(id, _)| *id)
        .ok_or_else(|| OverlayError::load("no font families registered from font bytes"))?;
    let family = font_ctx
        .collection
        .family_name(family_id)
        .ok_or_else(|| OverlayError::load("registered font family has no name"))?
        .to_string();
    let font = vello_cpu::peniko::FontData::new(
        vello_cpu::peniko::Blob::from(bytes.as_ref().clone()),
        0,
    );
    Ok(ShapedFace { family, font })
}

fn rect_path(rect: Rect) -> BezPath {
    let mut p = BezPath::new();
    p.move_to((rect.x0, rect.y0));
    p.line_to((rect.x1, rect.y0));
    p.line_to((rect.x1, rect.y1));
    p.line_to((rect.x0, rect.y1));
    p.close_path();
    p
}

/// Raster size for drawing `tree` under `transform` without blurry upscaling.
///
/// Rasterise at `(width, height)` then draw with the returned adjusted transform.
fn svg_raster_params(
    tree: &usvg::Tree,
    transform: Affine,
) -> OverlayResult<(u32, u32, Affine)> {
    fn to_px(v: f32) -> OverlayResult<u32> {
        if !v.is_finite() || v <= 0.0 {
            return Err(OverlayError::render("vector document has invalid width/height"));
        }
        Ok((v.ceil() as u32).max(1))
    }

    let size = tree.size();
    let base_w = to_px(size.width())?;
    let base_h = to_px(size.height())?;

    let [a, b, c, d, _e, _f] = transform.as_coeffs();
    let sx = (a * a + b * b).sqrt().max(1e-6);
    let sy = (c * c + d * d).sqrt().max(1e-6);

    let w = (f64::from(base_w) * sx).ceil().max(1.0) as u32;
    let h = (f64::from(base_h) * sy).ceil().max(1.0) as u32;

    const MAX_DIM: u32 = 16_384;
    if w > MAX_DIM || h > MAX_DIM {
        return Err(OverlayError::render(format!(
            "vector raster size too large: {w}x{h} (max {MAX_DIM}x{MAX_DIM})"
        )));
    }

    let inv = Affine::scale_non_uniform(1.0 / sx, 1.0 / sy);
    Ok((w, h, transform * inv))
}

fn rasterize_svg_to_premul_rgba8(
    tree: &usvg::Tree,
    width: u32,
    height: u32,
) -> OverlayResult<Vec<u8>> {
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| OverlayError::render("failed to allocate vector pixmap"))?;

    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    Ok(pixmap.data().to_vec())
}

fn color_to_cpu(c: Color) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
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

fn image_premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> OverlayResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| OverlayError::render("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| OverlayError::render("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(OverlayError::render("image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
