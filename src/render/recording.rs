use crate::{
    assets::{raster::RasterImage, vector::VectorDocument},
    foundation::core::{Affine, BezPath, Color, Point, Rect},
    foundation::error::{OverlayError, OverlayResult},
    render::surface::{
        FontExtents, FontSpec, GlyphStyle, Paint, StrokeStyle, Surface, VectorPlacement,
    },
};

/// One recorded surface command.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Clear,
    PushTransform(Affine),
    PopTransform,
    PushClip(Rect),
    PopClip,
    FillRect {
        rect: Rect,
        paint: Paint,
    },
    StrokePath {
        path: BezPath,
        style: StrokeStyle,
        color: Color,
    },
    Text {
        font: FontSpec,
        text: String,
        origin: Point,
        style: GlyphStyle,
    },
    Vector {
        source: String,
        placement: VectorPlacement,
    },
    Image {
        width: u32,
        height: u32,
        origin: Point,
    },
}

/// [`Surface`] that keeps a display list instead of pixels.
///
/// Text metrics are synthetic: every character advances `0.6 * size`, ascent is `0.9 * size`
/// and descent `0.3 * size`. This keeps layout arithmetic exact in tests without font files.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    ops: Vec<DrawOp>,
    transform_depth: usize,
    clip_depth: usize,
}

impl RecordingSurface {
    /// Per-character advance as a fraction of the font size.
    pub const ADVANCE: f64 = 0.6;
    /// Ascent as a fraction of the font size.
    pub const ASCENT: f64 = 0.9;
    /// Descent as a fraction of the font size.
    pub const DESCENT: f64 = 0.3;

    pub fn new() -> Self {
        Self::default()
    }

    /// Commands recorded since construction or the last [`Self::take_ops`].
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Drain the recorded commands.
    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }

    /// Open transform pushes.
    pub fn transform_depth(&self) -> usize {
        self.transform_depth
    }

    /// Open clip pushes.
    pub fn clip_depth(&self) -> usize {
        self.clip_depth
    }

    /// Recorded ops other than [`DrawOp::Clear`].
    pub fn drawn(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(|op| !matches!(op, DrawOp::Clear))
    }

    /// Text filled (not outlined) with its origin, in draw order.
    pub fn filled_text(&self) -> Vec<(String, Point)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text {
                    text,
                    origin,
                    style: GlyphStyle::Fill(_),
                    ..
                } => Some((text.clone(), *origin)),
                _ => None,
            })
            .collect()
    }

    /// Rectangles filled, in draw order.
    pub fn filled_rects(&self) -> Vec<(Rect, Paint)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillRect { rect, paint } => Some((*rect, paint.clone())),
                _ => None,
            })
            .collect()
    }

    fn check_font(font: FontSpec) -> OverlayResult<()> {
        if !font.size.is_finite() || font.size <= 0.0 {
            return Err(OverlayError::render("font size must be finite and > 0"));
        }
        Ok(())
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self) {
        self.ops.clear();
        self.ops.push(DrawOp::Clear);
        self.transform_depth = 0;
        self.clip_depth = 0;
    }

    fn push_transform(&mut self, transform: Affine) {
        self.transform_depth += 1;
        self.ops.push(DrawOp::PushTransform(transform));
    }

    fn pop_transform(&mut self) {
        self.transform_depth = self.transform_depth.saturating_sub(1);
        self.ops.push(DrawOp::PopTransform);
    }

    fn push_clip(&mut self, rect: Rect) {
        self.clip_depth += 1;
        self.ops.push(DrawOp::PushClip(rect));
    }

    fn pop_clip(&mut self) {
        self.clip_depth = self.clip_depth.saturating_sub(1);
        self.ops.push(DrawOp::PopClip);
    }

    fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
        self.ops.push(DrawOp::FillRect {
            rect,
            paint: paint.clone(),
        });
    }

    fn stroke_path(&mut self, path: &BezPath, style: &StrokeStyle, color: Color) {
        self.ops.push(DrawOp::StrokePath {
            path: path.clone(),
            style: *style,
            color,
        });
    }

    fn font_extents(&mut self, font: FontSpec) -> OverlayResult<FontExtents> {
        Self::check_font(font)?;
        let ascent = font.size * Self::ASCENT;
        let descent = font.size * Self::DESCENT;
        Ok(FontExtents {
            ascent,
            descent,
            height: ascent + descent,
        })
    }

    fn text_advance(&mut self, font: FontSpec, text: &str) -> OverlayResult<f64> {
        Self::check_font(font)?;
        Ok(text.chars().count() as f64 * font.size * Self::ADVANCE)
    }

    fn draw_text(
        &mut self,
        font: FontSpec,
        text: &str,
        origin: Point,
        style: GlyphStyle,
    ) -> OverlayResult<()> {
        Self::check_font(font)?;
        self.ops.push(DrawOp::Text {
            font,
            text: text.to_owned(),
            origin,
            style,
        });
        Ok(())
    }

    fn draw_vector(
        &mut self,
        doc: &VectorDocument,
        placement: VectorPlacement,
    ) -> OverlayResult<()> {
        self.ops.push(DrawOp::Vector {
            source: doc.source().to_owned(),
            placement,
        });
        Ok(())
    }

    fn draw_image(&mut self, image: &RasterImage, origin: Point) -> OverlayResult<()> {
        self.ops.push(DrawOp::Image {
            width: image.width,
            height: image.height,
            origin,
        });
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/recording.rs"]
mod tests;
