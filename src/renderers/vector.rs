use crate::{
    animation::keyframe::{KeyFrame, Span},
    foundation::core::{Affine, Rect},
    foundation::error::OverlayResult,
    foundation::math::{lerp, lerp_px},
    render::surface::VectorPlacement,
    renderers::{FrameContext, ObjectRenderer},
    scene::model::{OffsetFrame, VectorFixedObject, VectorViewportObject, ViewportFrame},
};

impl ObjectRenderer for VectorFixedObject {
    type Frame = OffsetFrame;

    fn key_frames(&self) -> &[KeyFrame<OffsetFrame>] {
        &self.key_frames
    }

    fn render(
        &self,
        ctx: &mut FrameContext<'_>,
        span: Span<'_, OffsetFrame>,
    ) -> OverlayResult<bool> {
        let i = span.progress();
        let (s, e) = span.values();
        let x = lerp_px(i, s.x, e.x);
        let y = lerp_px(i, s.y, e.y);

        let doc = ctx.resources.vector(&self.source)?;
        ctx.surface.draw_vector(
            &doc,
            VectorPlacement::Transform(Affine::translate((f64::from(x), f64::from(y)))),
        )?;
        Ok(true)
    }
}

/// Axis-aligned viewport spanned by two interpolated corners.
pub fn viewport_rect(i: f64, s: &ViewportFrame, e: &ViewportFrame) -> Rect {
    let x1 = lerp(i, s.x1, e.x1);
    let y1 = lerp(i, s.y1, e.y1);
    let x2 = lerp(i, s.x2, e.x2);
    let y2 = lerp(i, s.y2, e.y2);
    let x = x1.min(x2);
    let y = y1.min(y2);
    Rect::new(x, y, x + (x1 - x2).abs(), y + (y1 - y2).abs())
}

impl ObjectRenderer for VectorViewportObject {
    type Frame = ViewportFrame;

    fn key_frames(&self) -> &[KeyFrame<ViewportFrame>] {
        &self.key_frames
    }

    fn render(
        &self,
        ctx: &mut FrameContext<'_>,
        span: Span<'_, ViewportFrame>,
    ) -> OverlayResult<bool> {
        let (s, e) = span.values();
        let viewport = viewport_rect(span.progress(), s, e);
        if viewport.width() <= 0.0 || viewport.height() <= 0.0 {
            return Ok(false);
        }

        let doc = ctx.resources.vector(&self.source)?;
        ctx.surface
            .draw_vector(&doc, VectorPlacement::Viewport(viewport))?;
        Ok(true)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/renderers/vector.rs"]
mod tests;
