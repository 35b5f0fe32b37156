use crate::{
    animation::keyframe::{KeyFrame, Span},
    foundation::core::Color,
    foundation::error::OverlayResult,
    foundation::math::{PixelRect, clamp_corners, lerp_px},
    render::surface::Paint,
    renderers::{FrameContext, ObjectRenderer},
    scene::model::{RectangleFill, RectangleFrame, RectangleObject},
};

impl RectangleObject {
    /// Interpolated, clamped corners and fill colour for `span`.
    pub fn state(
        &self,
        span: &Span<'_, RectangleFrame>,
        canvas: crate::foundation::core::Canvas,
    ) -> (PixelRect, Color) {
        let i = span.progress();
        let (s, e) = span.values();
        let rect = clamp_corners(
            canvas,
            lerp_px(i, s.x1, e.x1),
            lerp_px(i, s.y1, e.y1),
            lerp_px(i, s.x2, e.x2),
            lerp_px(i, s.y2, e.y2),
        );
        let color = match self.fill {
            RectangleFill::Constant(c) => c,
            RectangleFill::Keyframed => {
                let a = s.color.unwrap_or(Color::BLACK);
                let b = e.color.unwrap_or(a);
                a.lerp(b, i)
            }
        };
        (rect, color)
    }
}

impl ObjectRenderer for RectangleObject {
    type Frame = RectangleFrame;

    fn key_frames(&self) -> &[KeyFrame<RectangleFrame>] {
        &self.key_frames
    }

    fn render(
        &self,
        ctx: &mut FrameContext<'_>,
        span: Span<'_, RectangleFrame>,
    ) -> OverlayResult<bool> {
        let (rect, color) = self.state(&span, ctx.canvas());
        ctx.surface.fill_rect(rect.to_rect(), &Paint::Solid(color));
        Ok(true)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/renderers/rectangle.rs"]
mod tests;
