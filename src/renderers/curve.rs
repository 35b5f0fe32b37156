use crate::{
    animation::keyframe::{KeyFrame, Span},
    foundation::core::{BezPath, Point},
    foundation::error::OverlayResult,
    foundation::math::{cubic_prefix, lerp},
    render::surface::{Antialias, LineCap, LineJoin, StrokeStyle},
    renderers::{FrameContext, ObjectRenderer},
    scene::model::{CurveFrame, CurveObject},
};

impl CurveObject {
    /// Revealed part of the interpolated curve and its stroke width, or `None` when nothing
    /// is revealed yet.
    pub fn revealed(&self, span: &Span<'_, CurveFrame>) -> Option<(BezPath, f64)> {
        let i = span.progress();
        let (s, e) = span.values();
        let t = lerp(i, s.t, e.t);

        let points: [Point; 4] = std::array::from_fn(|p| {
            Point::new(
                lerp(i, s.points[p].x, e.points[p].x),
                lerp(i, s.points[p].y, e.points[p].y),
            )
        });
        let [p0, p1, p2, p3] = cubic_prefix(t, points)?;

        let mut path = BezPath::new();
        path.move_to(p0);
        path.curve_to(p1, p2, p3);
        Some((path, lerp(i, s.stroke_width, e.stroke_width)))
    }
}

impl ObjectRenderer for CurveObject {
    type Frame = CurveFrame;

    fn key_frames(&self) -> &[KeyFrame<CurveFrame>] {
        &self.key_frames
    }

    fn render(
        &self,
        ctx: &mut FrameContext<'_>,
        span: Span<'_, CurveFrame>,
    ) -> OverlayResult<bool> {
        let Some((path, width)) = self.revealed(&span) else {
            return Ok(false);
        };
        let style = StrokeStyle {
            width,
            cap: LineCap::Round,
            join: LineJoin::Round,
            antialias: Antialias::Best,
        };
        ctx.surface.stroke_path(&path, &style, self.color);
        Ok(true)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/renderers/curve.rs"]
mod tests;
