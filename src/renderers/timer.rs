use crate::{
    animation::keyframe::{KeyFrame, Span},
    foundation::error::OverlayResult,
    foundation::math::lerp,
    render::surface::FontSpec,
    renderers::{FrameContext, ObjectRenderer, text::draw_anchored},
    scene::model::{TimerObject, ValueFrame},
};

/// Format whole seconds as `Ns`, `MmSSs` or `HhMMmSSs`; negatives get a leading `-`.
pub fn format_timer(seconds: i64) -> String {
    let sign = if seconds < 0 { "-" } else { "" };
    let v = seconds.unsigned_abs();
    if v >= 3600 {
        format!("{sign}{}h{:02}m{:02}s", v / 3600, v / 60 % 60, v % 60)
    } else if v >= 60 {
        format!("{sign}{}m{:02}s", v / 60, v % 60)
    } else {
        format!("{sign}{v}s")
    }
}

impl ObjectRenderer for TimerObject {
    type Frame = ValueFrame;

    fn key_frames(&self) -> &[KeyFrame<ValueFrame>] {
        &self.key_frames
    }

    fn render(
        &self,
        ctx: &mut FrameContext<'_>,
        span: Span<'_, ValueFrame>,
    ) -> OverlayResult<bool> {
        let (s, e) = span.values();
        let value = lerp(span.progress(), s.value as f64, e.value as f64) as i64;

        let font = FontSpec::sans(ctx.canvas().height_f64() / 10.0);
        let style = ctx.text_style(self.color);
        draw_anchored(ctx, font, &format_timer(value), self.anchor, &style)?;
        Ok(true)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/renderers/timer.rs"]
mod tests;
