use crate::{
    animation::keyframe::{KeyFrame, Span},
    foundation::core::{Point, Rect},
    foundation::error::OverlayResult,
    render::surface::FontSpec,
    render::text::draw_outlined,
    renderers::{FrameContext, ObjectRenderer},
    scene::model::{ScoreObject, ValueFrame},
};

/// Seconds before the end keyframe during which a changing value slides.
pub const SCORE_SLIDE_TIME: f64 = 0.5;

/// Baseline offsets of the two values shown during a slide.
///
/// `top` is drawn `top_dy` from the baseline and `bottom` `bottom_dy` from it, with
/// `bottom_dy == top_dy + line_height`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Slide {
    pub top: i64,
    pub top_dy: f64,
    pub bottom: i64,
    pub bottom_dy: f64,
}

/// Slide state for a value moving from `start` to `end` with `remaining` seconds until the
/// end keyframe. `None` means the start value is shown statically.
///
/// An increasing value scrolls up (the new value rises from below); a decreasing one scrolls
/// down. Once `remaining` reaches zero the new value sits on the baseline.
pub fn slide_positions(start: i64, end: i64, remaining: f64, line_height: f64) -> Option<Slide> {
    if start == end || remaining > SCORE_SLIDE_TIME {
        return None;
    }
    let remaining = remaining.clamp(0.0, SCORE_SLIDE_TIME);
    let mut offset = line_height * remaining / SCORE_SLIDE_TIME;

    let (top, bottom) = if end > start {
        offset = line_height - offset;
        (start, end)
    } else {
        (end, start)
    };

    Some(Slide {
        top,
        top_dy: -offset,
        bottom,
        bottom_dy: line_height - offset,
    })
}

impl ObjectRenderer for ScoreObject {
    type Frame = ValueFrame;

    fn key_frames(&self) -> &[KeyFrame<ValueFrame>] {
        &self.key_frames
    }

    fn render(
        &self,
        ctx: &mut FrameContext<'_>,
        span: Span<'_, ValueFrame>,
    ) -> OverlayResult<bool> {
        let canvas = ctx.canvas();
        let font = FontSpec::sans(canvas.height_f64() / 10.0);
        let style = ctx.text_style(self.color);
        let (s, e) = span.values();
        let (start, end) = (s.value.to_string(), e.value.to_string());

        let ext = ctx.surface.font_extents(font)?;
        let prefix = self
            .label
            .as_deref()
            .map(|l| format!("{l} "))
            .unwrap_or_default();
        let prefix_w = if prefix.is_empty() {
            0.0
        } else {
            ctx.surface.text_advance(font, &prefix)?
        };
        let value_w = ctx
            .surface
            .text_advance(font, &start)?
            .max(ctx.surface.text_advance(font, &end)?);

        let pos = ctx.layout.place(self.anchor, prefix_w + value_w, ext.height);
        let baseline = pos.y + ext.ascent;
        if !prefix.is_empty() {
            draw_outlined(ctx.surface, font, &prefix, Point::new(pos.x, baseline), &style)?;
        }
        let value_x = pos.x + prefix_w;

        let remaining = span.end.timestamp - ctx.timestamp;
        let Some(slide) = slide_positions(s.value, e.value, remaining, ext.height) else {
            draw_outlined(ctx.surface, font, &start, Point::new(value_x, baseline), &style)?;
            return Ok(true);
        };

        ctx.surface.push_clip(Rect::new(
            0.0,
            baseline - ext.ascent,
            canvas.width_f64(),
            baseline + ext.descent,
        ));
        let drawn = draw_outlined(
            ctx.surface,
            font,
            &slide.bottom.to_string(),
            Point::new(value_x, baseline + slide.bottom_dy),
            &style,
        )
        .and_then(|_| {
            draw_outlined(
                ctx.surface,
                font,
                &slide.top.to_string(),
                Point::new(value_x, baseline + slide.top_dy),
                &style,
            )
        });
        ctx.surface.pop_clip();
        drawn.map(|_| true)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/renderers/score.rs"]
mod tests;
