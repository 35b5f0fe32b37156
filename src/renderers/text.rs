use crate::{
    animation::keyframe::{KeyFrame, Span},
    foundation::core::Point,
    foundation::error::OverlayResult,
    render::surface::FontSpec,
    render::text::draw_outlined,
    renderers::{FrameContext, ObjectRenderer},
    scene::model::{TextObject, TimeFrame},
};

impl ObjectRenderer for TextObject {
    type Frame = TimeFrame;

    fn key_frames(&self) -> &[KeyFrame<TimeFrame>] {
        &self.key_frames
    }

    fn render(
        &self,
        ctx: &mut FrameContext<'_>,
        _span: Span<'_, TimeFrame>,
    ) -> OverlayResult<bool> {
        let font = FontSpec::sans(ctx.canvas().height_f64() / 10.0);
        let style = ctx.text_style(self.color);
        draw_anchored(ctx, font, &self.text, self.anchor, &style)?;
        Ok(true)
    }
}

/// Place a single outlined line at `anchor` and draw it.
pub(crate) fn draw_anchored(
    ctx: &mut FrameContext<'_>,
    font: FontSpec,
    text: &str,
    anchor: crate::layout::stacker::Anchor,
    style: &crate::render::text::TextStyle,
) -> OverlayResult<()> {
    let ext = ctx.surface.font_extents(font)?;
    let width = ctx.surface.text_advance(font, text)?;
    let pos = ctx.layout.place(anchor, width, ext.height);
    draw_outlined(ctx.surface, font, text, Point::new(pos.x, pos.y + ext.ascent), style)?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/renderers/text.rs"]
mod tests;
