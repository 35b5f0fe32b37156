//! Per-kind object renderers.
//!
//! Each object kind implements [`ObjectRenderer`]: given the keyframe span active at the
//! frame time it issues drawing commands and reports whether anything was drawn. The scene
//! walker only ever talks to that trait through [`SceneObject::draw`].

pub mod curve;
pub mod rectangle;
pub mod score;
pub mod telemetry;
pub mod text;
pub mod timer;
pub mod vector;

use crate::{
    animation::keyframe::{KeyFrame, KeyFrameCursor, Span},
    engine::Resources,
    foundation::core::{Canvas, Color},
    foundation::error::OverlayResult,
    layout::stacker::LayoutContext,
    render::surface::Surface,
    render::text::TextStyle,
    scene::model::{Scene, SceneObject},
};

/// Everything a renderer may touch while drawing one frame.
pub struct FrameContext<'a> {
    /// Target surface.
    pub surface: &'a mut dyn Surface,
    /// Anchor stacking state for this frame.
    pub layout: &'a mut LayoutContext,
    /// Lazily created collaborators owned by the engine.
    pub resources: &'a mut Resources,
    /// Scene being drawn, for traces and overlays.
    pub scene: &'a Scene,
    /// Frame time in seconds.
    pub timestamp: f64,
}

impl FrameContext<'_> {
    /// Output canvas.
    pub fn canvas(&self) -> Canvas {
        self.scene.canvas
    }

    /// Outlined text style for `fill` on this canvas.
    pub fn text_style(&self, fill: Color) -> TextStyle {
        TextStyle::for_canvas(self.canvas(), fill)
    }
}

/// Rendering capability shared by every object kind.
pub trait ObjectRenderer {
    /// Keyframe payload.
    type Frame;

    /// Ordered keyframes of the object.
    fn key_frames(&self) -> &[KeyFrame<Self::Frame>];

    /// Draw the object's state for `span`. Returns `false` when nothing was drawn.
    fn render(
        &self,
        ctx: &mut FrameContext<'_>,
        span: Span<'_, Self::Frame>,
    ) -> OverlayResult<bool>;
}

/// Locate `object`'s active span and render it; `Ok(false)` when not visible.
pub fn draw_object<R: ObjectRenderer>(
    object: &R,
    ctx: &mut FrameContext<'_>,
    cursor: &mut KeyFrameCursor,
) -> OverlayResult<bool> {
    match cursor.locate(object.key_frames(), ctx.timestamp) {
        Some(span) => object.render(ctx, span),
        None => Ok(false),
    }
}

impl SceneObject {
    /// Draw this object at `ctx.timestamp`.
    pub fn draw(
        &self,
        ctx: &mut FrameContext<'_>,
        cursor: &mut KeyFrameCursor,
    ) -> OverlayResult<bool> {
        match self {
            Self::Rectangle(o) => draw_object(o, ctx, cursor),
            Self::VectorImageFixed(o) => draw_object(o, ctx, cursor),
            Self::VectorImageViewport(o) => draw_object(o, ctx, cursor),
            Self::Score(o) => draw_object(o, ctx, cursor),
            Self::Text(o) => draw_object(o, ctx, cursor),
            Self::Timer(o) => draw_object(o, ctx, cursor),
            Self::Curve(o) => draw_object(o, ctx, cursor),
            Self::Telemetry(o) => draw_object(o, ctx, cursor),
        }
    }
}
