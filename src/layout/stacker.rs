use crate::foundation::core::{Canvas, Point};

/// Horizontal anchor edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HAlign {
    /// Left edge, `gap` from the border.
    #[default]
    Left,
    /// Horizontally centred.
    Middle,
    /// Right edge, `gap` from the border.
    Right,
}

/// Vertical anchor edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VAlign {
    /// Stack downwards from the top edge.
    #[default]
    Top,
    /// Stack upwards from the bottom edge.
    Bottom,
}

/// Corner/edge placement category for auto-stacked overlay elements.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Anchor {
    /// Horizontal edge.
    #[serde(default)]
    pub h: HAlign,
    /// Vertical edge.
    #[serde(default)]
    pub v: VAlign,
}

impl Anchor {
    /// Build an anchor.
    pub const fn new(h: HAlign, v: VAlign) -> Self {
        Self { h, v }
    }

    fn slot(self) -> usize {
        let h = match self.h {
            HAlign::Left => 0,
            HAlign::Middle => 1,
            HAlign::Right => 2,
        };
        let v = match self.v {
            VAlign::Top => 0,
            VAlign::Bottom => 1,
        };
        h * 2 + v
    }
}

/// Per-render-call stacking state.
///
/// One running offset per anchor. Objects placed at the same anchor are pushed further from
/// the edge in placement order, so a fresh context must be used for every frame.
#[derive(Clone, Debug)]
pub struct LayoutContext {
    canvas: Canvas,
    gap: f64,
    offsets: [f64; 6],
}

impl LayoutContext {
    /// Context with every offset at zero and the margin derived from the canvas height.
    pub fn new(canvas: Canvas) -> Self {
        Self::with_gap(canvas, canvas.height_f64() / 15.0)
    }

    /// Context with an explicit margin.
    pub fn with_gap(canvas: Canvas, gap: f64) -> Self {
        Self {
            canvas,
            gap,
            offsets: [0.0; 6],
        }
    }

    /// Margin between stacked elements and the canvas border.
    pub fn gap(&self) -> f64 {
        self.gap
    }

    /// Canvas the context places into.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Accumulated height already claimed at `anchor`.
    pub fn offset(&self, anchor: Anchor) -> f64 {
        self.offsets[anchor.slot()]
    }

    /// Zero every running offset.
    pub fn reset(&mut self) {
        self.offsets = [0.0; 6];
    }

    /// Top-left position for a `width × height` box at `anchor`, then claim its height.
    pub fn place(&mut self, anchor: Anchor, width: f64, height: f64) -> Point {
        let canvas_w = self.canvas.width_f64();
        let canvas_h = self.canvas.height_f64();
        let slot = anchor.slot();
        let offset = self.offsets[slot];

        let x = match anchor.h {
            HAlign::Left => self.gap,
            HAlign::Middle => (canvas_w - width) / 2.0,
            HAlign::Right => canvas_w - self.gap - width,
        };
        let y = match anchor.v {
            VAlign::Top => self.gap + offset,
            VAlign::Bottom => canvas_h - self.gap - offset - height,
        };

        self.offsets[slot] = offset + height;
        Point::new(x, y)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/stacker.rs"]
mod tests;
