use crate::{
    foundation::core::{Canvas, Color, Point},
    foundation::error::OverlayResult,
    render::surface::{FontSpec, GlyphStyle, Surface},
};

/// Fill and outline colours for the shared outlined-text look.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    /// Glyph fill colour.
    pub fill: Color,
    /// Halo colour stroked under the fill.
    pub outline: Color,
    /// Halo stroke width in pixels.
    pub outline_width: f64,
}

impl TextStyle {
    /// Black halo whose width scales with the canvas height.
    pub fn for_canvas(canvas: Canvas, fill: Color) -> Self {
        Self {
            fill,
            outline: Color::BLACK,
            outline_width: canvas.height_f64() / 90.0,
        }
    }
}

/// Stroke `text` in the outline colour, then fill it on top.
///
/// Returns the advance, i.e. where the next run starts relative to `origin.x`.
pub fn draw_outlined(
    surface: &mut dyn Surface,
    font: FontSpec,
    text: &str,
    origin: Point,
    style: &TextStyle,
) -> OverlayResult<f64> {
    surface.draw_text(
        font,
        text,
        origin,
        GlyphStyle::Outline {
            color: style.outline,
            width: style.outline_width,
        },
    )?;
    surface.draw_text(font, text, origin, GlyphStyle::Fill(style.fill))?;
    surface.text_advance(font, text)
}

/// One differently-fonted piece of a line.
#[derive(Clone, Debug, PartialEq)]
pub struct TextRun {
    /// Font for this run.
    pub font: FontSpec,
    /// Run contents.
    pub text: String,
}

/// Measured size of a [`TextRuns`] line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunsMetrics {
    /// Sum of run advances.
    pub width: f64,
    /// Largest run ascent.
    pub ascent: f64,
    /// Largest run descent.
    pub descent: f64,
    /// Largest run line height.
    pub height: f64,
}

/// Ordered list of `(font, text)` runs laid out on a single baseline.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextRuns {
    runs: Vec<TextRun>,
}

impl TextRuns {
    /// Empty line.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a run, builder style.
    pub fn with(mut self, font: FontSpec, text: impl Into<String>) -> Self {
        self.push(font, text);
        self
    }

    /// Append a run.
    pub fn push(&mut self, font: FontSpec, text: impl Into<String>) {
        self.runs.push(TextRun {
            font,
            text: text.into(),
        });
    }

    /// Measure the whole line.
    pub fn measure(&self, surface: &mut dyn Surface) -> OverlayResult<RunsMetrics> {
        let mut m = RunsMetrics {
            width: 0.0,
            ascent: 0.0,
            descent: 0.0,
            height: 0.0,
        };
        for run in &self.runs {
            let ext = surface.font_extents(run.font)?;
            m.width += surface.text_advance(run.font, &run.text)?;
            m.ascent = m.ascent.max(ext.ascent);
            m.descent = m.descent.max(ext.descent);
            m.height = m.height.max(ext.height);
        }
        Ok(m)
    }

    /// Draw every run outlined, left to right from `origin` (on the baseline).
    pub fn draw(
        &self,
        surface: &mut dyn Surface,
        origin: Point,
        style: &TextStyle,
    ) -> OverlayResult<f64> {
        let mut x = origin.x;
        for run in &self.runs {
            x += draw_outlined(surface, run.font, &run.text, Point::new(x, origin.y), style)?;
        }
        Ok(x - origin.x)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
