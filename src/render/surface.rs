use crate::{
    assets::{raster::RasterImage, vector::VectorDocument},
    foundation::core::{Affine, BezPath, Color, Point, Rect},
    foundation::error::OverlayResult,
};

/// Typeface family a text run is shaped with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontFace {
    /// Proportional face used for labels.
    Sans,
    /// Fixed-width face used for changing digits.
    Monospace,
}

/// Face plus pixel size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontSpec {
    /// Typeface family.
    pub face: FontFace,
    /// Font size in pixels.
    pub size: f64,
}

impl FontSpec {
    /// Proportional face at `size` pixels.
    pub fn sans(size: f64) -> Self {
        Self {
            face: FontFace::Sans,
            size,
        }
    }

    /// Fixed-width face at `size` pixels.
    pub fn monospace(size: f64) -> Self {
        Self {
            face: FontFace::Monospace,
            size,
        }
    }
}

/// Font-wide vertical metrics.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontExtents {
    /// Distance from baseline to the top of the tallest glyphs.
    pub ascent: f64,
    /// Distance from baseline to the bottom of descending glyphs.
    pub descent: f64,
    /// Recommended line height.
    pub height: f64,
}

/// How glyphs are painted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GlyphStyle {
    /// Fill the glyph outlines.
    Fill(Color),
    /// Stroke the glyph outlines with round joins.
    Outline {
        /// Stroke colour.
        color: Color,
        /// Stroke width in pixels.
        width: f64,
    },
}

/// Colour stop of a gradient.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    /// Position along the gradient in `[0, 1]`.
    pub offset: f32,
    /// Colour at `offset`.
    pub color: Color,
}

/// Radial gradient centred on `center`, stops spread from the centre to `radius`.
#[derive(Clone, Debug, PartialEq)]
pub struct RadialGradient {
    /// Gradient centre.
    pub center: Point,
    /// Radius where the last stop is reached.
    pub radius: f64,
    /// Ordered colour stops.
    pub stops: Vec<GradientStop>,
}

/// Fill source.
#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    /// Solid colour.
    Solid(Color),
    /// Radial gradient.
    Radial(RadialGradient),
}

/// Line end style.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineCap {
    /// Flat end at the endpoint.
    #[default]
    Butt,
    /// Semicircle centred on the endpoint.
    Round,
}

/// Line corner style.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineJoin {
    /// Sharp corners.
    #[default]
    Miter,
    /// Rounded corners.
    Round,
}

/// Requested antialiasing quality.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Antialias {
    /// Surface default.
    #[default]
    Default,
    /// Highest quality the surface offers.
    Best,
}

/// Stroke parameters for [`Surface::stroke_path`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStyle {
    /// Line width in pixels.
    pub width: f64,
    /// End caps.
    pub cap: LineCap,
    /// Corner joins.
    pub join: LineJoin,
    /// Antialiasing quality.
    pub antialias: Antialias,
}

impl StrokeStyle {
    /// Stroke with default caps and joins.
    pub fn new(width: f64) -> Self {
        Self {
            width,
            cap: LineCap::default(),
            join: LineJoin::default(),
            antialias: Antialias::default(),
        }
    }
}

/// Where a vector document lands on the surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum VectorPlacement {
    /// Draw at the document's natural size under `transform`, unclipped.
    Transform(Affine),
    /// Scale uniformly to fit, centre, and clip to the rectangle.
    Viewport(Rect),
}

/// Drawing surface the renderers issue commands to.
///
/// Transforms and clips are stacks: every push is matched by a pop within the same render
/// call. Coordinates are in canvas pixels before the current transform is applied.
pub trait Surface {
    /// Drop everything drawn so far and reset transform/clip stacks.
    fn clear(&mut self);

    /// Concatenate `transform` onto the current transform.
    fn push_transform(&mut self, transform: Affine);

    /// Restore the transform active before the matching push.
    fn pop_transform(&mut self);

    /// Intersect the clip with `rect` (in current user space).
    fn push_clip(&mut self, rect: Rect);

    /// Restore the clip active before the matching push.
    fn pop_clip(&mut self);

    /// Fill an axis-aligned rectangle.
    fn fill_rect(&mut self, rect: Rect, paint: &Paint);

    /// Stroke a path.
    fn stroke_path(&mut self, path: &BezPath, style: &StrokeStyle, color: Color);

    /// Vertical metrics of `font`.
    fn font_extents(&mut self, font: FontSpec) -> OverlayResult<FontExtents>;

    /// Horizontal advance of `text` in `font`.
    fn text_advance(&mut self, font: FontSpec, text: &str) -> OverlayResult<f64>;

    /// Paint `text` with its baseline starting at `origin`.
    fn draw_text(
        &mut self,
        font: FontSpec,
        text: &str,
        origin: Point,
        style: GlyphStyle,
    ) -> OverlayResult<()>;

    /// Render a vector document.
    fn draw_vector(
        &mut self,
        doc: &VectorDocument,
        placement: VectorPlacement,
    ) -> OverlayResult<()>;

    /// Draw a raster image with its top-left corner at `origin`.
    fn draw_image(&mut self, image: &RasterImage, origin: Point) -> OverlayResult<()>;
}
