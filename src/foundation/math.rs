//! Geometry helpers shared by the per-kind renderers.

use crate::foundation::core::{Canvas, Point, Rect};

/// Linear interpolation `a + i·(b − a)`.
pub fn lerp(i: f64, a: f64, b: f64) -> f64 {
    a + i * (b - a)
}

/// Integer pixel interpolation, rounded to nearest (halves away from zero).
pub fn lerp_px(i: f64, a: i32, b: i32) -> i32 {
    lerp(i, f64::from(a), f64::from(b)).round() as i32
}

/// Integer rectangle corners after clamping to the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    /// Left edge.
    pub x1: i32,
    /// Top edge.
    pub y1: i32,
    /// Right edge, never left of `x1`.
    pub x2: i32,
    /// Bottom edge, never above `y1`.
    pub y2: i32,
}

impl PixelRect {
    /// Width in pixels.
    pub fn width(self) -> i32 {
        self.x2 - self.x1
    }

    /// Height in pixels.
    pub fn height(self) -> i32 {
        self.y2 - self.y1
    }

    /// Floating point rectangle covering the same pixels.
    pub fn to_rect(self) -> Rect {
        Rect::new(
            f64::from(self.x1),
            f64::from(self.y1),
            f64::from(self.x2),
            f64::from(self.y2),
        )
    }
}

fn clamp_i32(value: i32, min: i32, max: i32) -> i32 {
    if value <= min {
        return min;
    }
    if value >= max {
        return max;
    }
    value
}

/// Clamp rectangle corners so that `0 ≤ x1 ≤ x2 ≤ width` and `0 ≤ y1 ≤ y2 ≤ height`.
///
/// `x2`/`y2` are clamped against the already clamped `x1`/`y1`, so a rectangle whose corners
/// crossed over during interpolation collapses to zero size instead of going negative.
pub fn clamp_corners(canvas: Canvas, x1: i32, y1: i32, x2: i32, y2: i32) -> PixelRect {
    let w = i32::try_from(canvas.width).unwrap_or(i32::MAX);
    let h = i32::try_from(canvas.height).unwrap_or(i32::MAX);

    let x1 = clamp_i32(x1, 0, w);
    let y1 = clamp_i32(y1, 0, h);
    let x2 = clamp_i32(x2, x1, w);
    let y2 = clamp_i32(y2, y1, h);

    PixelRect { x1, y1, x2, y2 }
}

/// De Casteljau split of one cubic axis, keeping the `[0, t]` half.
pub fn subdivide_axis(t: f64, p: [f64; 4]) -> [f64; 4] {
    let t2 = t * t;
    let t3 = t2 * t;
    let rt = 1.0 - t;
    let rt2 = rt * rt;
    let rt3 = rt2 * rt;

    [
        p[0],
        rt * p[0] + t * p[1],
        rt2 * p[0] + 2.0 * rt * t * p[1] + t2 * p[2],
        rt3 * p[0] + 3.0 * rt2 * t * p[1] + 3.0 * rt * t2 * p[2] + t3 * p[3],
    ]
}

/// Control points of the part of a cubic Bézier covering parameters `[0, t]`.
///
/// Returns `None` when `t ≤ 0` (nothing revealed yet). For `t ≥ 1` the input points are
/// returned untouched so the full curve ends exactly on `P3`.
pub fn cubic_prefix(t: f64, points: [Point; 4]) -> Option<[Point; 4]> {
    if t <= 0.0 {
        return None;
    }
    if t >= 1.0 {
        return Some(points);
    }

    let xs = subdivide_axis(t, points.map(|p| p.x));
    let ys = subdivide_axis(t, points.map(|p| p.y));
    Some([
        Point::new(xs[0], ys[0]),
        Point::new(xs[1], ys[1]),
        Point::new(xs[2], ys[2]),
        Point::new(xs[3], ys[3]),
    ])
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
