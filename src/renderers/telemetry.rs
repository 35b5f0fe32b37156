use crate::{
    animation::keyframe::{KeyFrame, Span},
    engine::MAP_POINT_SIZE,
    foundation::core::{Affine, Color, Point, Rect, Vec2},
    foundation::error::OverlayResult,
    foundation::math::lerp,
    layout::stacker::{Anchor, HAlign},
    render::surface::{FontSpec, VectorPlacement},
    render::text::{TextRuns, draw_outlined},
    renderers::{FrameContext, ObjectRenderer},
    scene::model::{SpeedDial, TelemetryElement, TelemetryGroup, TraceFrame},
    telemetry::{
        map::{LatLon, MapRequest},
        trace::TraceSource,
    },
};

/// Tile-space pixels shown across a map panel.
pub const MAP_SIZE_TILE_UNITS: u32 = 216;

/// Label drawn under the elevation value.
pub const ELEVATION_LABEL: &str = "ELEVATION";

/// Rounded km/h for a speed in m/s.
pub fn speed_kmh(speed_ms: f64) -> i64 {
    (speed_ms * 3600.0 / 1000.0).round() as i64
}

/// Value and unit text for a distance in metres: whole metres below 1 km, else km with two
/// decimals.
pub fn format_distance(metres: f64) -> (String, &'static str) {
    let m = metres.round();
    if m < 1000.0 {
        (format!("{}", m as i64), " m")
    } else {
        (format!("{:.2}", metres / 1000.0), " km")
    }
}

/// Needle angle in radians: a full turn at `full_speed`.
pub fn needle_angle(speed_ms: f64, full_speed: f64) -> f64 {
    speed_ms * std::f64::consts::TAU / full_speed
}

fn align_x(left: f64, box_width: f64, width: f64, h: HAlign) -> f64 {
    match h {
        HAlign::Left => left,
        HAlign::Middle => left + (box_width - width) / 2.0,
        HAlign::Right => left + box_width - width,
    }
}

impl ObjectRenderer for TelemetryGroup {
    type Frame = TraceFrame;

    fn key_frames(&self) -> &[KeyFrame<TraceFrame>] {
        &self.key_frames
    }

    fn render(
        &self,
        ctx: &mut FrameContext<'_>,
        span: Span<'_, TraceFrame>,
    ) -> OverlayResult<bool> {
        let (s, e) = span.values();
        let trace_time = lerp(span.progress(), s.trace_timestamp, e.trace_timestamp);

        let scene = ctx.scene;
        let Some(trace) = scene.traces.get(&self.trace) else {
            tracing::warn!(trace = %self.trace, "telemetry group references unknown trace");
            return Ok(false);
        };
        let Some(sample) = trace.find_sample(trace_time) else {
            tracing::debug!(trace = %self.trace, trace_time, "no telemetry sample");
            return Ok(false);
        };

        for element in &self.elements {
            match element {
                TelemetryElement::Speed { anchor, dial } => match dial {
                    Some(dial) => draw_speed_dial(ctx, *anchor, dial, sample.speed)?,
                    None => draw_speed(ctx, *anchor, sample.speed)?,
                },
                TelemetryElement::Elevation { anchor } => {
                    draw_elevation(ctx, *anchor, sample.elevation)?
                }
                TelemetryElement::Distance { anchor, offset } => {
                    draw_distance(ctx, *anchor, sample.distance + offset)?
                }
                TelemetryElement::Map {
                    anchor,
                    overlay,
                    trace_color,
                    zoom,
                } => {
                    let overlay = overlay.as_ref().and_then(|name| {
                        let found = scene.overlays.get(name);
                        if found.is_none() {
                            tracing::warn!(overlay = %name, "map references unknown overlay");
                        }
                        found
                    });
                    let request = MapRequest {
                        zoom: *zoom,
                        center: LatLon::new(sample.lat, sample.lon),
                        draw_center: Point::ZERO,
                        width: MAP_SIZE_TILE_UNITS,
                        height: MAP_SIZE_TILE_UNITS,
                        trace: overlay,
                        trace_color: *trace_color,
                        timestamp: trace_time,
                    };
                    draw_map(ctx, *anchor, &request)?
                }
            }
        }
        Ok(!self.elements.is_empty())
    }
}

fn draw_readout(ctx: &mut FrameContext<'_>, anchor: Anchor, runs: &TextRuns) -> OverlayResult<()> {
    let style = ctx.text_style(Color::WHITE);
    let m = runs.measure(ctx.surface)?;
    let pos = ctx.layout.place(anchor, m.width, m.ascent + m.descent);
    runs.draw(ctx.surface, Point::new(pos.x, pos.y + m.ascent), &style)?;
    Ok(())
}

fn draw_speed(ctx: &mut FrameContext<'_>, anchor: Anchor, speed_ms: f64) -> OverlayResult<()> {
    let h = ctx.canvas().height_f64();
    let runs = TextRuns::new()
        .with(FontSpec::monospace(h / 12.0), format!("{:>2}", speed_kmh(speed_ms)))
        .with(FontSpec::sans(h / 24.0), " km/h");
    draw_readout(ctx, anchor, &runs)
}

fn draw_speed_dial(
    ctx: &mut FrameContext<'_>,
    anchor: Anchor,
    dial: &SpeedDial,
    speed_ms: f64,
) -> OverlayResult<()> {
    let face = ctx.resources.vector(&dial.face)?;
    let needle = ctx.resources.vector(&dial.needle)?;
    let (w, h) = face.size();
    let pos = ctx.layout.place(anchor, w, h);
    let origin = Affine::translate(pos.to_vec2());

    ctx.surface
        .draw_vector(&face, VectorPlacement::Transform(origin))?;
    let rotation = Affine::rotate_about(
        needle_angle(speed_ms, dial.full_speed),
        Point::new(w / 2.0, h / 2.0),
    );
    ctx.surface
        .draw_vector(&needle, VectorPlacement::Transform(origin * rotation))
}

fn draw_elevation(ctx: &mut FrameContext<'_>, anchor: Anchor, elevation: f64) -> OverlayResult<()> {
    let h = ctx.canvas().height_f64();
    let style = ctx.text_style(Color::WHITE);
    let value_font = FontSpec::monospace(h / 12.0);
    let label_font = FontSpec::sans(h / 30.0);
    let value = format!("{:>2}", elevation.round() as i64);

    let value_ext = ctx.surface.font_extents(value_font)?;
    let label_ext = ctx.surface.font_extents(label_font)?;
    let value_w = ctx.surface.text_advance(value_font, &value)?;
    let label_w = ctx.surface.text_advance(label_font, ELEVATION_LABEL)?;

    let label_drop = label_ext.ascent * 1.3;
    let width = value_w.max(label_w);
    let height = value_ext.ascent + label_drop + label_ext.descent;
    let pos = ctx.layout.place(anchor, width, height);

    let baseline = pos.y + value_ext.ascent;
    draw_outlined(
        ctx.surface,
        value_font,
        &value,
        Point::new(align_x(pos.x, width, value_w, anchor.h), baseline),
        &style,
    )?;
    draw_outlined(
        ctx.surface,
        label_font,
        ELEVATION_LABEL,
        Point::new(align_x(pos.x, width, label_w, anchor.h), baseline + label_drop),
        &style,
    )?;
    Ok(())
}

fn draw_distance(ctx: &mut FrameContext<'_>, anchor: Anchor, metres: f64) -> OverlayResult<()> {
    let h = ctx.canvas().height_f64();
    let (value, unit) = format_distance(metres);
    let runs = TextRuns::new()
        .with(FontSpec::monospace(h / 12.0), value)
        .with(FontSpec::sans(h / 24.0), unit);
    draw_readout(ctx, anchor, &runs)
}

fn draw_map(
    ctx: &mut FrameContext<'_>,
    anchor: Anchor,
    request: &MapRequest<'_>,
) -> OverlayResult<()> {
    let size = ctx.canvas().height_f64() * 0.3;
    let pos = ctx.layout.place(anchor, size, size);
    let center = pos + Vec2::new(size / 2.0, size / 2.0);
    let scale = size / f64::from(MAP_SIZE_TILE_UNITS);

    ctx.surface
        .push_transform(Affine::translate(center.to_vec2()) * Affine::scale(scale));
    if let Err(e) = ctx.resources.map_renderer().render(ctx.surface, request) {
        tracing::warn!(error = %e, "map panel failed");
        ctx.surface.pop_transform();
        return Err(e);
    }

    let half = MAP_POINT_SIZE / 2.0;
    let marker = ctx.resources.marker_paint().clone();
    ctx.surface
        .fill_rect(Rect::new(-half, -half, half, half), &marker);
    ctx.surface.pop_transform();
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/renderers/telemetry.rs"]
mod tests;
