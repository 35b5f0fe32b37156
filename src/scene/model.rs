use std::collections::BTreeMap;

use crate::{
    animation::keyframe::KeyFrame,
    foundation::core::{Canvas, Color, Point},
    foundation::error::{OverlayError, OverlayResult},
    layout::stacker::Anchor,
    telemetry::{
        map::{MapConfig, TraceOverlay},
        trace::Trace,
    },
};

/// Default needle full-turn speed in m/s.
pub const DEFAULT_FULL_SPEED: f64 = 20.0;
/// Default slippy-map zoom of map panels.
pub const DEFAULT_MAP_ZOOM: u32 = 17;

fn white() -> Color {
    Color::WHITE
}

fn default_trace_color() -> Color {
    Color::rgb(255, 64, 0)
}

fn default_full_speed() -> f64 {
    DEFAULT_FULL_SPEED
}

fn default_zoom() -> u32 {
    DEFAULT_MAP_ZOOM
}

/// A complete overlay scene: canvas, collaborator configuration and ordered objects.
///
/// Object order is both z-order and layout-stacking order.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Scene {
    /// Output canvas.
    pub canvas: Canvas,
    /// Map tile source, passed through to the map collaborator.
    #[serde(default)]
    pub map: MapConfig,
    /// Telemetry traces referenced by telemetry groups.
    #[serde(default)]
    pub traces: BTreeMap<String, Trace>,
    /// Route overlays referenced by map elements.
    #[serde(default)]
    pub overlays: BTreeMap<String, TraceOverlay>,
    /// Objects in draw order.
    #[serde(default)]
    pub objects: Vec<SceneObject>,
}

impl Scene {
    /// Empty scene on `canvas`.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            map: MapConfig::default(),
            traces: BTreeMap::new(),
            overlays: BTreeMap::new(),
            objects: Vec::new(),
        }
    }

    /// Append an object, builder style.
    pub fn with_object(mut self, object: impl Into<SceneObject>) -> Self {
        self.objects.push(object.into());
        self
    }

    /// Register a trace, builder style.
    pub fn with_trace(mut self, name: impl Into<String>, trace: Trace) -> Self {
        self.traces.insert(name.into(), trace);
        self
    }

    /// Parse a scene from JSON.
    pub fn from_json(json: &str) -> OverlayResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| OverlayError::validation(format!("scene json: {e}")))
    }

    /// Greatest final-keyframe timestamp across all objects, or 0 for an empty scene.
    pub fn max_timestamp(&self) -> f64 {
        self.objects
            .iter()
            .filter_map(SceneObject::last_timestamp)
            .fold(0.0, f64::max)
    }

    /// Check the invariants rendering relies on.
    ///
    /// All problems are reported at once, one per line, prefixed with a `$.path`.
    pub fn validate(&self) -> OverlayResult<()> {
        let mut errors = Vec::new();

        if self.canvas.width == 0 || self.canvas.height == 0 {
            errors.push("$.canvas: width and height must be > 0".to_owned());
        }

        for (i, object) in self.objects.iter().enumerate() {
            let path = format!("$.objects[{i}]");
            if let Some(k) = object.first_unsorted_key_frame() {
                errors.push(format!(
                    "{path}.key_frames[{k}]: timestamps must be ascending"
                ));
            }
            match object {
                SceneObject::Rectangle(r) => {
                    if r.fill == RectangleFill::Keyframed {
                        for (k, kf) in r.key_frames.iter().enumerate() {
                            if kf.value.color.is_none() {
                                errors.push(format!(
                                    "{path}.key_frames[{k}]: keyframed rectangle needs a color"
                                ));
                            }
                        }
                    }
                }
                SceneObject::VectorImageFixed(v) if v.source.is_empty() => {
                    errors.push(format!("{path}.source: must not be empty"));
                }
                SceneObject::VectorImageViewport(v) if v.source.is_empty() => {
                    errors.push(format!("{path}.source: must not be empty"));
                }
                SceneObject::Telemetry(g) => self.validate_group(&path, g, &mut errors),
                _ => {}
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(OverlayError::validation(errors.join("\n")))
        }
    }

    fn validate_group(&self, path: &str, group: &TelemetryGroup, errors: &mut Vec<String>) {
        if !self.traces.contains_key(&group.trace) {
            errors.push(format!("{path}.trace: unknown trace '{}'", group.trace));
        }
        for (e, element) in group.elements.iter().enumerate() {
            match element {
                TelemetryElement::Speed {
                    dial: Some(dial), ..
                } if !(dial.full_speed.is_finite() && dial.full_speed > 0.0) => {
                    errors.push(format!(
                        "{path}.elements[{e}].dial.full_speed: must be finite and > 0"
                    ));
                }
                TelemetryElement::Map {
                    overlay: Some(name),
                    ..
                } if !self.overlays.contains_key(name) => {
                    errors.push(format!(
                        "{path}.elements[{e}].overlay: unknown overlay '{name}'"
                    ));
                }
                _ => {}
            }
        }
    }
}

/// Closed set of object kinds.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SceneObject {
    Rectangle(RectangleObject),
    VectorImageFixed(VectorFixedObject),
    VectorImageViewport(VectorViewportObject),
    Score(ScoreObject),
    Text(TextObject),
    Timer(TimerObject),
    Curve(CurveObject),
    Telemetry(TelemetryGroup),
}

impl SceneObject {
    /// Short kind name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Rectangle(_) => "rectangle",
            Self::VectorImageFixed(_) => "vector_image_fixed",
            Self::VectorImageViewport(_) => "vector_image_viewport",
            Self::Score(_) => "score",
            Self::Text(_) => "text",
            Self::Timer(_) => "timer",
            Self::Curve(_) => "curve",
            Self::Telemetry(_) => "telemetry",
        }
    }

    fn timestamps(&self) -> Vec<f64> {
        fn ts<T>(k: &[KeyFrame<T>]) -> Vec<f64> {
            k.iter().map(|k| k.timestamp).collect()
        }
        match self {
            Self::Rectangle(o) => ts(&o.key_frames),
            Self::VectorImageFixed(o) => ts(&o.key_frames),
            Self::VectorImageViewport(o) => ts(&o.key_frames),
            Self::Score(o) => ts(&o.key_frames),
            Self::Text(o) => ts(&o.key_frames),
            Self::Timer(o) => ts(&o.key_frames),
            Self::Curve(o) => ts(&o.key_frames),
            Self::Telemetry(o) => ts(&o.key_frames),
        }
    }

    fn last_timestamp(&self) -> Option<f64> {
        self.timestamps().last().copied()
    }

    fn first_unsorted_key_frame(&self) -> Option<usize> {
        let ts = self.timestamps();
        (1..ts.len()).find(|&k| !(ts[k] >= ts[k - 1]))
    }
}

macro_rules! impl_into_object {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(impl From<$ty> for SceneObject {
            fn from(o: $ty) -> Self {
                Self::$variant(o)
            }
        })*
    };
}

impl_into_object!(
    RectangleObject => Rectangle,
    VectorFixedObject => VectorImageFixed,
    VectorViewportObject => VectorImageViewport,
    ScoreObject => Score,
    TextObject => Text,
    TimerObject => Timer,
    CurveObject => Curve,
    TelemetryGroup => Telemetry,
);

/// Where a rectangle's colour comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RectangleFill {
    /// One colour for the whole object.
    Constant(Color),
    /// Each keyframe carries a colour, blended channel-wise.
    Keyframed,
}

impl Default for RectangleFill {
    fn default() -> Self {
        Self::Constant(Color::BLACK)
    }
}

/// Rectangle corners in pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RectangleFrame {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
    /// Colour at this keyframe, used with [`RectangleFill::Keyframed`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

/// Filled axis-aligned rectangle.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RectangleObject {
    #[serde(default)]
    pub fill: RectangleFill,
    pub key_frames: Vec<KeyFrame<RectangleFrame>>,
}

/// Integer pixel offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OffsetFrame {
    pub x: i32,
    pub y: i32,
}

/// Vector image drawn at its natural size, translated.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VectorFixedObject {
    /// Document path relative to the engine's assets root.
    pub source: String,
    pub key_frames: Vec<KeyFrame<OffsetFrame>>,
}

/// Two opposite viewport corners.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ViewportFrame {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// Vector image fitted into an animated viewport.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VectorViewportObject {
    /// Document path relative to the engine's assets root.
    pub source: String,
    pub key_frames: Vec<KeyFrame<ViewportFrame>>,
}

/// Integer value keyframe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ValueFrame {
    pub value: i64,
}

/// Score counter with a digit-slide transition.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScoreObject {
    #[serde(default)]
    pub anchor: Anchor,
    /// Text drawn before the value, separated by a space.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default = "white")]
    pub color: Color,
    pub key_frames: Vec<KeyFrame<ValueFrame>>,
}

/// Keyframe carrying only a timestamp.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TimeFrame {}

/// Static outlined text.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextObject {
    #[serde(default)]
    pub anchor: Anchor,
    pub text: String,
    #[serde(default = "white")]
    pub color: Color,
    pub key_frames: Vec<KeyFrame<TimeFrame>>,
}

/// Interpolated seconds counter.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimerObject {
    #[serde(default)]
    pub anchor: Anchor,
    #[serde(default = "white")]
    pub color: Color,
    pub key_frames: Vec<KeyFrame<ValueFrame>>,
}

/// Cubic curve state.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CurveFrame {
    /// Control points P0..P3.
    pub points: [Point; 4],
    pub stroke_width: f64,
    /// Revealed fraction of the curve.
    pub t: f64,
}

/// Cubic curve drawing itself in.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CurveObject {
    #[serde(default = "white")]
    pub color: Color,
    pub key_frames: Vec<KeyFrame<CurveFrame>>,
}

/// Trace time shown at a scene keyframe.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TraceFrame {
    pub trace_timestamp: f64,
}

/// Analog speedometer assets.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SpeedDial {
    /// Static dial face document.
    pub face: String,
    /// Needle document, same size as the face, rotated about its centre.
    pub needle: String,
    /// Speed in m/s at which the needle completes a full turn.
    #[serde(default = "default_full_speed")]
    pub full_speed: f64,
}

/// One readout of a telemetry group.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "element", rename_all = "snake_case")]
pub enum TelemetryElement {
    Speed {
        #[serde(default)]
        anchor: Anchor,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        dial: Option<SpeedDial>,
    },
    Elevation {
        #[serde(default)]
        anchor: Anchor,
    },
    Distance {
        #[serde(default)]
        anchor: Anchor,
        /// Metres added to the trace distance.
        #[serde(default)]
        offset: f64,
    },
    Map {
        #[serde(default)]
        anchor: Anchor,
        /// Name of a scene overlay drawn over the tiles.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        overlay: Option<String>,
        #[serde(default = "default_trace_color")]
        trace_color: Color,
        #[serde(default = "default_zoom")]
        zoom: u32,
    },
}

/// Readouts driven by one telemetry trace.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TelemetryGroup {
    /// Name of a scene trace.
    pub trace: String,
    #[serde(default)]
    pub elements: Vec<TelemetryElement>,
    pub key_frames: Vec<KeyFrame<TraceFrame>>,
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
