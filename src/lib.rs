//! Overlayer draws timed graphical overlays for video frames.
//!
//! A [`Scene`] lists objects (rectangles, vector images, scores, text, timers, animated curves
//! and telemetry readouts), each driven by its own keyframes. An [`Engine`] renders the scene
//! at arbitrary timestamps onto any [`Surface`]:
//!
//! - Load and validate a [`Scene`]
//! - Create an [`Engine`]
//! - Render frames onto a [`CpuSurface`] (pixels) or a [`RecordingSurface`] (display list)
#![forbid(unsafe_code)]

pub mod animation;
pub mod assets;
pub mod engine;
pub mod foundation;
pub mod layout;
pub mod render;
pub mod renderers;
pub mod scene;
pub mod telemetry;

pub use crate::animation::keyframe::{KeyFrame, KeyFrameCursor, Span};
pub use crate::engine::{Engine, RenderOutcome, Resources};
pub use crate::foundation::core::{Affine, BezPath, Canvas, Color, Point, Rect, Vec2};
pub use crate::foundation::error::{OverlayError, OverlayResult};
pub use crate::layout::stacker::{Anchor, HAlign, LayoutContext, VAlign};
pub use crate::render::cpu::{CpuSurface, FontSet, FrameRGBA, RenderSettings};
pub use crate::render::recording::{DrawOp, RecordingSurface};
pub use crate::render::surface::Surface;
pub use crate::scene::model::{Scene, SceneObject};
pub use crate::telemetry::map::{MapConfig, MapRenderer, TileMapRenderer};
pub use crate::telemetry::trace::{Fix, Trace, TraceSource};
