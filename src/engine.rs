use std::{path::PathBuf, sync::Arc};

use crate::{
    animation::keyframe::KeyFrameCursor,
    assets::vector::{VectorDocument, VectorLibrary},
    foundation::core::{Color, Point},
    foundation::error::OverlayResult,
    layout::stacker::LayoutContext,
    render::surface::{GradientStop, Paint, RadialGradient, Surface},
    renderers::FrameContext,
    scene::model::Scene,
    telemetry::map::{MapConfig, MapRenderer, TileMapRenderer},
};

/// Diameter of the map position marker in tile-space pixels.
pub const MAP_POINT_SIZE: f64 = 24.0;

/// Result of a successful render call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Every object was invisible at the requested time.
    Empty,
    /// At least one object drew something.
    Drawn,
}

/// Long-lived collaborators, created on first use and owned by the engine.
pub struct Resources {
    vectors: VectorLibrary,
    map_config: MapConfig,
    map: Option<Box<dyn MapRenderer>>,
    marker: Option<Paint>,
}

impl std::fmt::Debug for Resources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resources")
            .field("vectors", &self.vectors)
            .field("map_config", &self.map_config)
            .field("map", &self.map.is_some())
            .finish_non_exhaustive()
    }
}

impl Resources {
    /// Resources loading vector documents below `assets_root`.
    pub fn new(assets_root: impl Into<PathBuf>, map_config: MapConfig) -> Self {
        Self {
            vectors: VectorLibrary::new(assets_root),
            map_config,
            map: None,
            marker: None,
        }
    }

    /// Vector document for `source`, parsed on first use.
    pub fn vector(&mut self, source: &str) -> OverlayResult<Arc<VectorDocument>> {
        self.vectors.get_or_load(source)
    }

    /// Loaded vector documents.
    pub fn vectors(&self) -> &VectorLibrary {
        &self.vectors
    }

    /// Replace the map collaborator.
    pub fn set_map_renderer(&mut self, renderer: Box<dyn MapRenderer>) {
        self.map = Some(renderer);
    }

    /// Map collaborator, defaulting to a [`TileMapRenderer`] over the scene's map config.
    pub fn map_renderer(&mut self) -> &mut dyn MapRenderer {
        let config = &self.map_config;
        self.map
            .get_or_insert_with(|| Box::new(TileMapRenderer::new(config.clone())))
            .as_mut()
    }

    /// Radial marker paint centred on the origin: opaque core fading to transparent.
    pub fn marker_paint(&mut self) -> &Paint {
        self.marker.get_or_insert_with(|| {
            let blue = Color::rgb(11, 0, 255);
            Paint::Radial(RadialGradient {
                center: Point::ZERO,
                radius: MAP_POINT_SIZE / 2.0,
                stops: vec![
                    GradientStop {
                        offset: 0.0,
                        color: blue,
                    },
                    GradientStop {
                        offset: 0.6,
                        color: blue,
                    },
                    GradientStop {
                        offset: 1.0,
                        color: blue.with_alpha(0),
                    },
                ],
            })
        })
    }
}

/// Renders a [`Scene`] at arbitrary timestamps.
///
/// The scene is read-only; the only state carried between calls is one keyframe cursor per
/// object and the lazily created collaborators.
pub struct Engine {
    scene: Scene,
    resources: Resources,
    cursors: Vec<KeyFrameCursor>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("objects", &self.scene.objects.len())
            .field("resources", &self.resources)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Engine resolving vector documents relative to the working directory.
    pub fn new(scene: Scene) -> Self {
        Self::with_assets_root(scene, ".")
    }

    /// Engine resolving vector documents relative to `assets_root`.
    pub fn with_assets_root(scene: Scene, assets_root: impl Into<PathBuf>) -> Self {
        let resources = Resources::new(assets_root, scene.map.clone());
        let cursors = vec![KeyFrameCursor::default(); scene.objects.len()];
        Self {
            scene,
            resources,
            cursors,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    /// Replace the map collaborator (the default reads tiles from `scene.map.tile_dir`).
    pub fn set_map_renderer(&mut self, renderer: Box<dyn MapRenderer>) {
        self.resources.set_map_renderer(renderer);
    }

    /// Parse a vector document ahead of the first frame that needs it.
    pub fn preload_vector(&mut self, source: &str) -> OverlayResult<()> {
        self.resources.vector(source).map(|_| ())
    }

    /// Clear `surface` and draw every object visible at `timestamp`, in scene order.
    ///
    /// The first collaborator failure aborts the call; the surface then holds a partial frame
    /// that must not be used.
    #[tracing::instrument(skip(self, surface), fields(objects = self.scene.objects.len()))]
    pub fn render(
        &mut self,
        surface: &mut dyn Surface,
        timestamp: f64,
    ) -> OverlayResult<RenderOutcome> {
        surface.clear();
        let mut layout = LayoutContext::new(self.scene.canvas);
        let mut outcome = RenderOutcome::Empty;

        for (index, (object, cursor)) in self
            .scene
            .objects
            .iter()
            .zip(self.cursors.iter_mut())
            .enumerate()
        {
            let mut ctx = FrameContext {
                surface: &mut *surface,
                layout: &mut layout,
                resources: &mut self.resources,
                scene: &self.scene,
                timestamp,
            };
            match object.draw(&mut ctx, cursor) {
                Ok(true) => outcome = RenderOutcome::Drawn,
                Ok(false) => {
                    tracing::trace!(index, kind = object.kind(), "object not drawn");
                }
                Err(e) => {
                    tracing::warn!(index, kind = object.kind(), error = %e, "object render failed");
                    return Err(e);
                }
            }
        }

        Ok(outcome)
    }
}

#[cfg(test)]
#[path = "../tests/unit/engine.rs"]
mod tests;
