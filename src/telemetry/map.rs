use std::{
    collections::{HashMap, VecDeque},
    path::PathBuf,
    sync::Arc,
};

use crate::{
    assets::raster::{RasterImage, decode_image},
    foundation::core::{BezPath, Color, Point, Rect},
    foundation::error::{OverlayError, OverlayResult},
    render::surface::{LineCap, LineJoin, StrokeStyle, Surface},
};

/// Edge length of a map tile in pixels.
pub const TILE_SIZE: i64 = 256;

const DEFAULT_TILE_CACHE_CAPACITY: usize = 8;

/// Geographic position in degrees.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Planned route drawn on top of the map as polylines.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TraceOverlay {
    /// Independent polylines.
    pub segments: Vec<Vec<LatLon>>,
    /// Stroke width in tile-space pixels.
    #[serde(default = "default_overlay_width")]
    pub width: f64,
}

fn default_overlay_width() -> f64 {
    6.0
}

/// Where map tiles come from. Carried by the scene and handed to the map renderer.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Base URL of the tile server.
    pub url_base: String,
    /// Optional tile server API key.
    pub api_key: Option<String>,
    /// Local directory holding `{z}-{x}-{y}.png` tiles.
    pub tile_dir: PathBuf,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            url_base: "https://tile.thunderforest.com/cycle".to_owned(),
            api_key: None,
            tile_dir: PathBuf::from("map-tiles"),
        }
    }
}

impl MapConfig {
    /// Remote URL of a tile.
    pub fn tile_url(&self, zoom: u32, x: i64, y: i64) -> String {
        let base = self.url_base.trim_end_matches('/');
        match &self.api_key {
            Some(key) => format!("{base}/{zoom}/{x}/{y}.png?apikey={key}"),
            None => format!("{base}/{zoom}/{x}/{y}.png"),
        }
    }

    /// Local path of a tile.
    pub fn tile_path(&self, zoom: u32, x: i64, y: i64) -> PathBuf {
        self.tile_dir.join(format!("{zoom}-{x}-{y}.png"))
    }
}

/// Arguments of one map panel draw.
#[derive(Clone, Copy, Debug)]
pub struct MapRequest<'a> {
    /// Slippy-map zoom level.
    pub zoom: u32,
    /// Position shown at the panel centre.
    pub center: LatLon,
    /// Panel centre in current user space.
    pub draw_center: Point,
    /// Panel width in user-space pixels.
    pub width: u32,
    /// Panel height in user-space pixels.
    pub height: u32,
    /// Route to draw over the tiles.
    pub trace: Option<&'a TraceOverlay>,
    /// Route colour.
    pub trace_color: Color,
    /// Trace time of the sample being shown.
    pub timestamp: f64,
}

/// Map panel collaborator.
pub trait MapRenderer {
    /// Draw a map panel; failures abort the frame.
    fn render(&mut self, surface: &mut dyn Surface, request: &MapRequest<'_>) -> OverlayResult<()>;
}

/// Tile coordinate plus pixel offset within that tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TilePos {
    pub tile: i64,
    pub pixel: i64,
}

/// Global web-mercator x in tile units.
pub fn lon_to_tile_x(lon: f64, zoom: u32) -> f64 {
    (lon + 180.0) / 360.0 * f64::from(1u32 << zoom.min(30))
}

/// Global web-mercator y in tile units.
pub fn lat_to_tile_y(lat: f64, zoom: u32) -> f64 {
    let lat_rad = lat.to_radians();
    (1.0 - lat_rad.tan().asinh() / std::f64::consts::PI) / 2.0 * f64::from(1u32 << zoom.min(30))
}

fn split_tile(v: f64) -> TilePos {
    let tile = v.trunc();
    TilePos {
        tile: tile as i64,
        pixel: ((v - tile) * TILE_SIZE as f64).round() as i64,
    }
}

/// Tile and pixel for a longitude.
pub fn lon_to_x(lon: f64, zoom: u32) -> TilePos {
    split_tile(lon_to_tile_x(lon, zoom))
}

/// Tile and pixel for a latitude.
pub fn lat_to_y(lat: f64, zoom: u32) -> TilePos {
    split_tile(lat_to_tile_y(lat, zoom))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct TileKey {
    zoom: u32,
    x: i64,
    y: i64,
}

/// [`MapRenderer`] drawing pre-fetched PNG tiles from a local directory.
///
/// Decoded tiles are kept in a small LRU cache sized by `OVERLAYER_TILE_CACHE_CAPACITY`.
/// Tiles are never fetched from the network; a missing tile is a load error naming the URL
/// it should be fetched from.
pub struct TileMapRenderer {
    config: MapConfig,
    tiles: HashMap<TileKey, Arc<RasterImage>>,
    lru: VecDeque<TileKey>,
    capacity: usize,
}

impl std::fmt::Debug for TileMapRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TileMapRenderer")
            .field("config", &self.config)
            .field("cached", &self.lru.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}

impl TileMapRenderer {
    pub fn new(config: MapConfig) -> Self {
        let capacity = std::env::var("OVERLAYER_TILE_CACHE_CAPACITY")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_TILE_CACHE_CAPACITY);
        Self::with_capacity(config, capacity)
    }

    /// Same as [`Self::new`] with an explicit cache capacity (at least 1).
    pub fn with_capacity(config: MapConfig, capacity: usize) -> Self {
        Self {
            config,
            tiles: HashMap::new(),
            lru: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Number of decoded tiles currently cached.
    pub fn cached_tiles(&self) -> usize {
        self.lru.len()
    }

    fn tile(&mut self, key: TileKey) -> OverlayResult<Arc<RasterImage>> {
        if let Some(tile) = self.tiles.get(&key).cloned() {
            self.touch(key);
            return Ok(tile);
        }

        let path = self.config.tile_path(key.zoom, key.x, key.y);
        let bytes = std::fs::read(&path).map_err(|e| {
            OverlayError::load(format!(
                "map tile '{}' unavailable ({e}); fetch it from {}",
                path.display(),
                self.config.tile_url(key.zoom, key.x, key.y)
            ))
        })?;
        let image = decode_image(&bytes).map_err(|e| {
            OverlayError::load(format!("error loading {}: {e}", path.display()))
        })?;
        tracing::debug!(zoom = key.zoom, x = key.x, y = key.y, "map tile loaded");

        let image = Arc::new(image);
        self.insert(key, image.clone());
        Ok(image)
    }

    fn insert(&mut self, key: TileKey, tile: Arc<RasterImage>) {
        self.tiles.insert(key, tile);
        self.touch(key);
        while self.lru.len() > self.capacity {
            if let Some(old) = self.lru.pop_front() {
                self.tiles.remove(&old);
            }
        }
    }

    fn touch(&mut self, key: TileKey) {
        if let Some(pos) = self.lru.iter().position(|k| *k == key) {
            self.lru.remove(pos);
        }
        self.lru.push_back(key);
    }

    fn draw_tiles(&mut self, surface: &mut dyn Surface, req: &MapRequest<'_>) -> OverlayResult<()> {
        let cx = lon_to_x(req.center.lon, req.zoom);
        let cy = lat_to_y(req.center.lat, req.zoom);
        let (w, h) = (i64::from(req.width), i64::from(req.height));

        let x_start = -((w / 2 - cx.pixel + TILE_SIZE - 1) / TILE_SIZE);
        let y_start = -((h / 2 - cy.pixel + TILE_SIZE - 1) / TILE_SIZE);

        let mut y = y_start;
        while y * TILE_SIZE - cy.pixel < h {
            let mut x = x_start;
            while x * TILE_SIZE - cx.pixel < w {
                let key = TileKey {
                    zoom: req.zoom,
                    x: x + cx.tile,
                    y: y + cy.tile,
                };
                let tile = self.tile(key)?;
                let origin = Point::new(
                    req.draw_center.x - cx.pixel as f64 + (x * TILE_SIZE) as f64,
                    req.draw_center.y - cy.pixel as f64 + (y * TILE_SIZE) as f64,
                );
                surface.draw_image(&tile, origin)?;
                x += 1;
            }
            y += 1;
        }
        Ok(())
    }
}

impl MapRenderer for TileMapRenderer {
    fn render(&mut self, surface: &mut dyn Surface, req: &MapRequest<'_>) -> OverlayResult<()> {
        let half_w = f64::from(req.width) / 2.0;
        let half_h = f64::from(req.height) / 2.0;
        surface.push_clip(Rect::new(
            req.draw_center.x - half_w,
            req.draw_center.y - half_h,
            req.draw_center.x + half_w,
            req.draw_center.y + half_h,
        ));

        let res = self.draw_tiles(surface, req);
        if res.is_ok()
            && let Some(overlay) = req.trace
        {
            stroke_overlay(surface, req, overlay);
        }

        surface.pop_clip();
        res
    }
}

/// Project a position into panel user space relative to `req.center`.
pub fn project(req: &MapRequest<'_>, pos: LatLon) -> Point {
    let scale = TILE_SIZE as f64;
    let dx = (lon_to_tile_x(pos.lon, req.zoom) - lon_to_tile_x(req.center.lon, req.zoom)) * scale;
    let dy = (lat_to_tile_y(pos.lat, req.zoom) - lat_to_tile_y(req.center.lat, req.zoom)) * scale;
    Point::new(req.draw_center.x + dx, req.draw_center.y + dy)
}

fn stroke_overlay(surface: &mut dyn Surface, req: &MapRequest<'_>, overlay: &TraceOverlay) {
    let mut style = StrokeStyle::new(overlay.width);
    style.cap = LineCap::Round;
    style.join = LineJoin::Round;

    let mut path = BezPath::new();
    for segment in overlay.segments.iter().filter(|s| s.len() >= 2) {
        for (i, pos) in segment.iter().enumerate() {
            let p = project(req, *pos);
            if i == 0 {
                path.move_to(p);
            } else {
                path.line_to(p);
            }
        }
    }
    if !path.elements().is_empty() {
        surface.stroke_path(&path, &style, req.trace_color);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/telemetry/map.rs"]
mod tests;
