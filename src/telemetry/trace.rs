use crate::foundation::math::lerp;

/// Samples further than this many seconds from the query time are not used.
pub const MAX_TIME_GAP: f64 = 5.0;

/// Radius of the earth at the equator in metres (WGS84).
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// One recorded point of a GPS trace.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TracePoint {
    /// Trace time in seconds.
    pub time: f64,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
    /// Speed in m/s.
    #[serde(default)]
    pub speed: f64,
    /// Elevation in metres.
    #[serde(default)]
    pub elevation: f64,
    /// Cumulative distance from the first point in metres.
    #[serde(default)]
    pub distance: f64,
}

/// Telemetry reading at a given time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TelemetrySample {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
    /// Speed in m/s.
    pub speed: f64,
    /// Elevation in metres.
    pub elevation: f64,
    /// Cumulative distance in metres.
    pub distance: f64,
}

impl From<&TracePoint> for TelemetrySample {
    fn from(p: &TracePoint) -> Self {
        Self {
            lat: p.lat,
            lon: p.lon,
            speed: p.speed,
            elevation: p.elevation,
            distance: p.distance,
        }
    }
}

/// Source of telemetry samples.
pub trait TraceSource {
    /// Sample at `timestamp`, or `None` when there is no data near that time.
    fn find_sample(&self, timestamp: f64) -> Option<TelemetrySample>;
}

/// A raw position fix, before distance and speed are derived.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Fix {
    /// Time in seconds.
    pub time: f64,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
    /// Elevation in metres.
    #[serde(default)]
    pub elevation: f64,
    /// Speed reported by the device, if any.
    #[serde(default)]
    pub speed: Option<f64>,
}

/// Time-ordered GPS trace.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(from = "Vec<TracePoint>", into = "Vec<TracePoint>")]
pub struct Trace {
    points: Vec<TracePoint>,
}

impl From<Vec<TracePoint>> for Trace {
    fn from(points: Vec<TracePoint>) -> Self {
        Self::new(points)
    }
}

impl From<Trace> for Vec<TracePoint> {
    fn from(trace: Trace) -> Self {
        trace.points
    }
}

impl Trace {
    /// Sort `points` by time, keeping the first point for each timestamp.
    pub fn new(mut points: Vec<TracePoint>) -> Self {
        points.sort_by(|a, b| a.time.total_cmp(&b.time));
        points.dedup_by(|b, a| a.time == b.time);
        Self { points }
    }

    /// Build a trace from raw fixes, accumulating great-circle distance and deriving speed
    /// where the device did not report one. Fixes are taken in time order.
    pub fn from_fixes(fixes: &[Fix]) -> Self {
        let mut ordered = fixes.to_vec();
        ordered.sort_by(|a, b| a.time.total_cmp(&b.time));

        let mut points: Vec<TracePoint> = Vec::with_capacity(ordered.len());
        let mut total = 0.0;

        for fix in &ordered {
            let (step, dt, prev_speed) = match points.last() {
                Some(prev) => (
                    distance_between(prev.lat, prev.lon, fix.lat, fix.lon),
                    fix.time - prev.time,
                    prev.speed,
                ),
                None => (0.0, 0.0, 0.0),
            };
            let speed = match fix.speed {
                Some(s) => s,
                // Repeated timestamps inherit the previous speed so dedup keeps a real one.
                None if dt <= 0.0 => prev_speed,
                None => step / dt,
            };
            total += step;
            points.push(TracePoint {
                time: fix.time,
                lat: fix.lat,
                lon: fix.lon,
                speed,
                elevation: fix.elevation,
                distance: total,
            });
        }

        Self::new(points)
    }

    /// Points in ascending time order.
    pub fn points(&self) -> &[TracePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl TraceSource for Trace {
    fn find_sample(&self, timestamp: f64) -> Option<TelemetrySample> {
        let points = &self.points;
        let n = points.len();
        if n == 0 || !timestamp.is_finite() {
            return None;
        }

        // Index of the last point at or before `timestamp`, or -1.
        let after = points.partition_point(|p| p.time < timestamp);
        let before = if after < n && points[after].time == timestamp {
            after as isize
        } else {
            after as isize - 1
        };

        if before < 0 {
            let first = &points[0];
            return (first.time - timestamp <= MAX_TIME_GAP).then(|| first.into());
        }
        let before = before as usize;

        if before >= n - 1 {
            let last = &points[n - 1];
            return (timestamp - last.time <= MAX_TIME_GAP).then(|| last.into());
        }

        let a = &points[before];
        let b = &points[before + 1];
        if timestamp - a.time > MAX_TIME_GAP {
            return (b.time - timestamp <= MAX_TIME_GAP).then(|| b.into());
        }
        if b.time - timestamp > MAX_TIME_GAP {
            return Some(a.into());
        }

        let t = (timestamp - a.time) / (b.time - a.time);
        Some(TelemetrySample {
            lat: lerp(t, a.lat, b.lat),
            lon: lerp(t, a.lon, b.lon),
            speed: lerp(t, a.speed, b.speed),
            elevation: lerp(t, a.elevation, b.elevation),
            distance: lerp(t, a.distance, b.distance),
        })
    }
}

/// Great-circle (haversine) distance in metres.
pub fn distance_between(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (lat1, lon1) = (lat1.to_radians(), lon1.to_radians());
    let (lat2, lon2) = (lat2.to_radians(), lon2.to_radians());
    let s_lat = ((lat1 - lat2) / 2.0).sin();
    let s_lon = ((lon1 - lon2) / 2.0).sin();
    let d = 2.0 * (s_lat * s_lat + lat1.cos() * lat2.cos() * s_lon * s_lon).sqrt().asin();
    d * EARTH_RADIUS
}

#[cfg(test)]
#[path = "../../tests/unit/telemetry/trace.rs"]
mod tests;
