//! Core data types for the epicenter locator

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use super::constants::NO_DATA_ERROR;

/// Plane coordinates, `x` = latitude and `y` = longitude
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn to_vector(self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }

    /// Euclidean distance in the flat-earth plane
    pub fn distance(&self, other: &Point) -> f64 {
        (self.to_vector() - other.to_vector()).norm()
    }
}

impl From<Vector2<f64>> for Point {
    fn from(v: Vector2<f64>) -> Self {
        Self { x: v.x, y: v.y }
    }
}

/// Seismic station detection report
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StationReport {
    pub id: i64,
    pub lat: f64,
    pub lon: f64,
    /// Arrival timestamp; only differences between stations matter
    pub detection_time: f64,
}

impl StationReport {
    pub fn new(id: i64, lat: f64, lon: f64, detection_time: f64) -> Self {
        Self { id, lat, lon, detection_time }
    }

    pub fn position(&self) -> Point {
        Point::new(self.lat, self.lon)
    }
}

/// One of the four sub-regions produced by a midpoint split.
///
/// Declaration order is the fixed evaluation and tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quadrant {
    SouthWest,
    SouthEast,
    NorthWest,
    NorthEast,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::SouthWest,
        Quadrant::SouthEast,
        Quadrant::NorthWest,
        Quadrant::NorthEast,
    ];

    pub fn index(self) -> usize {
        match self {
            Quadrant::SouthWest => 0,
            Quadrant::SouthEast => 1,
            Quadrant::NorthWest => 2,
            Quadrant::NorthEast => 3,
        }
    }

    fn from_sides(north: bool, east: bool) -> Self {
        match (north, east) {
            (false, false) => Quadrant::SouthWest,
            (false, true) => Quadrant::SouthEast,
            (true, false) => Quadrant::NorthWest,
            (true, true) => Quadrant::NorthEast,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Quadrant::SouthWest => "SW",
            Quadrant::SouthEast => "SE",
            Quadrant::NorthWest => "NW",
            Quadrant::NorthEast => "NE",
        }
    }
}

/// Axis-aligned geographic bounding region.
///
/// Callers must supply `min_lat <= max_lat` and `min_lon <= max_lon`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoRegion {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl GeoRegion {
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Self {
        Self { min_lat, max_lat, min_lon, max_lon }
    }

    pub fn mid_lat(&self) -> f64 {
        (self.min_lat + self.max_lat) / 2.0
    }

    pub fn mid_lon(&self) -> f64 {
        (self.min_lon + self.max_lon) / 2.0
    }

    pub fn center(&self) -> Point {
        Point::new(self.mid_lat(), self.mid_lon())
    }

    pub fn lat_span(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    pub fn lon_span(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// Inclusive containment on all four sides
    pub fn contains_point(&self, point: &Point) -> bool {
        point.x >= self.min_lat
            && point.x <= self.max_lat
            && point.y >= self.min_lon
            && point.y <= self.max_lon
    }

    pub fn contains(&self, station: &StationReport) -> bool {
        self.contains_point(&station.position())
    }

    /// Child region for one quadrant of the midpoint split
    pub fn quadrant(&self, quadrant: Quadrant) -> GeoRegion {
        let (mid_lat, mid_lon) = (self.mid_lat(), self.mid_lon());
        match quadrant {
            Quadrant::SouthWest => GeoRegion::new(self.min_lat, mid_lat, self.min_lon, mid_lon),
            Quadrant::SouthEast => GeoRegion::new(self.min_lat, mid_lat, mid_lon, self.max_lon),
            Quadrant::NorthWest => GeoRegion::new(mid_lat, self.max_lat, self.min_lon, mid_lon),
            Quadrant::NorthEast => GeoRegion::new(mid_lat, self.max_lat, mid_lon, self.max_lon),
        }
    }

    /// Split at the midpoint lines into SW, SE, NW, NE
    pub fn split(&self) -> [GeoRegion; 4] {
        Quadrant::ALL.map(|q| self.quadrant(q))
    }

    /// Quadrant that owns a station.
    ///
    /// Split lines belong to the northern / eastern side; the region's outer
    /// edges are inclusive. Returns `None` for stations outside the region.
    pub fn quadrant_of(&self, station: &StationReport) -> Option<Quadrant> {
        if !self.contains(station) {
            return None;
        }
        let north = station.lat >= self.mid_lat();
        let east = station.lon >= self.mid_lon();
        Some(Quadrant::from_sides(north, east))
    }

    /// Whether a midpoint split still shrinks the region on some axis
    pub fn is_splittable(&self) -> bool {
        let (mid_lat, mid_lon) = (self.mid_lat(), self.mid_lon());
        (mid_lat > self.min_lat && mid_lat < self.max_lat)
            || (mid_lon > self.min_lon && mid_lon < self.max_lon)
    }
}

/// Location estimate for a station subset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PartialEstimate {
    pub location: Point,
    /// Inverse normalized residual, nominally in [0, 1]; not clamped
    pub confidence: f64,
    /// Sum of squared travel-time residuals
    pub error: f64,
}

impl PartialEstimate {
    pub fn new(location: Point, confidence: f64, error: f64) -> Self {
        Self { location, confidence, error }
    }

    /// Sentinel for a region without stations
    pub fn no_data() -> Self {
        Self::new(Point::default(), 0.0, NO_DATA_ERROR)
    }

    pub fn is_no_data(&self) -> bool {
        self.confidence == 0.0 && self.error >= NO_DATA_ERROR
    }
}
