use crate::core::{PartialEstimate, Point, StationReport, DEFAULT_WAVE_VELOCITY};
use tracing::trace;

/// Base-case estimator: arrival-time weighted triangulation over a small
/// station set.
///
/// Stations are weighted by `1 / (1 + dt^2)` where `dt` is the delay after
/// the first arrival, so the earliest detectors dominate the estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangulator {
    /// Constant straight-line wave velocity (distance units per time unit)
    wave_velocity: f64,
}

impl Default for Triangulator {
    fn default() -> Self {
        Self { wave_velocity: DEFAULT_WAVE_VELOCITY }
    }
}

impl Triangulator {
    pub fn new(wave_velocity: f64) -> Self {
        Self { wave_velocity }
    }

    pub fn wave_velocity(&self) -> f64 {
        self.wave_velocity
    }

    /// Estimate the epicenter of a station set.
    ///
    /// Never fails. No stations yields the no-data sentinel; a single
    /// station yields its own position with confidence 1.0 and zero error.
    pub fn estimate(&self, stations: &[StationReport]) -> PartialEstimate {
        match stations {
            [] => PartialEstimate::no_data(),
            [only] => PartialEstimate::new(only.position(), 1.0, 0.0),
            _ => {
                let first_arrival = first_arrival(stations);
                let location = weighted_center(stations, first_arrival);
                let error = self.residual_error(stations, &location, first_arrival);
                let confidence = confidence_from_error(error, stations.len());

                trace!(
                    stations = stations.len(),
                    lat = location.x,
                    lon = location.y,
                    error,
                    confidence,
                    "base-case estimate"
                );

                PartialEstimate::new(location, confidence, error)
            }
        }
    }

    /// Sum of squared differences between modeled and observed travel times
    pub fn residual_error(&self, stations: &[StationReport], estimate: &Point, first_arrival: f64) -> f64 {
        stations
            .iter()
            .map(|station| {
                let theoretical = estimate.distance(&station.position()) / self.wave_velocity;
                let actual = station.detection_time - first_arrival;
                (theoretical - actual).powi(2)
            })
            .sum()
    }
}

/// Earliest detection time in the set
fn first_arrival(stations: &[StationReport]) -> f64 {
    stations
        .iter()
        .map(|s| s.detection_time)
        .fold(f64::INFINITY, f64::min)
}

/// Arrival-delay weight for one station
pub fn arrival_weight(time_diff: f64) -> f64 {
    1.0 / (1.0 + time_diff * time_diff)
}

fn weighted_center(stations: &[StationReport], first_arrival: f64) -> Point {
    let (mut sum_lat, mut sum_lon, mut total_weight) = (0.0, 0.0, 0.0);
    for station in stations {
        let weight = arrival_weight(station.detection_time - first_arrival);
        sum_lat += station.lat * weight;
        sum_lon += station.lon * weight;
        total_weight += weight;
    }
    Point::new(sum_lat / total_weight, sum_lon / total_weight)
}

/// Map a residual error to a confidence score in (0, 1]
pub fn confidence_from_error(error: f64, station_count: usize) -> f64 {
    1.0 / (1.0 + error / station_count as f64)
}
