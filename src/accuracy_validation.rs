use nalgebra::Vector2;
use std::collections::VecDeque;

use crate::core::Point;

/// Kilometres per degree of latitude in the flat-earth approximation
pub const KM_PER_DEGREE: f64 = 111.0;

/// Accuracy validation for epicenter estimates against a known truth
pub struct AccuracyValidator {
    /// History of location errors for statistical analysis
    pub location_error_history: VecDeque<LocationError>,
    /// Maximum history size
    max_history_size: usize,
}

/// Location error metrics
#[derive(Debug, Clone, PartialEq)]
pub struct LocationError {
    pub true_location: Point,
    pub estimated_location: Point,
    /// Estimate minus truth, in degrees
    pub error_vector: Vector2<f64>,
    /// Plane distance in degrees
    pub error_degrees: f64,
    /// Ground distance in kilometres
    pub error_km: f64,
}

/// Accuracy statistics over multiple estimates (kilometres)
#[derive(Debug, Clone, PartialEq)]
pub struct AccuracyStatistics {
    pub mean_error_km: f64,
    pub rmse_km: f64,
    pub max_error_km: f64,
    pub min_error_km: f64,
    pub sample_count: usize,
}

impl Default for AccuracyValidator {
    fn default() -> Self {
        Self {
            location_error_history: VecDeque::new(),
            max_history_size: 100,
        }
    }
}

impl AccuracyValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history_size(max_history_size: usize) -> Self {
        Self {
            location_error_history: VecDeque::new(),
            max_history_size: max_history_size.max(1),
        }
    }

    /// Compare an estimate against the true epicenter
    pub fn calculate_location_error(&self, true_location: &Point, estimated_location: &Point) -> LocationError {
        let error_vector = estimated_location.to_vector() - true_location.to_vector();
        LocationError {
            true_location: *true_location,
            estimated_location: *estimated_location,
            error_vector,
            error_degrees: error_vector.norm(),
            error_km: geographic_error_km(true_location, estimated_location),
        }
    }

    /// Add location error to history
    pub fn add_error_to_history(&mut self, error: LocationError) {
        self.location_error_history.push_back(error);
        while self.location_error_history.len() > self.max_history_size {
            self.location_error_history.pop_front();
        }
    }

    pub fn record(&mut self, true_location: &Point, estimated_location: &Point) -> LocationError {
        let error = self.calculate_location_error(true_location, estimated_location);
        self.add_error_to_history(error.clone());
        error
    }

    /// Calculate accuracy statistics from error history
    pub fn calculate_statistics(&self) -> AccuracyStatistics {
        let n = self.location_error_history.len();
        if n == 0 {
            return AccuracyStatistics {
                mean_error_km: 0.0,
                rmse_km: 0.0,
                max_error_km: 0.0,
                min_error_km: 0.0,
                sample_count: 0,
            };
        }

        let errors = || self.location_error_history.iter().map(|e| e.error_km);

        AccuracyStatistics {
            mean_error_km: errors().sum::<f64>() / n as f64,
            rmse_km: (errors().map(|e| e.powi(2)).sum::<f64>() / n as f64).sqrt(),
            max_error_km: errors().fold(0.0, f64::max),
            min_error_km: errors().fold(f64::INFINITY, f64::min),
            sample_count: n,
        }
    }
}

/// Ground distance between two (lat, lon) points in kilometres.
///
/// Longitude differences are scaled by the cosine of the true latitude.
pub fn geographic_error_km(true_location: &Point, estimated_location: &Point) -> f64 {
    let dx = (estimated_location.x - true_location.x) * KM_PER_DEGREE;
    let dy = (estimated_location.y - true_location.y) * KM_PER_DEGREE * true_location.x.to_radians().cos();
    Vector2::new(dx, dy).norm()
}
