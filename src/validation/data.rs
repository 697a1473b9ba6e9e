use std::collections::HashSet;

use crate::core::{GeoRegion, StationReport};
use crate::validation::error::ValidationError;

/// Which input checks to apply
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// Reject an empty station list
    pub require_stations: bool,
    /// Reject stations outside the search region
    pub require_inside_region: bool,
    /// Reject repeated station ids
    pub reject_duplicate_ids: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            require_stations: false,
            require_inside_region: true,
            reject_duplicate_ids: true,
        }
    }
}

/// Checks station reports and the search region before locating.
///
/// Non-finite values are always rejected; the remaining checks follow the
/// configuration.
#[derive(Debug, Clone, Default)]
pub struct StationValidator {
    config: ValidationConfig,
}

impl StationValidator {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Stop at the first problem
    pub fn validate(&self, stations: &[StationReport], region: &GeoRegion) -> Result<(), ValidationError> {
        match self.check_all(stations, region).into_iter().next() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Collect every problem found
    pub fn check_all(&self, stations: &[StationReport], region: &GeoRegion) -> Vec<ValidationError> {
        let mut errors = check_region(region);
        let region_ok = errors.is_empty();

        if self.config.require_stations && stations.is_empty() {
            errors.push(ValidationError::NoStations);
        }

        let mut seen = HashSet::with_capacity(stations.len());
        for station in stations {
            if let Some(field) = non_finite_field(station) {
                errors.push(ValidationError::NonFiniteStation { id: station.id, field });
                continue;
            }
            if self.config.reject_duplicate_ids && !seen.insert(station.id) {
                errors.push(ValidationError::DuplicateStation { id: station.id });
            }
            if self.config.require_inside_region && region_ok && !region.contains(station) {
                errors.push(ValidationError::StationOutsideRegion {
                    id: station.id,
                    lat: station.lat,
                    lon: station.lon,
                });
            }
        }

        errors
    }
}

fn non_finite_field(station: &StationReport) -> Option<&'static str> {
    if !station.lat.is_finite() {
        Some("latitude")
    } else if !station.lon.is_finite() {
        Some("longitude")
    } else if !station.detection_time.is_finite() {
        Some("detection time")
    } else {
        None
    }
}

fn check_region(region: &GeoRegion) -> Vec<ValidationError> {
    let bounds = [region.min_lat, region.max_lat, region.min_lon, region.max_lon];
    if bounds.iter().any(|b| !b.is_finite()) {
        return vec![ValidationError::NonFiniteRegion];
    }

    let mut errors = Vec::new();
    if region.min_lat > region.max_lat {
        errors.push(ValidationError::InvertedRegion {
            axis: "latitude",
            min: region.min_lat,
            max: region.max_lat,
        });
    }
    if region.min_lon > region.max_lon {
        errors.push(ValidationError::InvertedRegion {
            axis: "longitude",
            min: region.min_lon,
            max: region.max_lon,
        });
    }
    errors
}
