//! Seismic Epicenter Locator
//!
//! Estimates the origin of a seismic event from station arrival times by
//! recursively splitting the search region into quadrants, triangulating
//! small station sets directly and merging the partial estimates by
//! confidence.

pub mod core;
pub mod algorithms;
pub mod validation;
pub mod utils;
pub mod api;
pub mod synthetic;
pub mod accuracy_validation;
pub mod performance_monitor;

// Re-export commonly used types
pub use crate::core::{GeoRegion, PartialEstimate, Point, Quadrant, StationReport, NO_DATA_ERROR};
pub use crate::algorithms::{combine_estimates, partition_stations, Locator, PartitionNode, Triangulator};
pub use validation::{StationValidator, ValidationConfig, ValidationError};
pub use utils::{ConfigError, ConfigurationManager, LocatorConfig};
pub use api::{CsvFormatter, EstimateReport, JsonFormatter, ReportError, TextFormatter};
pub use synthetic::{NoiseModel, SyntheticScenario};
pub use accuracy_validation::{geographic_error_km, AccuracyStatistics, AccuracyValidator};
pub use performance_monitor::{growth_factors, ComplexityAnalysis, ComplexitySample};
