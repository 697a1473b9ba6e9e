//! Estimate and analysis output formatting
//!
//! Human-readable text, JSON and CSV renderings of locator results. The
//! analysis CSV keeps the `Stations,Time_ms,Error,Location_X,Location_Y`
//! layout consumed by the plotting scripts.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::accuracy_validation::geographic_error_km;
use crate::core::{PartialEstimate, Point, StationReport};
use crate::performance_monitor::ComplexitySample;

/// Report writing errors
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write report: {0}")]
    Io(#[from] io::Error),
    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

/// A located epicenter with the context needed for reporting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateReport {
    pub latitude: f64,
    pub longitude: f64,
    pub confidence: f64,
    pub error: f64,
    pub station_count: usize,
    /// True when the locator had no stations to work with
    pub no_data: bool,
    pub computation_time_ms: Option<f64>,
    /// Ground distance to a known epicenter, when one is available
    pub location_error_km: Option<f64>,
}

impl EstimateReport {
    pub fn new(estimate: &PartialEstimate, station_count: usize) -> Self {
        Self {
            latitude: estimate.location.x,
            longitude: estimate.location.y,
            confidence: estimate.confidence,
            error: estimate.error,
            station_count,
            no_data: estimate.is_no_data(),
            computation_time_ms: None,
            location_error_km: None,
        }
    }

    pub fn with_timing(mut self, elapsed: Duration) -> Self {
        self.computation_time_ms = Some(elapsed.as_secs_f64() * 1000.0);
        self
    }

    pub fn with_truth(mut self, true_epicenter: &Point) -> Self {
        let estimate = Point::new(self.latitude, self.longitude);
        self.location_error_km = Some(geographic_error_km(true_epicenter, &estimate));
        self
    }
}

/// Human-readable text formatter
#[derive(Debug, Clone)]
pub struct TextFormatter {
    /// Decimal places for coordinates
    pub precision: usize,
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self { precision: 3 }
    }
}

impl TextFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_precision(precision: usize) -> Self {
        Self { precision }
    }

    pub fn format_estimate(&self, report: &EstimateReport) -> String {
        let p = self.precision;
        let mut out = String::new();
        if report.no_data {
            let _ = writeln!(out, "No epicenter estimate: no stations reported");
            return out;
        }
        let _ = writeln!(
            out,
            "Calculated epicenter: ({:.p$}, {:.p$})",
            report.latitude, report.longitude
        );
        let _ = writeln!(out, "Confidence: {:.3}", report.confidence);
        let _ = writeln!(out, "Error: {:.6}", report.error);
        let _ = writeln!(out, "Stations: {}", report.station_count);
        if let Some(km) = report.location_error_km {
            let _ = writeln!(out, "Location accuracy: {:.3} km", km);
        }
        if let Some(ms) = report.computation_time_ms {
            let _ = writeln!(out, "Execution time: {:.3} ms", ms);
        }
        out
    }

    pub fn format_stations(&self, stations: &[StationReport]) -> String {
        let mut out = String::from("Seismic stations:\n");
        for station in stations {
            let _ = writeln!(
                out,
                "Station {}: ({:.2}, {:.2}) Time: {:.2}s",
                station.id, station.lat, station.lon, station.detection_time
            );
        }
        out
    }

    /// Fixed-width table of complexity samples
    pub fn format_analysis(&self, samples: &[ComplexitySample]) -> String {
        let mut out = String::from("Format: Stations, Time(ms), Error, Estimated_Location\n\n");
        for sample in samples {
            let _ = writeln!(
                out,
                "{:>8}{:>12.3}{:>12.6}{:>12.3} km ({:.3}, {:.3})",
                sample.stations,
                sample.avg_time_ms,
                sample.avg_error,
                sample.location_error_km,
                sample.avg_location.x,
                sample.avg_location.y
            );
        }
        out
    }
}

/// JSON formatter
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    pub pretty: bool,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    pub fn format<T: Serialize>(&self, value: &T) -> Result<String, ReportError> {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(json)
    }
}

/// CSV formatter
#[derive(Debug, Clone, Default)]
pub struct CsvFormatter;

impl CsvFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn estimate_header(&self) -> &'static str {
        "Latitude,Longitude,Confidence,Error"
    }

    pub fn format_estimate(&self, report: &EstimateReport) -> String {
        format!(
            "{},{},{},{}",
            report.latitude, report.longitude, report.confidence, report.error
        )
    }

    pub fn analysis_header(&self) -> &'static str {
        "Stations,Time_ms,Error,Location_X,Location_Y"
    }

    pub fn format_sample(&self, sample: &ComplexitySample) -> String {
        format!(
            "{},{},{},{},{}",
            sample.stations, sample.avg_time_ms, sample.avg_error, sample.avg_location.x, sample.avg_location.y
        )
    }

    pub fn write_analysis<W: Write>(&self, mut writer: W, samples: &[ComplexitySample]) -> Result<(), ReportError> {
        writeln!(writer, "{}", self.analysis_header())?;
        for sample in samples {
            writeln!(writer, "{}", self.format_sample(sample))?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn write_analysis_file<P: AsRef<Path>>(&self, path: P, samples: &[ComplexitySample]) -> Result<(), ReportError> {
        let file = File::create(path)?;
        self.write_analysis(BufWriter::new(file), samples)
    }
}
