use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::info;

use crate::accuracy_validation::AccuracyValidator;
use crate::algorithms::Locator;
use crate::core::{GeoRegion, PartialEstimate, Point, StationReport};
use crate::synthetic::{NoiseModel, SyntheticScenario};

/// Averaged measurements for one station count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexitySample {
    pub stations: usize,
    pub avg_time_ms: f64,
    /// Mean residual error reported by the locator
    pub avg_error: f64,
    /// Mean estimated location over all trials
    pub avg_location: Point,
    /// Distance from the averaged location to the true epicenter, degrees
    pub location_error_degrees: f64,
    /// Same distance in kilometres
    pub location_error_km: f64,
}

/// Timing and accuracy study of the locator over growing station counts
#[derive(Debug, Clone)]
pub struct ComplexityAnalysis {
    pub sizes: Vec<usize>,
    pub trials: usize,
    pub true_epicenter: Point,
    pub region: GeoRegion,
    pub noise: NoiseModel,
    /// Base seed for reproducible runs
    pub seed: Option<u64>,
}

impl Default for ComplexityAnalysis {
    fn default() -> Self {
        Self {
            sizes: vec![25, 50, 100, 200, 500, 1000, 1500, 2000],
            trials: 5,
            true_epicenter: Point::new(35.0, -120.0),
            region: GeoRegion::new(32.0, 42.0, -125.0, -114.0),
            noise: NoiseModel::default(),
            seed: None,
        }
    }
}

impl ComplexityAnalysis {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sizes(mut self, sizes: Vec<usize>) -> Self {
        self.sizes = sizes;
        self
    }

    pub fn with_trials(mut self, trials: usize) -> Self {
        self.trials = trials.max(1);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Run every size in order
    pub fn run(&self, locator: &Locator) -> Vec<ComplexitySample> {
        self.sizes.iter().map(|&n| self.measure_size(locator, n)).collect()
    }

    /// Average `trials` fresh scenarios of `station_count` stations
    pub fn measure_size(&self, locator: &Locator, station_count: usize) -> ComplexitySample {
        let trials = self.trials.max(1);
        let mut total_time = Duration::ZERO;
        let mut total_error = 0.0;
        let mut location_sum = Point::default();

        for trial in 0..trials {
            let stations = self.scenario(locator, station_count, trial).generate();
            let (estimate, elapsed) = measure_execution_time(locator, &stations, &self.region);

            total_time += elapsed;
            total_error += estimate.error;
            location_sum.x += estimate.location.x;
            location_sum.y += estimate.location.y;
        }

        let n = trials as f64;
        let avg_location = Point::new(location_sum.x / n, location_sum.y / n);
        let location_error = AccuracyValidator::new().calculate_location_error(&self.true_epicenter, &avg_location);

        let sample = ComplexitySample {
            stations: station_count,
            avg_time_ms: total_time.as_secs_f64() * 1000.0 / n,
            avg_error: total_error / n,
            avg_location,
            location_error_degrees: location_error.error_degrees,
            location_error_km: location_error.error_km,
        };

        info!(
            stations = sample.stations,
            time_ms = sample.avg_time_ms,
            error = sample.avg_error,
            location_error_km = sample.location_error_km,
            "complexity sample"
        );
        sample
    }

    fn scenario(&self, locator: &Locator, station_count: usize, trial: usize) -> SyntheticScenario {
        let scenario = SyntheticScenario::new(self.true_epicenter, self.region, station_count)
            .with_noise(self.noise)
            .with_wave_velocity(locator.config().wave_velocity);
        match self.seed {
            Some(seed) => scenario.with_seed(
                seed.wrapping_add((station_count as u64).wrapping_mul(self.trials as u64 + 1))
                    .wrapping_add(trial as u64),
            ),
            None => scenario,
        }
    }
}

/// Time a single `locate` call
pub fn measure_execution_time(
    locator: &Locator,
    stations: &[StationReport],
    region: &GeoRegion,
) -> (PartialEstimate, Duration) {
    let start = Instant::now();
    let estimate = locator.locate(stations, region);
    (estimate, start.elapsed())
}

/// Ratio of time growth to input growth between consecutive samples.
///
/// Values near `log` growth indicate O(n log n) behaviour.
pub fn growth_factors(samples: &[ComplexitySample]) -> Vec<f64> {
    samples
        .windows(2)
        .map(|pair| {
            let n_ratio = pair[1].stations as f64 / pair[0].stations as f64;
            let t_ratio = pair[1].avg_time_ms / pair[0].avg_time_ms;
            t_ratio / n_ratio
        })
        .collect()
}
