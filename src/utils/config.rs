use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::core::{DEFAULT_BASE_CASE_THRESHOLD, DEFAULT_MAX_DEPTH, DEFAULT_WAVE_VELOCITY};

/// Tunable parameters of the epicenter locator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorConfig {
    /// Regions with at most this many stations are triangulated directly
    pub base_case_threshold: usize,
    /// Constant wave propagation velocity (distance units per time unit)
    pub wave_velocity: f64,
    /// Maximum quadrant subdivision depth
    pub max_depth: usize,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            base_case_threshold: DEFAULT_BASE_CASE_THRESHOLD,
            wave_velocity: DEFAULT_WAVE_VELOCITY,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value} for {parameter}: {reason}")]
    InvalidParameter {
        parameter: &'static str,
        value: String,
        reason: &'static str,
    },
    #[error("failed to access config file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to (de)serialize config: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("no file path set for saving configuration")]
    NoPath,
}

impl LocatorConfig {
    /// Check every parameter, returning the first violation
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_case_threshold == 0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "base_case_threshold",
                value: self.base_case_threshold.to_string(),
                reason: "must be at least 1",
            });
        }
        if !self.wave_velocity.is_finite() || self.wave_velocity <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "wave_velocity",
                value: self.wave_velocity.to_string(),
                reason: "must be a positive finite number",
            });
        }
        if self.max_depth == 0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "max_depth",
                value: self.max_depth.to_string(),
                reason: "must be at least 1",
            });
        }
        Ok(())
    }

    /// Valid but questionable settings
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.base_case_threshold == 1 {
            warnings.push(
                "base_case_threshold of 1 makes every leaf a single station with confidence 1.0".to_string(),
            );
        }
        if self.max_depth > 64 {
            warnings.push(format!(
                "max_depth {} exceeds the useful subdivision range of f64 regions",
                self.max_depth
            ));
        }
        warnings
    }
}

/// Loads, validates, stores and adjusts locator configuration
#[derive(Debug, Default)]
pub struct ConfigurationManager {
    config: LocatorConfig,
    config_file_path: Option<PathBuf>,
    is_modified: bool,
}

impl ConfigurationManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create configuration manager and load from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut manager = Self::new();
        manager.load_from_file(path)?;
        Ok(manager)
    }

    pub fn config(&self) -> &LocatorConfig {
        &self.config
    }

    /// Replace the configuration after validation
    pub fn update_config(&mut self, config: LocatorConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        self.is_modified = true;
        Ok(())
    }

    /// Load configuration from a JSON file; missing fields take defaults
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config: LocatorConfig = serde_json::from_str(&content)?;
        config.validate()?;

        info!(path = %path.display(), ?config, "loaded locator configuration");
        self.config = config;
        self.config_file_path = Some(path.to_path_buf());
        self.is_modified = false;
        Ok(())
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(&self.config)?;
        fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(path = %path.display(), "saved locator configuration");
        self.config_file_path = Some(path.to_path_buf());
        self.is_modified = false;
        Ok(())
    }

    /// Save to the currently loaded file path
    pub fn save(&mut self) -> Result<(), ConfigError> {
        match self.config_file_path.clone() {
            Some(path) => self.save_to_file(path),
            None => Err(ConfigError::NoPath),
        }
    }

    pub fn is_modified(&self) -> bool {
        self.is_modified
    }

    /// Update the base-case threshold, returning the previous value
    pub fn set_base_case_threshold(&mut self, threshold: usize) -> Result<usize, ConfigError> {
        let candidate = LocatorConfig {
            base_case_threshold: threshold,
            ..self.config
        };
        candidate.validate()?;
        let old = std::mem::replace(&mut self.config, candidate);
        self.is_modified = true;
        Ok(old.base_case_threshold)
    }

    /// Update the wave velocity, returning the previous value
    pub fn set_wave_velocity(&mut self, velocity: f64) -> Result<f64, ConfigError> {
        let candidate = LocatorConfig {
            wave_velocity: velocity,
            ..self.config
        };
        candidate.validate()?;
        let old = std::mem::replace(&mut self.config, candidate);
        self.is_modified = true;
        Ok(old.wave_velocity)
    }

    /// Update the depth limit, returning the previous value
    pub fn set_max_depth(&mut self, max_depth: usize) -> Result<usize, ConfigError> {
        let candidate = LocatorConfig { max_depth, ..self.config };
        candidate.validate()?;
        let old = std::mem::replace(&mut self.config, candidate);
        self.is_modified = true;
        Ok(old.max_depth)
    }
}
