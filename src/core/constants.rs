//! Physical constants and algorithm defaults

/// Default wave propagation velocity (distance units per time unit)
pub const DEFAULT_WAVE_VELOCITY: f64 = 6.0;

/// Default station count at or below which a region is triangulated directly
pub const DEFAULT_BASE_CASE_THRESHOLD: usize = 8;

/// Default limit on quadrant subdivision depth
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Residual error reported for a region with no stations
pub const NO_DATA_ERROR: f64 = 1e9;
