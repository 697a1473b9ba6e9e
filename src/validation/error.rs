use thiserror::Error;

/// Input rejected before locating
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("station {id} has a non-finite {field}")]
    NonFiniteStation { id: i64, field: &'static str },
    #[error("search region has a non-finite bound")]
    NonFiniteRegion,
    #[error("search region is inverted: {axis} min {min} > max {max}")]
    InvertedRegion { axis: &'static str, min: f64, max: f64 },
    #[error("station {id} at ({lat}, {lon}) lies outside the search region")]
    StationOutsideRegion { id: i64, lat: f64, lon: f64 },
    #[error("duplicate station id {id}")]
    DuplicateStation { id: i64 },
    #[error("no station reports supplied")]
    NoStations,
}
