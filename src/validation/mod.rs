//! Input validation for station reports and search regions

pub mod data;
pub mod error;

pub use data::{StationValidator, ValidationConfig};
pub use error::ValidationError;
