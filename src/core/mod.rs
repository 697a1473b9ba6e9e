//! Core types and constants for the epicenter locator

pub mod types;
pub mod constants;

pub use types::*;
pub use constants::*;
