//! Reporting surface for locator results

pub mod formatting;

pub use formatting::{
    CsvFormatter, EstimateReport, JsonFormatter, ReportError, TextFormatter,
};
