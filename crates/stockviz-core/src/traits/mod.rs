//! Core traits for the price report.

mod indicator;
mod price_source;

pub use indicator::Indicator;
pub use price_source::PriceSource;
