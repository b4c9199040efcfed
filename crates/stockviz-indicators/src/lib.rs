//! Daily return and moving average indicators.
//!
//! This crate provides the column computations behind the report:
//! - Percent change of close versus the previous bar
//! - Simple moving averages
//! - The engine that turns a price series into an enriched series

pub mod engine;
pub mod moving_average;
pub mod returns;

pub use engine::IndicatorEngine;
pub use moving_average::Sma;
pub use returns::PercentChange;
