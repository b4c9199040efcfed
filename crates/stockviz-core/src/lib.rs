//! Core types and traits for the price report.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (PriceBar, PriceSeries)
//! - Enriched report rows (EnrichedBar, EnrichedSeries)
//! - Core traits for price sources and indicators

pub mod types;
pub mod traits;
pub mod error;

pub use error::{DataFetchError, InputError, ProcessingError, ProcessingResult};
pub use types::*;
pub use traits::*;
