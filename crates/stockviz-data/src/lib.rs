//! Price sources for the report.

mod csv_source;
mod provider;
mod yahoo;

pub use csv_source::CsvSource;
pub use provider::{DataProvider, FetchOutcome};
pub use yahoo::{YahooSource, DEFAULT_BASE_URL, DEFAULT_USER_AGENT};
