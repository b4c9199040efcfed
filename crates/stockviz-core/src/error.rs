//! Error types for the price report.

use chrono::NaiveDate;
use thiserror::Error;

/// Failure to obtain bars from a price source.
///
/// Every variant is recovered the same way: the adapter substitutes a
/// placeholder series and the run continues.
#[derive(Error, Debug)]
pub enum DataFetchError {
    #[error("Invalid symbol: {0:?}")]
    InvalidSymbol(String),

    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("No data available for {symbol}")]
    NoDataAvailable { symbol: String },

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("HTTP status {status} from {source_name}")]
    HttpStatus { status: u16, source_name: String },

    #[error("API error: {code}: {description}")]
    Api { code: String, description: String },

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Malformed input handed to the indicator engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Dates must be strictly increasing: bar {index} ({current}) follows {previous}")]
    NonIncreasingDate {
        index: usize,
        previous: NaiveDate,
        current: NaiveDate,
    },
}

/// Unrecoverable failure while enriching, serializing or rendering.
#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("Invalid input: {0}")]
    Input(#[from] InputError),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for processing operations.
pub type ProcessingResult<T> = Result<T, ProcessingError>;
