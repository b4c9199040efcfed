//! Logging setup and the terminal chart window.

mod chart;
mod logging;

pub use chart::{ChartColors, ChartWindow, DateAxis, PricePanel, VolumePanel};
pub use logging::{setup_logging, LogFormat};
