//! Indicator trait definitions.

use rust_decimal::Decimal;

/// Trait for column indicators over a nullable price column.
///
/// Output is aligned with the input: `calculate(data)[i]` is the
/// indicator value at bar `i`, `None` where it is undefined.
pub trait Indicator: Send + Sync {
    /// Calculate indicator values for the given data.
    ///
    /// # Arguments
    /// * `data` - Input column (typically closes), oldest first
    ///
    /// # Returns
    /// A vector with the same length as `data`
    fn calculate(&self, data: &[Option<Decimal>]) -> Vec<Option<Decimal>>;

    /// Get the number of trailing bars each value depends on.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;

    /// Index of the first bar that can carry a value.
    fn warmup(&self) -> usize {
        self.period().saturating_sub(1)
    }
}
