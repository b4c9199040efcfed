//! Moving average indicators.

use rust_decimal::Decimal;
use stockviz_core::traits::Indicator;

/// Simple Moving Average (SMA).
///
/// Calculates the arithmetic mean of the last N values. A window that
/// contains a missing value produces no average.
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    /// Create a new SMA with the specified period.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self {
            period,
            name: format!("MA{}", period),
        }
    }
}

impl Indicator for Sma {
    fn calculate(&self, data: &[Option<Decimal>]) -> Vec<Option<Decimal>> {
        let divisor = Decimal::from(self.period);

        (0..data.len())
            .map(|i| {
                if i < self.warmup() {
                    return None;
                }
                let window = &data[i + 1 - self.period..=i];
                window
                    .iter()
                    .try_fold(Decimal::ZERO, |acc, value| acc.checked_add((*value)?))?
                    .checked_div(divisor)
            })
            .collect()
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn closes(values: &[i64]) -> Vec<Option<Decimal>> {
        values.iter().map(|&v| Some(Decimal::from(v))).collect()
    }

    #[test]
    fn test_sma_basic() {
        let sma = Sma::new(3);
        let result = sma.calculate(&closes(&[1, 2, 3, 4, 5]));

        assert_eq!(result, vec![None, None, Some(dec!(2)), Some(dec!(3)), Some(dec!(4))]);
    }

    #[test]
    fn test_sma_five_day() {
        let sma = Sma::new(5);
        let result = sma.calculate(&closes(&[100, 102, 101, 99, 105]));

        assert!(result[..4].iter().all(Option::is_none));
        assert_eq!(result[4], Some(dec!(101.4)));
    }

    #[test]
    fn test_sma_null_poisons_window() {
        let sma = Sma::new(2);
        let data = vec![Some(dec!(1)), None, Some(dec!(3)), Some(dec!(5))];
        let result = sma.calculate(&data);

        assert_eq!(result, vec![None, None, None, Some(dec!(4))]);
    }

    #[test]
    fn test_sma_shorter_than_period() {
        let sma = Sma::new(25);
        let result = sma.calculate(&closes(&[1, 2, 3]));

        assert_eq!(result.len(), 3);
        assert!(result.iter().all(Option::is_none));
    }

    #[test]
    fn test_sma_overflowing_window_is_none() {
        let sma = Sma::new(2);
        let data = vec![Some(Decimal::MAX), Some(Decimal::MAX), Some(dec!(1)), Some(dec!(3))];
        let result = sma.calculate(&data);

        assert_eq!(result, vec![None, None, None, Some(dec!(2))]);
    }

    #[test]
    fn test_sma_name() {
        assert_eq!(Sma::new(25).name(), "MA25");
    }

    #[test]
    #[should_panic(expected = "Period must be greater than 0")]
    fn test_sma_zero_period() {
        Sma::new(0);
    }
}
