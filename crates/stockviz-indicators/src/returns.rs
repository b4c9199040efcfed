//! Daily return.

use rust_decimal::Decimal;
use stockviz_core::traits::Indicator;

/// Decimal places kept on a percent change.
pub const RETURN_DECIMALS: u32 = 2;

/// Percent change versus the previous value.
///
/// `100 * (x[i] - x[i-1]) / x[i-1]`, rounded half-to-even to
/// [`RETURN_DECIMALS`] places. Undefined on the first bar, next to a
/// missing value, or after a zero.
#[derive(Debug, Clone, Default)]
pub struct PercentChange;

impl PercentChange {
    /// Create a new percent change indicator.
    pub fn new() -> Self {
        Self
    }

    fn change(previous: Decimal, current: Decimal) -> Option<Decimal> {
        current
            .checked_sub(previous)?
            .checked_mul(Decimal::ONE_HUNDRED)?
            .checked_div(previous)
            .map(|pct| pct.round_dp(RETURN_DECIMALS))
    }
}

impl Indicator for PercentChange {
    fn calculate(&self, data: &[Option<Decimal>]) -> Vec<Option<Decimal>> {
        let mut result = Vec::with_capacity(data.len());
        if data.is_empty() {
            return result;
        }

        result.push(None);
        for pair in data.windows(2) {
            let value = match (pair[0], pair[1]) {
                (Some(prev), Some(cur)) => Self::change(prev, cur),
                _ => None,
            };
            result.push(value);
        }

        result
    }

    fn period(&self) -> usize {
        2
    }

    fn name(&self) -> &str {
        "Return"
    }
}
