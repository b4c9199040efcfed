//! Indicator engine: price series in, enriched series out.

use stockviz_core::error::InputError;
use stockviz_core::traits::Indicator;
use stockviz_core::types::{
    EnrichedBar, EnrichedSeries, PriceSeries, LONG_MA_PERIOD, SHORT_MA_PERIOD,
};
use tracing::debug;

use crate::{PercentChange, Sma};

/// Computes the daily return and both moving averages for a series.
///
/// Stateless: `enrich` is a pure function of its input.
#[derive(Debug, Clone)]
pub struct IndicatorEngine {
    returns: PercentChange,
    short_ma: Sma,
    long_ma: Sma,
}

impl Default for IndicatorEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl IndicatorEngine {
    /// Create an engine with the report's MA5/MA25 windows.
    pub fn new() -> Self {
        Self {
            returns: PercentChange::new(),
            short_ma: Sma::new(SHORT_MA_PERIOD),
            long_ma: Sma::new(LONG_MA_PERIOD),
        }
    }

    /// Enrich every bar of `series`.
    ///
    /// Missing closes propagate as missing statistics. Fails only when
    /// the dates are not strictly increasing.
    pub fn enrich(&self, series: &PriceSeries) -> Result<EnrichedSeries, InputError> {
        series.validate_dates()?;

        let closes = series.closes();
        let returns = self.returns.calculate(&closes);
        let short = self.short_ma.calculate(&closes);
        let long = self.long_ma.calculate(&closes);

        let bars: Vec<EnrichedBar> = series
            .bars
            .iter()
            .zip(returns)
            .zip(short.into_iter().zip(long))
            .map(|((bar, return_pct), (ma5, ma25))| EnrichedBar {
                bar: bar.clone(),
                return_pct,
                ma5,
                ma25,
            })
            .collect();

        debug!(
            symbol = %series.symbol,
            bars = bars.len(),
            "{}/{}/{} computed",
            self.returns.name(),
            self.short_ma.name(),
            self.long_ma.name()
        );

        Ok(EnrichedSeries {
            symbol: series.symbol.clone(),
            currency: series.currency.clone(),
            origin: series.origin,
            bars,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use stockviz_core::types::PriceBar;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn series_from_closes(closes: &[Option<Decimal>]) -> PriceSeries {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, close)| PriceBar {
                date: start() + Duration::days(i as i64),
                open: *close,
                high: *close,
                low: *close,
                close: *close,
                volume: Some(1000),
            })
            .collect();
        PriceSeries::new("TEST", bars)
    }

    fn trending(len: usize) -> Vec<Option<Decimal>> {
        (0..len).map(|i| Some(Decimal::from(100 + i as i64))).collect()
    }

    #[test]
    fn test_enrich_end_to_end() {
        let closes: Vec<_> = [100, 102, 101, 99, 105]
            .iter()
            .map(|&c| Some(Decimal::from(c)))
            .collect();
        let enriched = IndicatorEngine::new()
            .enrich(&series_from_closes(&closes))
            .unwrap();

        let returns: Vec<_> = enriched.iter().map(|b| b.return_pct).collect();
        assert_eq!(
            returns,
            vec![None, Some(dec!(2.0)), Some(dec!(-0.98)), Some(dec!(-1.98)), Some(dec!(6.06))]
        );

        let ma5: Vec<_> = enriched.iter().map(|b| b.ma5).collect();
        assert_eq!(ma5, vec![None, None, None, None, Some(dec!(101.4))]);
        assert!(enriched.iter().all(|b| b.ma25.is_none()));
    }

    #[test]
    fn test_enrich_preserves_length_order_and_dates() {
        let series = series_from_closes(&trending(60));
        let enriched = IndicatorEngine::new().enrich(&series).unwrap();

        assert_eq!(enriched.len(), 60);
        for (raw, out) in series.bars.iter().zip(enriched.iter()) {
            assert_eq!(raw, &out.bar);
        }
        assert_eq!(enriched.symbol, "TEST");
    }

    #[test]
    fn test_ma_availability_matches_window() {
        let mut closes = trending(60);
        closes[30] = None;
        let enriched = IndicatorEngine::new()
            .enrich(&series_from_closes(&closes))
            .unwrap();

        for (i, bar) in enriched.iter().enumerate() {
            let ma5_expected = i >= 4 && closes[i - 4..=i].iter().all(Option::is_some);
            let ma25_expected = i >= 24 && closes[i - 24..=i].iter().all(Option::is_some);
            assert_eq!(bar.ma5.is_some(), ma5_expected, "ma5 at {}", i);
            assert_eq!(bar.ma25.is_some(), ma25_expected, "ma25 at {}", i);
        }

        // 100..=124 averages to 112
        assert_eq!(enriched.bars[24].ma25, Some(dec!(112)));
    }

    #[test]
    fn test_zero_close_gives_null_return() {
        let closes = vec![Some(dec!(5)), Some(dec!(0)), Some(dec!(5))];
        let enriched = IndicatorEngine::new()
            .enrich(&series_from_closes(&closes))
            .unwrap();

        assert_eq!(enriched.bars[0].return_pct, None);
        assert_eq!(enriched.bars[1].return_pct, Some(dec!(-100)));
        assert_eq!(enriched.bars[2].return_pct, None);
    }

    #[test]
    fn test_enrich_is_idempotent() {
        let mut closes = trending(60);
        closes[7] = None;
        let series = series_from_closes(&closes);
        let engine = IndicatorEngine::new();

        assert_eq!(engine.enrich(&series).unwrap(), engine.enrich(&series).unwrap());
    }

    #[test]
    fn test_placeholder_series_enriches_to_nulls() {
        let series = PriceSeries::placeholder("7203.T", start(), 60);
        let enriched = IndicatorEngine::new().enrich(&series).unwrap();

        assert_eq!(enriched.len(), 60);
        assert!(enriched.has_no_data());
        assert!(enriched
            .iter()
            .all(|b| b.return_pct.is_none() && b.ma5.is_none() && b.ma25.is_none()));
    }

    #[test]
    fn test_rejects_out_of_order_dates() {
        let mut series = series_from_closes(&trending(5));
        series.bars.swap(1, 2);

        let err = IndicatorEngine::new().enrich(&series).unwrap_err();
        assert!(matches!(err, InputError::NonIncreasingDate { index: 2, .. }));
    }
}
