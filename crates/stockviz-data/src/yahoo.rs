//! Yahoo Finance price source.
//!
//! Fetches daily OHLCV bars from Yahoo's v8 chart API. Yahoo has no
//! official API; any response it changes shape on surfaces as a
//! `ParseError` and the caller falls back to placeholder data.

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate};
use reqwest::{Client, Url};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use stockviz_core::error::DataFetchError;
use stockviz_core::traits::PriceSource;
use stockviz_core::types::{PriceBar, PriceSeries};
use tracing::debug;

/// Public chart API host.
pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Yahoo rejects requests without a browser-like agent.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Decimal places kept on prices converted from the API's floats.
const PRICE_DECIMALS: u32 = 4;

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    meta: Option<ChartMeta>,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    currency: Option<String>,
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteData {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

/// Yahoo Finance price source.
pub struct YahooSource {
    client: Client,
    base_url: Url,
}

impl YahooSource {
    /// Create a source against `base_url` with a request timeout.
    pub fn new(
        base_url: &str,
        timeout: std::time::Duration,
        user_agent: &str,
    ) -> Result<Self, DataFetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| DataFetchError::ConnectionError(e.to_string()))?;

        let base_url = Url::parse(base_url).map_err(|e| {
            DataFetchError::ConnectionError(format!("invalid base URL {:?}: {}", base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(DataFetchError::ConnectionError(format!(
                "invalid base URL {:?}",
                base_url.as_str()
            )));
        }

        Ok(Self { client, base_url })
    }

    /// Chart endpoint for `symbol`, which is escaped as one path segment.
    fn chart_url(&self, symbol: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["v8", "finance", "chart"])
                .push(symbol);
        }
        url
    }

    /// Calendar span requested for `lookback` trading days ending at `today`.
    ///
    /// Weekends plus a margin for holidays; the adapter trims the excess.
    fn request_range(lookback: usize, today: NaiveDate) -> (i64, i64) {
        let span = (lookback as i64) * 7 / 5 + 14;
        let start = today - Duration::days(span);
        let end = today + Duration::days(1);
        (
            start.and_time(chrono::NaiveTime::MIN).and_utc().timestamp(),
            end.and_time(chrono::NaiveTime::MIN).and_utc().timestamp(),
        )
    }

    fn price(value: Option<&Option<f64>>) -> Option<Decimal> {
        value
            .copied()
            .flatten()
            .and_then(Decimal::from_f64)
            .map(|d| d.round_dp(PRICE_DECIMALS).normalize())
    }

    /// Parse the chart API response into a series.
    fn parse_response(symbol: &str, resp: ChartResponse) -> Result<PriceSeries, DataFetchError> {
        let result = resp.chart.result.ok_or_else(|| match resp.chart.error {
            Some(err) if err.code == "Not Found" => {
                DataFetchError::SymbolNotFound(symbol.to_string())
            }
            Some(err) => DataFetchError::Api {
                code: err.code,
                description: err.description,
            },
            None => DataFetchError::ParseError("empty result with no error".into()),
        })?;

        let data = result
            .into_iter()
            .next()
            .ok_or_else(|| DataFetchError::ParseError("result array is empty".into()))?;

        let (currency, gmtoffset) = data
            .meta
            .map(|m| (m.currency, m.gmtoffset))
            .unwrap_or((None, 0));

        // Symbols with no trades in range come back without timestamps.
        let timestamps = data.timestamp.unwrap_or_default();
        let quote = data.indicators.quote.into_iter().next().unwrap_or_default();

        let mut bars: Vec<PriceBar> = Vec::with_capacity(timestamps.len());

        for (i, &ts) in timestamps.iter().enumerate() {
            let date = DateTime::from_timestamp(ts + gmtoffset, 0)
                .map(|dt| dt.date_naive())
                .ok_or_else(|| DataFetchError::ParseError(format!("invalid timestamp: {ts}")))?;

            let bar = PriceBar {
                date,
                open: Self::price(quote.open.get(i)),
                high: Self::price(quote.high.get(i)),
                low: Self::price(quote.low.get(i)),
                close: Self::price(quote.close.get(i)),
                volume: quote.volume.get(i).copied().flatten(),
            };

            // Holidays come back as all-null rows
            if bar.is_empty() {
                continue;
            }

            match bars.last_mut() {
                // The live session is repeated with the same date
                Some(last) if last.date == bar.date => *last = bar,
                Some(last) if last.date > bar.date => {
                    debug!(%symbol, date = %bar.date, "dropping out-of-order row");
                }
                _ => bars.push(bar),
            }
        }

        if bars.is_empty() {
            return Err(DataFetchError::NoDataAvailable {
                symbol: symbol.to_string(),
            });
        }

        let series = PriceSeries::new(symbol, bars);
        Ok(match currency {
            Some(c) => series.with_currency(c),
            None => series,
        })
    }
}

#[async_trait]
impl PriceSource for YahooSource {
    async fn daily_bars(
        &self,
        symbol: &str,
        lookback: usize,
        today: NaiveDate,
    ) -> Result<PriceSeries, DataFetchError> {
        let (period1, period2) = Self::request_range(lookback, today);
        let url = self.chart_url(symbol);
        debug!(%url, period1, period2, "requesting chart");

        let response = self
            .client
            .get(url)
            .query(&[
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("interval", "1d".to_string()),
                ("events", "history".to_string()),
            ])
            .send()
            .await
            .map_err(|e| DataFetchError::ConnectionError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DataFetchError::ConnectionError(e.to_string()))?;

        // Error responses still carry a chart envelope with the reason.
        match serde_json::from_str::<ChartResponse>(&body) {
            Ok(parsed) => Self::parse_response(symbol, parsed),
            Err(_) if !status.is_success() => Err(DataFetchError::HttpStatus {
                status: status.as_u16(),
                source_name: self.name().to_string(),
            }),
            Err(e) => Err(DataFetchError::ParseError(e.to_string())),
        }
    }

    fn name(&self) -> &str {
        "yahoo"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    // 2024-03-04 .. 2024-03-07 at 00:00 UTC (09:00 JST)
    const MAR4: i64 = 1_709_510_400;
    const DAY: i64 = 86_400;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 7).unwrap()
    }

    fn source(server: &MockServer) -> YahooSource {
        YahooSource::new(
            &server.uri(),
            std::time::Duration::from_secs(5),
            DEFAULT_USER_AGENT,
        )
        .unwrap()
    }

    fn chart_body() -> serde_json::Value {
        json!({
            "chart": {
                "result": [{
                    "meta": { "currency": "JPY", "symbol": "7203.T", "gmtoffset": 32400 },
                    "timestamp": [MAR4, MAR4 + DAY, MAR4 + 2 * DAY, MAR4 + 3 * DAY, MAR4 + 3 * DAY + 3600],
                    "indicators": {
                        "quote": [{
                            "open":   [3500.0, null, 3550.0, 3600.0, 3610.0],
                            "high":   [3560.0, null, 3590.0, 3650.0, 3660.0],
                            "low":    [3480.0, null, 3520.0, 3580.0, 3590.0],
                            "close":  [3540.0, null, 3580.0, 3620.5, 3640.25],
                            "volume": [1000000, null, 1200000, 900000, 950000]
                        }]
                    }
                }],
                "error": null
            }
        })
    }

    #[test]
    fn test_chart_url_escapes_symbol() {
        let source = YahooSource::new(
            "https://example.test/",
            std::time::Duration::from_secs(5),
            DEFAULT_USER_AGENT,
        )
        .unwrap();

        assert_eq!(
            source.chart_url("7203.T").as_str(),
            "https://example.test/v8/finance/chart/7203.T"
        );
        assert_eq!(
            source.chart_url("A/B?x#y").as_str(),
            "https://example.test/v8/finance/chart/A%2FB%3Fx%23y"
        );
        assert!(source.chart_url("^N225").query().is_none());
    }

    #[test]
    fn test_invalid_base_url() {
        let err = YahooSource::new("not a url", std::time::Duration::from_secs(5), DEFAULT_USER_AGENT);
        assert!(matches!(err, Err(DataFetchError::ConnectionError(_))));
    }

    #[tokio::test]
    async fn test_fetch_symbol_with_reserved_characters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v8/finance/chart/A%2FB%3Fx"))
            .and(query_param("interval", "1d"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chart_body()))
            .mount(&server)
            .await;

        let series = source(&server)
            .daily_bars("A/B?x", 60, today())
            .await
            .unwrap();
        assert_eq!(series.len(), 3);
    }

    #[test]
    fn test_request_range_covers_lookback() {
        let (start, end) = YahooSource::request_range(60, today());
        let days = (end - start) / DAY;

        // 60 trading days need at least 84 calendar days
        assert!(days >= 84 + 1);
        assert_eq!(
            DateTime::from_timestamp(end, 0).unwrap().date_naive(),
            NaiveDate::from_ymd_opt(2024, 3, 8).unwrap()
        );
    }

    #[tokio::test]
    async fn test_fetch_parses_chart() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v8/finance/chart/7203.T"))
            .and(query_param("interval", "1d"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chart_body()))
            .mount(&server)
            .await;

        let series = source(&server)
            .daily_bars("7203.T", 60, today())
            .await
            .unwrap();

        // Holiday dropped, duplicate session replaced by the later row
        assert_eq!(series.len(), 3);
        assert_eq!(series.currency.as_deref(), Some("JPY"));
        assert_eq!(series.bars[0].date, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
        assert_eq!(series.bars[2].date, today());
        assert_eq!(series.bars[2].close, Some(dec!(3640.25)));
        assert_eq!(series.bars[2].volume, Some(950000));
        assert!(series.validate_dates().is_ok());
    }

    #[tokio::test]
    async fn test_fetch_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v8/finance/chart/NOPE"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "chart": {
                    "result": null,
                    "error": { "code": "Not Found", "description": "No data found, symbol may be delisted" }
                }
            })))
            .mount(&server)
            .await;

        let err = source(&server)
            .daily_bars("NOPE", 60, today())
            .await
            .unwrap_err();
        assert!(matches!(err, DataFetchError::SymbolNotFound(s) if s == "NOPE"));
    }

    #[tokio::test]
    async fn test_fetch_http_error_without_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
            .mount(&server)
            .await;

        let err = source(&server)
            .daily_bars("7203.T", 60, today())
            .await
            .unwrap_err();
        assert!(matches!(err, DataFetchError::HttpStatus { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_fetch_empty_result() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "chart": {
                    "result": [{
                        "meta": { "currency": "USD", "gmtoffset": -18000 },
                        "indicators": { "quote": [{}] }
                    }],
                    "error": null
                }
            })))
            .mount(&server)
            .await;

        let err = source(&server)
            .daily_bars("EMPTY", 60, today())
            .await
            .unwrap_err();
        assert!(matches!(err, DataFetchError::NoDataAvailable { .. }));
    }

    #[tokio::test]
    async fn test_fetch_garbage_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>consent</html>"))
            .mount(&server)
            .await;

        let err = source(&server)
            .daily_bars("7203.T", 60, today())
            .await
            .unwrap_err();
        assert!(matches!(err, DataFetchError::ParseError(_)));
    }
}
