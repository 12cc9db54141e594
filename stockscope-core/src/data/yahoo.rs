//! Yahoo Finance data provider.
//!
//! Fetches daily OHLCV records from Yahoo's v8 chart API, either for an
//! explicit `[start, end)` window (`period1`/`period2`) or for a relative
//! range (`range=6mo`). One request per call; failures surface immediately.
//!
//! Yahoo Finance has no official API and is subject to unannounced format changes.

use std::time::Duration;

use chrono::NaiveDate;
use serde::Deserialize;

use super::provider::{DataError, MarketDataProvider};
use crate::config::ProviderConfig;
use crate::domain::{OhlcvRecord, OhlcvSeries, Period, Symbol};

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
struct ChartMeta {
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct QuoteData {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<u64>>,
}

/// What to ask the chart endpoint for.
#[derive(Debug, Clone, Copy)]
enum Window {
    Range { start: NaiveDate, end: NaiveDate },
    Relative(Period),
}

/// Yahoo Finance data provider.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl YahooProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self, DataError> {
        let mut builder = reqwest::blocking::Client::builder().user_agent(config.user_agent.clone());
        // reqwest's blocking client defaults to a 30s timeout; "unset" means none at all.
        builder = builder.timeout(config.timeout_secs.map(Duration::from_secs));
        let client = builder
            .build()
            .map_err(|e| DataError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build the chart API URL for a symbol and window.
    fn chart_url(&self, symbol: &str, window: Window) -> String {
        let base = &self.base_url;
        match window {
            Window::Range { start, end } => {
                let (start_ts, end_ts) = request_bounds(start, end);
                format!(
                    "{base}/v8/finance/chart/{symbol}\
                     ?period1={start_ts}&period2={end_ts}&interval=1d"
                )
            }
            Window::Relative(period) => format!(
                "{base}/v8/finance/chart/{symbol}?range={}&interval=1d",
                period.code()
            ),
        }
    }

    /// Parse the chart API response into records.
    ///
    /// A "Not Found" error or a result without timestamps means the provider
    /// has nothing for this window: that is an empty series, not an error.
    fn parse_response(symbol: &str, resp: ChartResponse) -> Result<Vec<OhlcvRecord>, DataError> {
        let result = match resp.chart.result {
            Some(result) => result,
            None => {
                return match resp.chart.error {
                    Some(err) if err.code == "Not Found" => {
                        tracing::debug!(symbol, "provider reports symbol not found");
                        Ok(Vec::new())
                    }
                    Some(err) => Err(DataError::ResponseFormatChanged(format!(
                        "{}: {}",
                        err.code, err.description
                    ))),
                    None => Err(DataError::ResponseFormatChanged(
                        "empty result with no error".into(),
                    )),
                };
            }
        };

        let Some(data) = result.into_iter().next() else {
            return Ok(Vec::new());
        };

        let Some(timestamps) = data.timestamp else {
            return Ok(Vec::new());
        };

        let quote = data.indicators.quote.into_iter().next().unwrap_or_default();
        let offset = data.meta.and_then(|m| m.gmtoffset).unwrap_or(0);

        let mut records = Vec::with_capacity(timestamps.len());

        for (i, &ts) in timestamps.iter().enumerate() {
            // Shift into exchange-local time before taking the calendar date.
            let date = chrono::DateTime::from_timestamp(ts + offset, 0)
                .map(|dt| dt.naive_utc().date())
                .ok_or_else(|| {
                    DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}"))
                })?;

            let open = quote.open.get(i).copied().flatten();
            let high = quote.high.get(i).copied().flatten();
            let low = quote.low.get(i).copied().flatten();
            let close = quote.close.get(i).copied().flatten();
            let volume = quote.volume.get(i).copied().flatten();

            let rec = OhlcvRecord {
                date,
                open: open.unwrap_or(f64::NAN),
                high: high.unwrap_or(f64::NAN),
                low: low.unwrap_or(f64::NAN),
                close: close.unwrap_or(f64::NAN),
                volume: volume.unwrap_or(0),
            };

            // Null rows are non-trading days; partial or inverted rows are unusable.
            if !rec.is_sane() {
                tracing::debug!(symbol, %date, "skipping incomplete row");
                continue;
            }
            records.push(rec);
        }

        Ok(records)
    }

    /// Execute a single HTTP request and parse it.
    fn fetch_window(&self, symbol: &Symbol, window: Window) -> Result<OhlcvSeries, DataError> {
        let lookup = symbol.provider_symbol();
        let url = self.chart_url(&lookup, window);
        tracing::debug!(%url, "requesting chart");

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;
        let status = resp.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(DataError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(DataError::AuthenticationRequired(format!(
                "Yahoo Finance refused the request (HTTP {status})"
            )));
        }

        // Unknown symbols come back as 404 with a JSON "Not Found" body.
        if !status.is_success() && status != reqwest::StatusCode::NOT_FOUND {
            return Err(DataError::HttpStatus {
                status: status.as_u16(),
                symbol: lookup,
            });
        }

        let chart: ChartResponse = resp.json().map_err(|e| {
            DataError::ResponseFormatChanged(format!("failed to parse response for {lookup}: {e}"))
        })?;

        let records = Self::parse_response(&lookup, chart)?;
        tracing::debug!(symbol = %lookup, rows = records.len(), "chart parsed");
        Ok(OhlcvSeries::from_records(records))
    }
}

impl MarketDataProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch_range(
        &self,
        symbol: &Symbol,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<OhlcvSeries, DataError> {
        if end <= start {
            return Ok(OhlcvSeries::empty());
        }
        // period2 is exclusive upstream too, but intraday timestamps can leak
        // across the boundary; trim to the requested window.
        let series = self.fetch_window(symbol, Window::Range { start, end })?;
        Ok(series.window(start, end))
    }

    fn fetch_period(&self, symbol: &Symbol, period: Period) -> Result<OhlcvSeries, DataError> {
        self.fetch_window(symbol, Window::Relative(period))
    }
}

/// Epoch bounds for `[start, end)`, padded by a day on each side.
///
/// Exchanges east of UTC stamp a session before midnight UTC of its local
/// date (and west of UTC after), so exact midnight bounds can miss the bar.
/// Callers trim the result back to the calendar window.
fn request_bounds(start: NaiveDate, end: NaiveDate) -> (i64, i64) {
    let pad = chrono::Days::new(1);
    let lo = start.checked_sub_days(pad).unwrap_or(start);
    let hi = end.checked_add_days(pad).unwrap_or(end);
    (midnight_utc(lo), midnight_utc(hi))
}

fn midnight_utc(date: NaiveDate) -> i64 {
    date.and_time(chrono::NaiveTime::MIN).and_utc().timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> YahooProvider {
        YahooProvider::new(&ProviderConfig::default()).unwrap()
    }

    fn parse(json: &str) -> Result<Vec<OhlcvRecord>, DataError> {
        let resp: ChartResponse = serde_json::from_str(json).unwrap();
        YahooProvider::parse_response("INFY.NS", resp)
    }

    #[test]
    fn range_url_pads_midnight_bounds() {
        let url = provider().chart_url(
            "INFY.NS",
            Window::Range {
                start: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
                end: NaiveDate::from_ymd_opt(2024, 1, 6).unwrap(),
            },
        );
        assert!(url.contains("/v8/finance/chart/INFY.NS?"));
        // 2024-01-04 and 2024-01-07 midnight UTC
        assert!(url.contains("period1=1704326400"));
        assert!(url.contains("period2=1704585600"));
        assert!(url.contains("interval=1d"));
    }

    #[test]
    fn east_of_utc_session_falls_inside_request_and_window() {
        // ASX session for 2024-01-05 opens 10:00 AEDT (+11h) = 2024-01-04 23:00 UTC.
        let ts = 1704409200;
        let day = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let next = NaiveDate::from_ymd_opt(2024, 1, 6).unwrap();

        let (period1, period2) = request_bounds(day, next);
        assert!(period1 <= ts && ts < period2);
        assert!(ts < midnight_utc(day));

        let json = format!(
            r#"{{"chart":{{"result":[{{
            "meta":{{"gmtoffset":39600}},
            "timestamp":[{ts}],
            "indicators":{{"quote":[{{
                "open":[7500.0],"high":[7550.0],"low":[7480.0],
                "close":[7520.0],"volume":[900]
            }}]}}
        }}],"error":null}}}}"#
        );
        let rows = parse(&json).unwrap();
        assert_eq!(rows[0].date, day);
        let series = OhlcvSeries::from_records(rows).window(day, next);
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn skips_partial_and_inverted_rows() {
        let json = r#"{"chart":{"result":[{
            "timestamp":[1704426300,1704512700,1704771900],
            "indicators":{"quote":[{
                "open":[1500.0,1510.0,1520.0],
                "high":[null,1530.0,1500.0],
                "low":[1490.0,1505.0,1540.0],
                "close":[1510.0,1525.0,1530.0],
                "volume":[1000,2000,3000]
            }]}
        }],"error":null}}"#;
        let rows = parse(json).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].volume, 2000);
        assert!(rows.iter().all(|r| r.open.is_finite() && r.high.is_finite()));
    }

    #[test]
    fn period_url_uses_range_code() {
        let url = provider().chart_url("TCS.NS", Window::Relative(Period::SixMonths));
        assert!(url.ends_with("/v8/finance/chart/TCS.NS?range=6mo&interval=1d"));
    }

    #[test]
    fn parses_rows_and_applies_gmtoffset() {
        // 2024-01-05 03:45 UTC == 09:15 IST
        let json = r#"{"chart":{"result":[{
            "meta":{"gmtoffset":19800},
            "timestamp":[1704426300,1704685500],
            "indicators":{"quote":[{
                "open":[1500.0,1510.0],
                "high":[1520.0,1530.0],
                "low":[1490.0,1505.0],
                "close":[1510.0,1525.0],
                "volume":[1000,2000]
            }]}
        }],"error":null}}"#;
        let rows = parse(json).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(rows[1].date, NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());
        assert_eq!(rows[1].volume, 2000);
    }

    #[test]
    fn skips_all_null_rows() {
        let json = r#"{"chart":{"result":[{
            "timestamp":[1704426300,1704512700],
            "indicators":{"quote":[{
                "open":[null,1510.0],
                "high":[null,1530.0],
                "low":[null,1505.0],
                "close":[null,1525.0],
                "volume":[null,2000]
            }]}
        }],"error":null}}"#;
        let rows = parse(json).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].open, 1510.0);
    }

    #[test]
    fn missing_timestamps_mean_no_data() {
        let json = r#"{"chart":{"result":[{
            "meta":{"gmtoffset":19800},
            "indicators":{"quote":[{}]}
        }],"error":null}}"#;
        assert!(parse(json).unwrap().is_empty());
    }

    #[test]
    fn not_found_means_no_data() {
        let json = r#"{"chart":{"result":null,"error":{
            "code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        assert!(parse(json).unwrap().is_empty());
    }

    #[test]
    fn other_provider_errors_are_errors() {
        let json = r#"{"chart":{"result":null,"error":{
            "code":"Bad Request","description":"Invalid input"}}}"#;
        assert!(matches!(
            parse(json),
            Err(DataError::ResponseFormatChanged(_))
        ));
    }
}
