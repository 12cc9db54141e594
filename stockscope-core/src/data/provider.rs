//! Market data provider trait and structured error types.
//!
//! The MarketDataProvider trait abstracts over data sources (Yahoo Finance,
//! in-memory fixtures) so the pipeline can swap implementations and tests can
//! run offline.

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{OhlcvSeries, Period, Symbol};

/// Structured transport/provider errors.
///
/// "No rows for this window" is not an error: providers return an empty
/// series for it.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("HTTP {status} for {symbol}")]
    HttpStatus { status: u16, symbol: String },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),
}

/// Trait for market data providers.
///
/// Implementations do one request per call: no caching, no retry.
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Daily OHLCV records for `start <= date < end`.
    fn fetch_range(
        &self,
        symbol: &Symbol,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<OhlcvSeries, DataError>;

    /// Daily OHLCV records for a window ending now.
    fn fetch_period(&self, symbol: &Symbol, period: Period) -> Result<OhlcvSeries, DataError>;
}

impl<P: MarketDataProvider + ?Sized> MarketDataProvider for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fetch_range(
        &self,
        symbol: &Symbol,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<OhlcvSeries, DataError> {
        (**self).fetch_range(symbol, start, end)
    }

    fn fetch_period(&self, symbol: &Symbol, period: Period) -> Result<OhlcvSeries, DataError> {
        (**self).fetch_period(symbol, period)
    }
}
