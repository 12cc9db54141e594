//! In-memory provider backed by fixture series.
//!
//! Used by tests and offline demos. Relative periods are resolved against a
//! fixed "today" so results are deterministic.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{Months, NaiveDate};

use super::provider::{DataError, MarketDataProvider};
use crate::domain::{OhlcvSeries, Period, Symbol};

pub struct InMemoryProvider {
    series: HashMap<String, OhlcvSeries>,
    failures: HashMap<String, String>,
    today: NaiveDate,
    calls: Mutex<Vec<String>>,
}

impl InMemoryProvider {
    /// An empty provider whose relative periods end at `today` (inclusive).
    pub fn new(today: NaiveDate) -> Self {
        Self {
            series: HashMap::new(),
            failures: HashMap::new(),
            today,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Register data for a `TICKER.EXCHANGE` lookup string.
    pub fn with_series(mut self, provider_symbol: &str, series: OhlcvSeries) -> Self {
        self.series.insert(provider_symbol.to_uppercase(), series);
        self
    }

    /// Make every request for `provider_symbol` fail as a network error.
    pub fn with_failure(mut self, provider_symbol: &str, message: &str) -> Self {
        self.failures
            .insert(provider_symbol.to_uppercase(), message.to_string());
        self
    }

    /// Provider symbols requested so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn lookup(&self, symbol: &Symbol) -> Result<Option<&OhlcvSeries>, DataError> {
        let key = symbol.provider_symbol();
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(key.clone());
        }
        if let Some(message) = self.failures.get(&key) {
            return Err(DataError::NetworkUnreachable(message.clone()));
        }
        Ok(self.series.get(&key))
    }

    fn period_start(&self, period: Period) -> NaiveDate {
        let months = match period {
            Period::OneDay => return self.today,
            Period::OneMonth => 1,
            Period::SixMonths => 6,
            Period::OneYear => 12,
            Period::FiveYears => 60,
        };
        self.today
            .checked_sub_months(Months::new(months))
            .unwrap_or(NaiveDate::MIN)
    }
}

impl MarketDataProvider for InMemoryProvider {
    fn name(&self) -> &str {
        "in_memory"
    }

    fn fetch_range(
        &self,
        symbol: &Symbol,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<OhlcvSeries, DataError> {
        Ok(self
            .lookup(symbol)?
            .map(|s| s.window(start, end))
            .unwrap_or_default())
    }

    fn fetch_period(&self, symbol: &Symbol, period: Period) -> Result<OhlcvSeries, DataError> {
        let Some(series) = self.lookup(symbol)? else {
            return Ok(OhlcvSeries::empty());
        };
        let end = self.today.succ_opt().unwrap_or(self.today);
        let window = series.window(self.period_start(period), end);
        if period == Period::OneDay && window.is_empty() {
            // "1 day" means the latest session, which may predate today.
            return Ok(series
                .last()
                .map(|r| OhlcvSeries::from_records(vec![*r]))
                .unwrap_or_default());
        }
        Ok(window)
    }
}
