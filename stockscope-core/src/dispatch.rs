//! Action dispatch: validated user actions run as sequential per-symbol batches.
//!
//! Front-ends collect raw strings into a [`FormInput`], turn them into an
//! [`Action`] with [`Action::from_form`] (all validation happens here, before
//! any network call), and hand the action to a [`Dispatcher`].
//!
//! A failing symbol never stops the batch: its error becomes a notification
//! and is recorded in the [`BatchSummary`].

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::chart::{chart_title, ChartRenderer};
use crate::config::AppConfig;
use crate::data::{MarketDataProvider, TickerSource};
use crate::dates::{format_date, parse_date};
use crate::domain::{BatchInput, OhlcvRecord, OhlcvSeries, Period, StockReportRow, Symbol};
use crate::error::StockError;
use crate::extract::{aggregate, first_day};
use crate::notify::{Notification, Notifier};
use crate::predict::predict;
use crate::store::ReportStore;

/// The six user actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    FetchDaily,
    DurationReport,
    Chart,
    DateReport,
    Predict,
    Bulk,
}

impl ActionKind {
    pub const ALL: [ActionKind; 6] = [
        ActionKind::FetchDaily,
        ActionKind::DurationReport,
        ActionKind::Chart,
        ActionKind::DateReport,
        ActionKind::Predict,
        ActionKind::Bulk,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ActionKind::FetchDaily => "Fetch Daily Prices",
            ActionKind::DurationReport => "Duration Report",
            ActionKind::Chart => "Candlestick Charts",
            ActionKind::DateReport => "Report for Date",
            ActionKind::Predict => "Predict Price",
            ActionKind::Bulk => "Bulk Date Report",
        }
    }
}

/// Raw form contents as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormInput {
    /// Comma-separated tickers.
    pub tickers: String,
    /// Comma-separated exchange suffixes, paired with `tickers` by position.
    pub exchanges: String,
    /// `YYYY-MM-DD`, used by date report, predict and bulk.
    pub date: String,
    pub duration: Option<Period>,
}

/// A validated action, carrying plain values only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    FetchDaily { batch: BatchInput },
    DurationReport { batch: BatchInput, period: Period },
    Chart { batch: BatchInput, period: Period },
    DateReport { batch: BatchInput, date: NaiveDate },
    Predict { batch: BatchInput, target: NaiveDate },
    /// `exchange: None` uses the configured bulk exchange.
    Bulk { exchange: Option<String>, date: NaiveDate },
}

impl Action {
    /// Validate `form` for `kind`.
    pub fn from_form(kind: ActionKind, form: &FormInput) -> Result<Self, StockError> {
        match kind {
            ActionKind::FetchDaily => Ok(Action::FetchDaily {
                batch: BatchInput::parse(&form.tickers, &form.exchanges)?,
            }),
            ActionKind::DurationReport => {
                let batch = BatchInput::parse(&form.tickers, &form.exchanges)?;
                let period = form.duration.ok_or(StockError::MissingDuration)?;
                Ok(Action::DurationReport { batch, period })
            }
            ActionKind::Chart => {
                let batch = BatchInput::parse(&form.tickers, &form.exchanges)?;
                let period = form.duration.ok_or(StockError::MissingDuration)?;
                Ok(Action::Chart { batch, period })
            }
            ActionKind::DateReport => {
                if form.date.trim().is_empty() {
                    return Err(StockError::MissingInput("enter a date"));
                }
                let batch = BatchInput::parse(&form.tickers, &form.exchanges)?;
                let date = parse_date(&form.date)?;
                Ok(Action::DateReport { batch, date })
            }
            ActionKind::Predict => {
                if form.date.trim().is_empty() {
                    return Err(StockError::MissingInput("enter a target date"));
                }
                let batch = BatchInput::parse(&form.tickers, &form.exchanges)?;
                let target = parse_date(&form.date)?;
                Ok(Action::Predict { batch, target })
            }
            ActionKind::Bulk => Ok(Action::Bulk {
                exchange: None,
                date: parse_date(&form.date)?,
            }),
        }
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            Action::FetchDaily { .. } => ActionKind::FetchDaily,
            Action::DurationReport { .. } => ActionKind::DurationReport,
            Action::Chart { .. } => ActionKind::Chart,
            Action::DateReport { .. } => ActionKind::DateReport,
            Action::Predict { .. } => ActionKind::Predict,
            Action::Bulk { .. } => ActionKind::Bulk,
        }
    }
}

/// Outcome of one batch.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Symbols not attempted because the batch was cancelled.
    pub skipped: usize,
    pub errors: Vec<(Symbol, StockError)>,
}

impl BatchSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0 && self.skipped == 0
    }

    pub fn cancelled(&self) -> bool {
        self.skipped > 0
    }
}

/// Values the dispatcher needs from the application config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchSettings {
    pub prediction_lookback: Period,
    pub currency_symbol: String,
    pub currency_label: String,
    pub bulk_exchange: String,
}

impl DispatchSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            prediction_lookback: config.prediction_lookback,
            currency_symbol: config.currency_symbol.clone(),
            currency_label: config.currency_label.clone(),
            bulk_exchange: config.bulk.exchange.clone(),
        }
    }
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

/// Runs actions against a provider, a store and a notifier.
pub struct Dispatcher<'a> {
    provider: &'a dyn MarketDataProvider,
    store: &'a ReportStore,
    notifier: &'a dyn Notifier,
    settings: DispatchSettings,
    chart: Option<&'a dyn ChartRenderer>,
    tickers: Option<&'a dyn TickerSource>,
    cancel: Option<&'a AtomicBool>,
}

impl<'a> Dispatcher<'a> {
    pub fn new(
        provider: &'a dyn MarketDataProvider,
        store: &'a ReportStore,
        notifier: &'a dyn Notifier,
        settings: DispatchSettings,
    ) -> Self {
        Self {
            provider,
            store,
            notifier,
            settings,
            chart: None,
            tickers: None,
            cancel: None,
        }
    }

    pub fn with_chart(mut self, chart: &'a dyn ChartRenderer) -> Self {
        self.chart = Some(chart);
        self
    }

    pub fn with_ticker_source(mut self, source: &'a dyn TickerSource) -> Self {
        self.tickers = Some(source);
        self
    }

    /// Stop before the next symbol once `flag` is set.
    pub fn with_cancel(mut self, flag: &'a AtomicBool) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Run `action` to completion (or cancellation).
    ///
    /// Per-symbol failures are reported through the notifier and the summary.
    /// `Err` is reserved for failures that prevent the batch from starting.
    pub fn run(&self, action: &Action) -> Result<BatchSummary, StockError> {
        let kind = action.kind();
        tracing::info!(action = kind.label(), provider = self.provider.name(), "running action");

        let summary = match action {
            Action::FetchDaily { batch } => self.run_batch(batch, |s| self.fetch_daily(s)),
            Action::DurationReport { batch, period } => {
                self.run_batch(batch, |s| self.duration_report(s, *period))
            }
            Action::Chart { batch, period } => self.run_batch(batch, |s| self.chart(s, *period)),
            Action::DateReport { batch, date } => {
                self.run_batch(batch, |s| self.date_report(s, *date, true))
            }
            Action::Predict { batch, target } => {
                self.run_batch(batch, |s| self.predict(s, *target))
            }
            Action::Bulk { exchange, date } => self.bulk(exchange.as_deref(), *date)?,
        };

        tracing::info!(
            action = kind.label(),
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            skipped = summary.skipped,
            "action finished"
        );
        Ok(summary)
    }

    fn run_batch<F>(&self, batch: &BatchInput, mut per_symbol: F) -> BatchSummary
    where
        F: FnMut(&Symbol) -> Result<(), StockError>,
    {
        let total = batch.len();
        let mut summary = BatchSummary {
            total,
            ..BatchSummary::default()
        };

        for (index, symbol) in batch.symbols.iter().enumerate() {
            if self.is_cancelled() {
                summary.skipped = total - index;
                tracing::info!(remaining = summary.skipped, "batch cancelled");
                break;
            }
            self.notifier.on_symbol_start(symbol, index, total);

            match per_symbol(symbol) {
                Ok(()) => summary.succeeded += 1,
                Err(err) => {
                    tracing::warn!(symbol = %symbol, error = %err, "symbol failed");
                    self.notifier.notify(Notification::from_error(&err));
                    summary.failed += 1;
                    summary.errors.push((symbol.clone(), err));
                }
            }
        }
        summary
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    fn fetch_period(&self, symbol: &Symbol, period: Period) -> Result<OhlcvSeries, StockError> {
        let series = self
            .provider
            .fetch_period(symbol, period)
            .map_err(|source| StockError::DataFetchFailed {
                symbol: symbol.provider_symbol(),
                source,
            })?;
        if series.is_empty() {
            return Err(StockError::NoDataForSymbol {
                symbol: symbol.provider_symbol(),
                window: format!("{} period", period.code()),
            });
        }
        Ok(series)
    }

    fn fetch_day(&self, symbol: &Symbol, date: NaiveDate) -> Result<OhlcvSeries, StockError> {
        let end = date.checked_add_days(Days::new(1)).unwrap_or(date);
        let series = self
            .provider
            .fetch_range(symbol, date, end)
            .map_err(|source| StockError::DataFetchFailed {
                symbol: symbol.provider_symbol(),
                source,
            })?;
        if series.is_empty() {
            return Err(StockError::NoDataForSymbol {
                symbol: symbol.provider_symbol(),
                window: format!("on {}", format_date(date)),
            });
        }
        Ok(series)
    }

    fn fetch_daily(&self, symbol: &Symbol) -> Result<(), StockError> {
        let series = self.fetch_period(symbol, Period::OneDay)?;
        let rec = first_day(&series)?;
        self.notifier.notify(Notification::info(
            format!("Daily Stock Prices for {}", symbol.ticker),
            price_lines(rec),
        ));
        self.store
            .append(&StockReportRow::from_record(symbol, Period::OneDay.code(), rec))
    }

    fn duration_report(&self, symbol: &Symbol, period: Period) -> Result<(), StockError> {
        let series = self.fetch_period(symbol, period)?;
        let range = aggregate(&series)?;
        self.notifier.notify(Notification::info(
            format!("{} Report for {}", period.code(), symbol.ticker),
            format!(
                "High Price: {:.2}\nLow Price: {:.2}",
                range.max_high, range.min_low
            ),
        ));
        self.store.append(&StockReportRow::from_range(
            symbol,
            period.code(),
            range.max_high,
            range.min_low,
        ))
    }

    fn chart(&self, symbol: &Symbol, period: Period) -> Result<(), StockError> {
        let series = self.fetch_period(symbol, period)?;
        let title = chart_title(symbol, period);
        match self.chart {
            Some(renderer) => renderer.render(&series, &title, &self.settings.currency_label),
            None => {
                // No renderer: summarize the series instead.
                let (first, last) = (series.first(), series.last());
                let body = match (first, last) {
                    (Some(f), Some(l)) => format!(
                        "{} candles from {} to {}",
                        series.len(),
                        format_date(f.date),
                        format_date(l.date)
                    ),
                    _ => "no candles".to_string(),
                };
                self.notifier.notify(Notification::info(title, body));
            }
        }
        Ok(())
    }

    fn date_report(&self, symbol: &Symbol, date: NaiveDate, announce: bool) -> Result<(), StockError> {
        let series = self.fetch_day(symbol, date)?;
        let rec = first_day(&series)?;
        let date_str = format_date(date);
        if announce {
            self.notifier.notify(Notification::info(
                format!("Stock Report for {date_str}"),
                format!(
                    "Ticker: {}\nDate: {date_str}\n{}",
                    symbol.provider_symbol(),
                    price_lines(rec)
                ),
            ));
        }
        self.store
            .append(&StockReportRow::from_record(symbol, date_str, rec))
    }

    fn predict(&self, symbol: &Symbol, target: NaiveDate) -> Result<(), StockError> {
        let series = self.fetch_period(symbol, self.settings.prediction_lookback)?;
        let prediction = predict(&series, target)?;
        tracing::debug!(
            symbol = %symbol,
            records = series.len(),
            day_offset = prediction.day_offset,
            "trend fitted"
        );
        self.notifier.notify(Notification::info(
            format!("Prediction for {} on {}", symbol.ticker, format_date(target)),
            prediction.display(&self.settings.currency_symbol),
        ));
        Ok(())
    }

    fn bulk(&self, exchange: Option<&str>, date: NaiveDate) -> Result<BatchSummary, StockError> {
        let source = self
            .tickers
            .ok_or(StockError::MissingInput("no ticker list source configured"))?;
        let list = source.load().map_err(StockError::TickerListUnavailable)?;
        let exchange = exchange.unwrap_or(&self.settings.bulk_exchange);
        let batch = BatchInput::with_exchange(list.all_tickers(), exchange);
        let date_str = format_date(date);

        if batch.is_empty() {
            self.notifier.notify(Notification::warning(
                "Bulk Report",
                "The ticker list is empty.",
            ));
            return Ok(BatchSummary::default());
        }
        tracing::info!(tickers = batch.len(), exchange, date = %date_str, "bulk report");

        let summary = self.run_batch(&batch, |s| self.date_report(s, date, false));
        self.notifier.notify(Notification::info(
            format!("Bulk Report for {date_str}"),
            format!(
                "Saved {} of {} tickers ({}) to {}",
                summary.succeeded,
                summary.total,
                exchange,
                self.store.path().display()
            ),
        ));
        Ok(summary)
    }
}

fn price_lines(rec: &OhlcvRecord) -> String {
    format!(
        "Opening Price: {:.2}\nHigh Price: {:.2}\nLow Price: {:.2}\nClosing Price: {:.2}\nVolume: {}",
        rec.open, rec.high, rec.low, rec.close, rec.volume
    )
}
