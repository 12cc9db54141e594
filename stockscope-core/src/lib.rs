//! StockScope Core: symbols, market data, extraction, report store, trend prediction.
//!
//! This crate contains the per-ticker pipeline shared by the CLI and the TUI:
//! - Domain types (symbols, OHLCV records and series, periods, report rows)
//! - Date validation
//! - Market data providers (Yahoo Finance chart API, in-memory fixtures)
//! - OHLCV extraction (first day, high/low aggregate)
//! - Append-only CSV report store
//! - Per-field least-squares trend prediction
//! - Chart and notification contracts implemented by the front-ends
//! - Action validation and sequential batch dispatch

pub mod chart;
pub mod config;
pub mod data;
pub mod dates;
pub mod dispatch;
pub mod domain;
pub mod error;
pub mod extract;
pub mod notify;
pub mod predict;
pub mod store;

pub use config::AppConfig;
pub use dispatch::{Action, ActionKind, BatchSummary, DispatchSettings, Dispatcher, FormInput};
pub use error::StockError;
pub use notify::{NoticeLevel, Notification, Notifier};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: everything handed to the TUI worker thread is Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        // Domain types
        require_send::<domain::Symbol>();
        require_sync::<domain::Symbol>();
        require_send::<domain::OhlcvSeries>();
        require_sync::<domain::OhlcvSeries>();
        require_send::<domain::StockReportRow>();
        require_sync::<domain::StockReportRow>();
        require_send::<predict::Prediction>();
        require_sync::<predict::Prediction>();

        // Pipeline plumbing
        require_send::<Action>();
        require_sync::<Action>();
        require_send::<BatchSummary>();
        require_send::<StockError>();
        require_sync::<StockError>();
        require_send::<Notification>();
        require_sync::<Notification>();
        require_send::<store::ReportStore>();
        require_sync::<store::ReportStore>();
        require_send::<AppConfig>();
        require_sync::<AppConfig>();

        // Providers
        require_send::<data::YahooProvider>();
        require_sync::<data::YahooProvider>();
        require_send::<data::InMemoryProvider>();
        require_sync::<data::InMemoryProvider>();
        require_send::<data::RemoteTickerList>();
        require_sync::<data::RemoteTickerList>();
    }

    /// The dispatcher only needs trait objects, so boxed collaborators work.
    #[test]
    fn dispatcher_runs_over_boxed_trait_objects() {
        use chrono::NaiveDate;

        let today = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let bar = domain::OhlcvRecord {
            date: today,
            open: 100.0,
            high: 110.0,
            low: 95.0,
            close: 105.0,
            volume: 1_000,
        };
        let provider: Box<dyn data::MarketDataProvider> = Box::new(
            data::InMemoryProvider::new(today)
                .with_series("INFY.NS", domain::OhlcvSeries::from_records(vec![bar])),
        );
        let collector = notify::CollectingNotifier::new();
        let notifier: &dyn Notifier = &collector;
        let dir = tempfile::tempdir().unwrap();
        let store = store::ReportStore::new(dir.path().join("Stock_Data.csv"));

        let dispatcher = Dispatcher::new(
            provider.as_ref(),
            &store,
            notifier,
            DispatchSettings::default(),
        );
        let form = FormInput {
            tickers: "INFY".into(),
            exchanges: "NS".into(),
            ..FormInput::default()
        };
        let action = Action::from_form(ActionKind::FetchDaily, &form).unwrap();
        let summary = dispatcher.run(&action).unwrap();

        assert!(summary.all_succeeded());
        assert_eq!(summary.succeeded, 1);
        assert_eq!(collector.count(NoticeLevel::Info), 1);
        assert_eq!(store.read_rows().unwrap().len(), 1);
    }
}
