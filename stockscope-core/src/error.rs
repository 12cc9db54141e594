//! Pipeline error taxonomy.
//!
//! Every variant is displayable as-is in both the CLI and the TUI notification
//! log. Transport detail stays in [`DataError`]; the pipeline wraps it in
//! [`StockError::DataFetchFailed`] together with the symbol that failed.

use std::path::PathBuf;

use thiserror::Error;

use crate::data::provider::DataError;

#[derive(Debug, Error)]
pub enum StockError {
    #[error("invalid date '{input}': expected YYYY-MM-DD")]
    InvalidDateFormat { input: String },

    #[error("failed to fetch {symbol}: {source}")]
    DataFetchFailed {
        symbol: String,
        #[source]
        source: DataError,
    },

    #[error("no data found for {symbol} ({window})")]
    NoDataForSymbol { symbol: String, window: String },

    #[error("unable to write to {}: ensure the file is not open elsewhere", path.display())]
    FilePermissionDenied { path: PathBuf },

    #[error("failed to write {}: {reason}", path.display())]
    StoreWriteFailed { path: PathBuf, reason: String },

    #[error("need at least 2 records to fit a trend, got {records}")]
    InsufficientHistory { records: usize },

    #[error("the number of tickers ({tickers}) and exchanges ({exchanges}) must match")]
    MismatchedInputLengths { tickers: usize, exchanges: usize },

    #[error("series is empty")]
    EmptySeries,

    #[error("missing input: {0}")]
    MissingInput(&'static str),

    #[error("please select a valid duration")]
    MissingDuration,

    #[error("ticker list unavailable: {0}")]
    TickerListUnavailable(#[source] DataError),
}

impl StockError {
    /// Short heading used as a notification title.
    pub fn title(&self) -> &'static str {
        match self {
            StockError::InvalidDateFormat { .. } => "Invalid Date",
            StockError::DataFetchFailed { .. } => "Fetch Error",
            StockError::NoDataForSymbol { .. } => "No Data",
            StockError::FilePermissionDenied { .. } => "Permission Error",
            StockError::StoreWriteFailed { .. } => "Store Error",
            StockError::InsufficientHistory { .. } => "Prediction Error",
            StockError::MismatchedInputLengths { .. }
            | StockError::MissingInput(_)
            | StockError::MissingDuration => "Warning",
            StockError::EmptySeries => "Error",
            StockError::TickerListUnavailable(_) => "Ticker List Error",
        }
    }

    /// True for problems with what the user typed, as opposed to runtime failures.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            StockError::InvalidDateFormat { .. }
                | StockError::MismatchedInputLengths { .. }
                | StockError::MissingInput(_)
                | StockError::MissingDuration
        )
    }
}
