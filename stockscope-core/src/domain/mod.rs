//! Domain types for StockScope

pub mod ohlcv;
pub mod period;
pub mod report;
pub mod symbol;

pub use ohlcv::{OhlcvRecord, OhlcvSeries};
pub use period::Period;
pub use report::{StockReportRow, MISSING_FIELD, REPORT_HEADER};
pub use symbol::{split_list, BatchInput, Symbol};
