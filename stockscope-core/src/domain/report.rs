//! Stock report rows: the unit appended to the tabular store.

use serde::{Deserialize, Serialize};

use super::ohlcv::OhlcvRecord;
use super::symbol::Symbol;

/// Canonical header of the report store. Every write path uses this layout.
pub const REPORT_HEADER: [&str; 8] = [
    "Ticker",
    "Exchange",
    "Duration",
    "Open Price",
    "High Price",
    "Low Price",
    "Close Price",
    "Volume",
];

/// Placeholder written for fields an action does not produce.
pub const MISSING_FIELD: &str = "-";

/// One row of the report store.
///
/// `label` is the period code (`1d`, `6mo`) for relative fetches or the
/// `YYYY-MM-DD` date for date reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockReportRow {
    pub ticker: String,
    pub exchange: String,
    pub label: String,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<u64>,
}

impl StockReportRow {
    /// A full single-day row.
    pub fn from_record(symbol: &Symbol, label: impl Into<String>, rec: &OhlcvRecord) -> Self {
        Self {
            ticker: symbol.ticker.clone(),
            exchange: symbol.exchange.clone(),
            label: label.into(),
            open: Some(rec.open),
            high: Some(rec.high),
            low: Some(rec.low),
            close: Some(rec.close),
            volume: Some(rec.volume),
        }
    }

    /// A range aggregate row: only high and low are known.
    pub fn from_range(symbol: &Symbol, label: impl Into<String>, high: f64, low: f64) -> Self {
        Self {
            ticker: symbol.ticker.clone(),
            exchange: symbol.exchange.clone(),
            label: label.into(),
            open: None,
            high: Some(high),
            low: Some(low),
            close: None,
            volume: None,
        }
    }

    /// Cells in [`REPORT_HEADER`] order.
    pub fn to_fields(&self) -> Vec<String> {
        fn price(v: Option<f64>) -> String {
            v.map(|p| p.to_string())
                .unwrap_or_else(|| MISSING_FIELD.to_string())
        }
        vec![
            self.ticker.clone(),
            self.exchange.clone(),
            self.label.clone(),
            price(self.open),
            price(self.high),
            price(self.low),
            price(self.close),
            self.volume
                .map(|v| v.to_string())
                .unwrap_or_else(|| MISSING_FIELD.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn full_row_has_eight_cells() {
        let rec = OhlcvRecord {
            date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            open: 1500.5,
            high: 1520.0,
            low: 1490.25,
            close: 1510.0,
            volume: 123_456,
        };
        let row = StockReportRow::from_record(&Symbol::new("INFY", "NS"), "2024-01-05", &rec);
        let fields = row.to_fields();
        assert_eq!(fields.len(), REPORT_HEADER.len());
        assert_eq!(
            fields,
            vec!["INFY", "NS", "2024-01-05", "1500.5", "1520", "1490.25", "1510", "123456"]
        );
    }

    #[test]
    fn range_row_marks_missing_fields() {
        let row = StockReportRow::from_range(&Symbol::new("TCS", "NS"), "6mo", 4200.0, 3100.5);
        let fields = row.to_fields();
        assert_eq!(fields[3], MISSING_FIELD);
        assert_eq!(fields[4], "4200");
        assert_eq!(fields[5], "3100.5");
        assert_eq!(fields[6], MISSING_FIELD);
        assert_eq!(fields[7], MISSING_FIELD);
    }
}
