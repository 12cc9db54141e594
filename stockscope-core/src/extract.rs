//! OHLCV extraction: single-day records and range aggregates.

use serde::{Deserialize, Serialize};

use crate::domain::{OhlcvRecord, OhlcvSeries};
use crate::error::StockError;

/// Highest high and lowest low over a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub max_high: f64,
    pub min_low: f64,
}

/// The chronologically earliest record.
pub fn first_day(series: &OhlcvSeries) -> Result<&OhlcvRecord, StockError> {
    series.first().ok_or(StockError::EmptySeries)
}

/// Max over every high and min over every low in the series.
pub fn aggregate(series: &OhlcvSeries) -> Result<PriceRange, StockError> {
    if series.is_empty() {
        return Err(StockError::EmptySeries);
    }
    let max_high = series
        .iter()
        .map(|r| r.high)
        .fold(f64::NEG_INFINITY, f64::max);
    let min_low = series.iter().map(|r| r.low).fold(f64::INFINITY, f64::min);
    Ok(PriceRange { max_high, min_low })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rec(day: u32, high: f64, low: f64) -> OhlcvRecord {
        OhlcvRecord {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            open: low,
            high,
            low,
            close: high,
            volume: 1,
        }
    }

    #[test]
    fn aggregate_takes_extremes() {
        let series =
            OhlcvSeries::from_records(vec![rec(1, 10.0, 5.0), rec(2, 12.0, 4.0), rec(3, 9.0, 6.0)]);
        let range = aggregate(&series).unwrap();
        assert_eq!(range.max_high, 12.0);
        assert_eq!(range.min_low, 4.0);
    }

    #[test]
    fn first_day_is_earliest() {
        let series = OhlcvSeries::from_records(vec![rec(3, 9.0, 6.0), rec(1, 10.0, 5.0)]);
        assert_eq!(
            first_day(&series).unwrap().date,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
    }

    #[test]
    fn empty_series_is_an_error() {
        let empty = OhlcvSeries::empty();
        assert!(matches!(first_day(&empty), Err(StockError::EmptySeries)));
        assert!(matches!(aggregate(&empty), Err(StockError::EmptySeries)));
    }
}
