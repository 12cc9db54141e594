//! Linear trend extrapolation.
//!
//! Each OHLCV field gets its own ordinary least-squares line against "days
//! since the series' earliest date", evaluated at the target date. Targets
//! outside the observed range are extrapolated as-is: the further out, the
//! less the straight line means.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{OhlcvRecord, OhlcvSeries};
use crate::error::StockError;

/// The five predicted fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    Open,
    High,
    Low,
    Close,
    Volume,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Open,
        Field::High,
        Field::Low,
        Field::Close,
        Field::Volume,
    ];

    fn value(self, rec: &OhlcvRecord) -> f64 {
        match self {
            Field::Open => rec.open,
            Field::High => rec.high,
            Field::Low => rec.low,
            Field::Close => rec.close,
            Field::Volume => rec.volume as f64,
        }
    }
}

/// `y = intercept + slope * x`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub intercept: f64,
    pub slope: f64,
}

impl LinearFit {
    /// Ordinary least squares over paired samples.
    ///
    /// Returns `None` for fewer than two points or when every x is equal.
    pub fn ols(xs: &[f64], ys: &[f64]) -> Option<Self> {
        let n = xs.len().min(ys.len());
        if n < 2 {
            return None;
        }
        let nf = n as f64;
        let mean_x = xs[..n].iter().sum::<f64>() / nf;
        let mean_y = ys[..n].iter().sum::<f64>() / nf;

        let (sxy, sxx) = xs[..n]
            .iter()
            .zip(&ys[..n])
            .fold((0.0, 0.0), |(sxy, sxx), (&x, &y)| {
                let dx = x - mean_x;
                (sxy + dx * (y - mean_y), sxx + dx * dx)
            });

        if sxx.abs() < f64::EPSILON {
            return None;
        }
        let slope = sxy / sxx;
        Some(Self {
            intercept: mean_y - slope * mean_x,
            slope,
        })
    }

    pub fn eval(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Predicted values for one target date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub target: NaiveDate,
    /// Days between the series' earliest date and the target.
    pub day_offset: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Rounded to the nearest whole share; may be negative far outside the data.
    pub volume: i64,
}

impl Prediction {
    /// Multi-line summary with prices to two decimals.
    pub fn display(&self, currency: &str) -> String {
        format!(
            "Open: {currency}{:.2}\nHigh: {currency}{:.2}\nLow: {currency}{:.2}\nClose: {currency}{:.2}\nVolume: {}",
            self.open, self.high, self.low, self.close, self.volume
        )
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display(""))
    }
}

/// Fit each field against elapsed days and evaluate at `target`.
pub fn predict(series: &OhlcvSeries, target: NaiveDate) -> Result<Prediction, StockError> {
    let records = series.records();
    let Some(origin) = records.first().map(|r| r.date) else {
        return Err(StockError::InsufficientHistory { records: 0 });
    };
    if records.len() < 2 {
        return Err(StockError::InsufficientHistory {
            records: records.len(),
        });
    }

    let xs: Vec<f64> = records
        .iter()
        .map(|r| (r.date - origin).num_days() as f64)
        .collect();
    let day_offset = (target - origin).num_days();
    let x = day_offset as f64;

    let mut values = [0.0_f64; 5];
    for (slot, field) in values.iter_mut().zip(Field::ALL) {
        let ys: Vec<f64> = records.iter().map(|r| field.value(r)).collect();
        let fit = LinearFit::ols(&xs, &ys).ok_or(StockError::InsufficientHistory {
            records: records.len(),
        })?;
        *slot = fit.eval(x);
    }

    Ok(Prediction {
        target,
        day_offset,
        open: values[0],
        high: values[1],
        low: values[2],
        close: values[3],
        volume: values[4].round() as i64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn rec(date: NaiveDate, close: f64, volume: u64) -> OhlcvRecord {
        OhlcvRecord {
            date,
            open: close - 1.0,
            high: close + 2.0,
            low: close - 2.0,
            close,
            volume,
        }
    }

    fn two_points() -> OhlcvSeries {
        OhlcvSeries::from_records(vec![rec(d(1), 100.0, 1000), rec(d(11), 110.0, 2000)])
    }

    #[test]
    fn interpolates_exactly_between_two_points() {
        let p = predict(&two_points(), d(6)).unwrap();
        assert_eq!(p.day_offset, 5);
        assert!((p.close - 105.0).abs() < 1e-9);
        assert!((p.open - 104.0).abs() < 1e-9);
        assert!((p.high - 107.0).abs() < 1e-9);
        assert!((p.low - 103.0).abs() < 1e-9);
        assert_eq!(p.volume, 1500);
    }

    #[test]
    fn extrapolates_beyond_range() {
        let p = predict(&two_points(), d(21)).unwrap();
        assert_eq!(p.day_offset, 20);
        assert!((p.close - 120.0).abs() < 1e-9);
        assert_eq!(p.volume, 3000);
    }

    #[test]
    fn target_before_series_is_allowed() {
        let series = OhlcvSeries::from_records(vec![rec(d(11), 100.0, 1000), rec(d(21), 110.0, 1000)]);
        let p = predict(&series, d(1)).unwrap();
        assert_eq!(p.day_offset, -10);
        assert!((p.close - 90.0).abs() < 1e-9);
    }

    #[test]
    fn volume_rounds_to_nearest() {
        let series = OhlcvSeries::from_records(vec![rec(d(1), 1.0, 0), rec(d(3), 1.0, 3)]);
        // midpoint volume = 1.5 -> 2
        assert_eq!(predict(&series, d(2)).unwrap().volume, 2);
    }

    #[test]
    fn fewer_than_two_records_is_insufficient() {
        let one = OhlcvSeries::from_records(vec![rec(d(1), 100.0, 1)]);
        assert!(matches!(
            predict(&one, d(5)),
            Err(StockError::InsufficientHistory { records: 1 })
        ));
        assert!(matches!(
            predict(&OhlcvSeries::empty(), d(5)),
            Err(StockError::InsufficientHistory { records: 0 })
        ));
    }

    #[test]
    fn least_squares_on_noisy_points() {
        // y = 2x + 1 with symmetric noise
        let xs = [0.0, 1.0, 2.0, 3.0];
        let ys = [1.5, 2.5, 5.5, 6.5];
        let fit = LinearFit::ols(&xs, &ys).unwrap();
        assert!((fit.slope - 1.8).abs() < 1e-9);
        assert!((fit.intercept - 1.3).abs() < 1e-9);
    }

    #[test]
    fn constant_x_is_degenerate() {
        assert!(LinearFit::ols(&[3.0, 3.0], &[1.0, 2.0]).is_none());
    }

    #[test]
    fn display_uses_two_decimals() {
        let p = predict(&two_points(), d(6)).unwrap();
        let text = p.display("\u{20b9}");
        assert!(text.contains("Close: \u{20b9}105.00"));
        assert!(text.contains("Volume: 1500"));
    }
}
