//! OHLCV records and date-ordered series.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading day's summary for a single instrument.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OhlcvRecord {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl OhlcvRecord {
    /// True when the close is at or above the open.
    pub fn is_up(&self) -> bool {
        self.close >= self.open
    }

    /// Basic sanity check: high bounds the day from above, low from below.
    pub fn is_sane(&self) -> bool {
        let finite = [self.open, self.high, self.low, self.close]
            .iter()
            .all(|v| v.is_finite());
        finite
            && self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
    }
}

/// Records in ascending date order, at most one per date.
///
/// An empty series is a legal value: providers use it to say "no rows for this
/// window". Consumers that need data check [`OhlcvSeries::is_empty`] first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OhlcvSeries {
    records: Vec<OhlcvRecord>,
}

impl OhlcvSeries {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a series from records in any order.
    ///
    /// Records are sorted by date; when two share a date the later one in the
    /// input wins.
    pub fn from_records(mut records: Vec<OhlcvRecord>) -> Self {
        // Stable sort keeps input order among equal dates, so the last one is the newest.
        records.sort_by_key(|r| r.date);
        let mut deduped: Vec<OhlcvRecord> = Vec::with_capacity(records.len());
        for rec in records {
            match deduped.last_mut() {
                Some(last) if last.date == rec.date => *last = rec,
                _ => deduped.push(rec),
            }
        }
        Self { records: deduped }
    }

    pub fn records(&self) -> &[OhlcvRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OhlcvRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first(&self) -> Option<&OhlcvRecord> {
        self.records.first()
    }

    pub fn last(&self) -> Option<&OhlcvRecord> {
        self.records.last()
    }

    /// Keep only records with `start <= date < end`.
    pub fn window(&self, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            records: self
                .records
                .iter()
                .filter(|r| r.date >= start && r.date < end)
                .copied()
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a OhlcvSeries {
    type Item = &'a OhlcvRecord;
    type IntoIter = std::slice::Iter<'a, OhlcvRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(day: u32, close: f64) -> OhlcvRecord {
        OhlcvRecord {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            open: 100.0,
            high: 105.0,
            low: 98.0,
            close,
            volume: 50_000,
        }
    }

    #[test]
    fn sorts_ascending() {
        let series = OhlcvSeries::from_records(vec![rec(5, 1.0), rec(2, 2.0), rec(3, 3.0)]);
        let days: Vec<u32> = series
            .iter()
            .map(|r| chrono::Datelike::day(&r.date))
            .collect();
        assert_eq!(days, vec![2, 3, 5]);
    }

    #[test]
    fn later_duplicate_replaces_earlier() {
        let series = OhlcvSeries::from_records(vec![rec(2, 101.0), rec(2, 102.0)]);
        assert_eq!(series.len(), 1);
        assert_eq!(series.first().unwrap().close, 102.0);
    }

    #[test]
    fn window_is_half_open() {
        let series = OhlcvSeries::from_records(vec![rec(2, 1.0), rec(3, 2.0), rec(4, 3.0)]);
        let w = series.window(
            NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 4).unwrap(),
        );
        assert_eq!(w.len(), 1);
        assert_eq!(w.first().unwrap().close, 2.0);
    }

    #[test]
    fn record_sanity() {
        assert!(rec(2, 103.0).is_sane());
        let mut bad = rec(2, 103.0);
        bad.high = 97.0;
        assert!(!bad.is_sane());
        bad = rec(2, f64::NAN);
        assert!(!bad.is_sane());
    }

    #[test]
    fn up_day_detection() {
        assert!(rec(2, 101.0).is_up());
        assert!(!rec(2, 99.0).is_up());
    }
}
