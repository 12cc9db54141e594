//! Relative fetch windows ("1 month", "6 months", ...).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "6mo")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "5y")]
    FiveYears,
}

impl Period {
    pub const ALL: [Period; 5] = [
        Period::OneDay,
        Period::OneMonth,
        Period::SixMonths,
        Period::OneYear,
        Period::FiveYears,
    ];

    /// The choices offered by the duration selector.
    pub const DURATIONS: [Period; 4] = [
        Period::OneMonth,
        Period::SixMonths,
        Period::OneYear,
        Period::FiveYears,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Period::OneDay => "1 day",
            Period::OneMonth => "1 month",
            Period::SixMonths => "6 months",
            Period::OneYear => "1 year",
            Period::FiveYears => "5 years",
        }
    }

    /// Provider range code, also the `Duration` column of stored rows.
    pub fn code(self) -> &'static str {
        match self {
            Period::OneDay => "1d",
            Period::OneMonth => "1mo",
            Period::SixMonths => "6mo",
            Period::OneYear => "1y",
            Period::FiveYears => "5y",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Period {
    type Err = String;

    /// Accepts either the label or the code, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Period::ALL
            .into_iter()
            .find(|p| p.label() == needle || p.code() == needle)
            .ok_or_else(|| {
                let valid: Vec<&str> = Period::ALL.iter().map(|p| p.code()).collect();
                format!("unknown period '{s}'. Valid: {}", valid.join(", "))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_labels_and_codes() {
        assert_eq!("6 months".parse::<Period>().unwrap(), Period::SixMonths);
        assert_eq!("6MO".parse::<Period>().unwrap(), Period::SixMonths);
        assert_eq!(" 1 Year ".parse::<Period>().unwrap(), Period::OneYear);
        assert_eq!("1d".parse::<Period>().unwrap(), Period::OneDay);
    }

    #[test]
    fn rejects_unknown() {
        let err = "2 weeks".parse::<Period>().unwrap_err();
        assert!(err.contains("5y"));
    }

    #[test]
    fn durations_exclude_single_day() {
        assert!(!Period::DURATIONS.contains(&Period::OneDay));
        assert_eq!(Period::DURATIONS.len(), 4);
    }

    #[test]
    fn serde_uses_codes() {
        let json = serde_json::to_string(&Period::FiveYears).unwrap();
        assert_eq!(json, "\"5y\"");
        let back: Period = serde_json::from_str("\"1mo\"").unwrap();
        assert_eq!(back, Period::OneMonth);
    }
}
