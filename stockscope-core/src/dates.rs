//! Calendar date validation for user-entered `YYYY-MM-DD` strings.

use chrono::NaiveDate;

use crate::error::StockError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` string into a real calendar date.
///
/// Surrounding whitespace is ignored. Anything that is not a valid date
/// (wrong separator, non-numeric parts, Feb 30, trailing text) is
/// `InvalidDateFormat`.
pub fn parse_date(input: &str) -> Result<NaiveDate, StockError> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).map_err(|_| {
        StockError::InvalidDateFormat {
            input: input.to_string(),
        }
    })
}

pub fn is_valid_date(input: &str) -> bool {
    parse_date(input).is_ok()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
