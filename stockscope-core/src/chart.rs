//! Chart rendering contract.
//!
//! The core hands a series to whatever renderer the front-end supplies. The
//! terminal UI draws candlesticks with a volume panel; the CLI has none.

use crate::domain::{OhlcvSeries, Period, Symbol};

/// Draws a candlestick chart of `series`.
///
/// `title` is the full chart title; `label_suffix` is appended to price axis
/// labels (e.g. `INR` gives `Price (INR)`). Renderers must not fail: a series
/// they cannot draw is shown as an empty chart.
pub trait ChartRenderer: Send + Sync {
    fn render(&self, series: &OhlcvSeries, title: &str, label_suffix: &str);
}

/// `{TICKER} Candlestick Chart ({period})`
pub fn chart_title(symbol: &Symbol, period: Period) -> String {
    format!("{} Candlestick Chart ({})", symbol.ticker, period.code())
}

/// `Price ({label})`
pub fn price_axis_label(label_suffix: &str) -> String {
    format!("Price ({label_suffix})")
}
