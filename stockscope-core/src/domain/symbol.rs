//! Symbols and zip-paired ticker/exchange batches.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::StockError;

/// A tradable instrument: ticker plus exchange suffix (`INFY` + `NS`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol {
    pub ticker: String,
    pub exchange: String,
}

impl Symbol {
    pub fn new(ticker: impl AsRef<str>, exchange: impl AsRef<str>) -> Self {
        Self {
            ticker: normalize(ticker.as_ref()),
            exchange: normalize(exchange.as_ref()),
        }
    }

    /// Provider lookup string, `TICKER.EXCHANGE`. A blank exchange yields the bare ticker.
    pub fn provider_symbol(&self) -> String {
        if self.exchange.is_empty() {
            self.ticker.clone()
        } else {
            format!("{}.{}", self.ticker, self.exchange)
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.provider_symbol())
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_uppercase()
}

/// Split a comma-separated list, trimming entries and dropping blanks.
pub fn split_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(normalize)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Ordered symbols built by pairing the n-th ticker with the n-th exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchInput {
    pub symbols: Vec<Symbol>,
}

impl BatchInput {
    /// Parse the two comma-separated lists.
    ///
    /// Lists of different lengths are rejected, never truncated.
    pub fn parse(tickers: &str, exchanges: &str) -> Result<Self, StockError> {
        let tickers = split_list(tickers);
        let exchanges = split_list(exchanges);

        if tickers.is_empty() {
            return Err(StockError::MissingInput("enter at least one ticker"));
        }
        if tickers.len() != exchanges.len() {
            return Err(StockError::MismatchedInputLengths {
                tickers: tickers.len(),
                exchanges: exchanges.len(),
            });
        }

        let symbols = tickers
            .iter()
            .zip(exchanges.iter())
            .map(|(t, e)| Symbol::new(t, e))
            .collect();
        Ok(Self { symbols })
    }

    /// Every ticker under one exchange suffix (bulk mode).
    pub fn with_exchange<I, S>(tickers: I, exchange: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let symbols = tickers
            .into_iter()
            .map(|t| Symbol::new(t, exchange))
            .filter(|s| !s.ticker.is_empty())
            .collect();
        Self { symbols }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_symbol_joins_with_dot() {
        let s = Symbol::new(" infy ", "ns");
        assert_eq!(s.provider_symbol(), "INFY.NS");
        assert_eq!(s.to_string(), "INFY.NS");
    }

    #[test]
    fn blank_exchange_gives_bare_ticker() {
        assert_eq!(Symbol::new("AAPL", "").provider_symbol(), "AAPL");
    }

    #[test]
    fn pairs_in_order() {
        let batch = BatchInput::parse("INFY, TCS,WIPRO", "NS,BO , NS").unwrap();
        assert_eq!(batch.len(), 3);
        assert_eq!(batch.symbols[1], Symbol::new("TCS", "BO"));
        assert_eq!(batch.symbols[2].provider_symbol(), "WIPRO.NS");
    }

    #[test]
    fn mismatched_lengths_rejected() {
        match BatchInput::parse("INFY,TCS,WIPRO", "NS,BO") {
            Err(StockError::MismatchedInputLengths { tickers, exchanges }) => {
                assert_eq!(tickers, 3);
                assert_eq!(exchanges, 2);
            }
            other => panic!("expected MismatchedInputLengths, got {other:?}"),
        }
    }

    #[test]
    fn empty_ticker_list_rejected() {
        assert!(matches!(
            BatchInput::parse(" , ", "NS"),
            Err(StockError::MissingInput(_))
        ));
    }

    #[test]
    fn bulk_batch_skips_blank_tickers() {
        let batch = BatchInput::with_exchange(["INFY", "  ", "tcs"], "NS");
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.symbols[1].provider_symbol(), "TCS.NS");
    }
}
