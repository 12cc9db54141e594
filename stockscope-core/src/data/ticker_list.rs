//! Ticker lists for bulk fetches: column-grouped CSV documents.
//!
//! The document has a header row; each column is one group of raw ticker
//! symbols. Blank cells are skipped, so columns may have different lengths.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::provider::DataError;
use crate::config::ProviderConfig;

/// One column of the ticker list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerGroup {
    pub name: String,
    pub tickers: Vec<String>,
}

/// The complete ticker list, groups in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerList {
    pub groups: Vec<TickerGroup>,
}

impl TickerList {
    /// Parse a ticker list from CSV text.
    pub fn from_csv_str(content: &str) -> Result<Self, DataError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| DataError::ResponseFormatChanged(format!("ticker list header: {e}")))?
            .clone();

        let mut groups: Vec<TickerGroup> = headers
            .iter()
            .map(|name| TickerGroup {
                name: name.to_string(),
                tickers: Vec::new(),
            })
            .collect();

        for record in reader.records() {
            let record = record
                .map_err(|e| DataError::ResponseFormatChanged(format!("ticker list row: {e}")))?;
            for (col, cell) in record.iter().enumerate() {
                if cell.is_empty() {
                    continue;
                }
                // Rows wider than the header get unnamed groups by position.
                while groups.len() <= col {
                    groups.push(TickerGroup {
                        name: format!("column {}", groups.len() + 1),
                        tickers: Vec::new(),
                    });
                }
                groups[col].tickers.push(cell.to_string());
            }
        }

        Ok(Self { groups })
    }

    /// All tickers, column by column.
    pub fn all_tickers(&self) -> Vec<&str> {
        self.groups
            .iter()
            .flat_map(|g| g.tickers.iter().map(|t| t.as_str()))
            .collect()
    }

    /// Total number of tickers.
    pub fn ticker_count(&self) -> usize {
        self.groups.iter().map(|g| g.tickers.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.ticker_count() == 0
    }
}

/// Where bulk mode gets its tickers from.
pub trait TickerSource: Send + Sync {
    fn load(&self) -> Result<TickerList, DataError>;
}

/// A fixed list is its own source.
impl TickerSource for TickerList {
    fn load(&self) -> Result<TickerList, DataError> {
        Ok(self.clone())
    }
}

/// Ticker list downloaded from a URL on every load.
pub struct RemoteTickerList {
    client: reqwest::blocking::Client,
    url: String,
}

impl RemoteTickerList {
    pub fn new(url: impl Into<String>, config: &ProviderConfig) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout_secs.map(Duration::from_secs))
            .build()
            .map_err(|e| DataError::ClientBuild(e.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl TickerSource for RemoteTickerList {
    fn load(&self) -> Result<TickerList, DataError> {
        tracing::debug!(url = %self.url, "downloading ticker list");
        let resp = self
            .client
            .get(&self.url)
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(DataError::HttpStatus {
                status: status.as_u16(),
                symbol: "ticker list".into(),
            });
        }
        let body = resp
            .text()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;
        TickerList::from_csv_str(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: &str = "Large Cap,Mid Cap\nINFY,PERSISTENT\nTCS,\n,COFORGE\nWIPRO,\n";

    #[test]
    fn groups_follow_columns() {
        let list = TickerList::from_csv_str(SHEET).unwrap();
        assert_eq!(list.groups.len(), 2);
        assert_eq!(list.groups[0].name, "Large Cap");
        assert_eq!(list.groups[0].tickers, vec!["INFY", "TCS", "WIPRO"]);
        assert_eq!(list.groups[1].tickers, vec!["PERSISTENT", "COFORGE"]);
    }

    #[test]
    fn blank_cells_skipped_and_order_kept() {
        let list = TickerList::from_csv_str(SHEET).unwrap();
        assert_eq!(
            list.all_tickers(),
            vec!["INFY", "TCS", "WIPRO", "PERSISTENT", "COFORGE"]
        );
        assert_eq!(list.ticker_count(), 5);
    }

    #[test]
    fn cells_are_trimmed() {
        let list = TickerList::from_csv_str("A\n  INFY  \n   \n").unwrap();
        assert_eq!(list.all_tickers(), vec!["INFY"]);
    }

    #[test]
    fn header_only_is_empty() {
        let list = TickerList::from_csv_str("Large Cap,Mid Cap\n").unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn static_list_is_a_source() {
        let list = TickerList::from_csv_str(SHEET).unwrap();
        let loaded = TickerSource::load(&list).unwrap();
        assert_eq!(loaded, list);
    }

    #[test]
    fn cells_beyond_header_keep_their_column() {
        let list = TickerList::from_csv_str("Large Cap\nINFY,,,WIPRO\nTCS,,HDFC\n").unwrap();
        assert_eq!(list.groups.len(), 4);
        assert_eq!(list.groups[0].tickers, vec!["INFY", "TCS"]);
        assert!(list.groups[1].tickers.is_empty());
        assert_eq!(list.groups[2].name, "column 3");
        assert_eq!(list.groups[2].tickers, vec!["HDFC"]);
        assert_eq!(list.groups[3].name, "column 4");
        assert_eq!(list.groups[3].tickers, vec!["WIPRO"]);
    }
}
