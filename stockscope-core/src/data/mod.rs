//! Market data access: provider trait, Yahoo client, fixtures, ticker lists

pub mod memory;
pub mod provider;
pub mod ticker_list;
pub mod yahoo;

pub use memory::InMemoryProvider;
pub use provider::{DataError, MarketDataProvider};
pub use ticker_list::{RemoteTickerList, TickerGroup, TickerList, TickerSource};
pub use yahoo::YahooProvider;
