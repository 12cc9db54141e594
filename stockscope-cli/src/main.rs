//! StockScope CLI: fetch, report, predict and review stock data.
//!
//! Commands:
//! - `daily`: latest session prices, saved to the report store
//! - `report`: high/low over a duration, saved to the report store
//! - `date`: prices on a specific day, saved to the report store
//! - `predict`: linear trend extrapolation to a target date (not saved)
//! - `bulk`: date report for every ticker in the hosted ticker list
//! - `history`: print the report store

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use stockscope_core::data::{RemoteTickerList, YahooProvider};
use stockscope_core::dates::parse_date;
use stockscope_core::domain::{Period, REPORT_HEADER};
use stockscope_core::notify::StdoutNotifier;
use stockscope_core::store::ReportStore;
use stockscope_core::{
    Action, ActionKind, AppConfig, BatchSummary, DispatchSettings, Dispatcher, FormInput,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "stockscope",
    about = "StockScope CLI: equity price reports and trend prediction"
)]
struct Cli {
    /// Path to a TOML config file. Defaults to ./stockscope.toml if present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Report store path (overrides the config file).
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SymbolArgs {
    /// Comma-separated tickers (e.g., INFY,TCS,WIPRO).
    #[arg(long, short)]
    tickers: String,

    /// Comma-separated exchange suffixes, one per ticker (e.g., NS,NS,BO).
    #[arg(long, short)]
    exchanges: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the latest daily prices and save them.
    Daily {
        #[command(flatten)]
        symbols: SymbolArgs,
    },
    /// High/low report over a duration (1mo, 6mo, 1y, 5y), saved to the store.
    Report {
        #[command(flatten)]
        symbols: SymbolArgs,

        /// Duration code or label.
        #[arg(long, short, value_parser = parse_duration)]
        duration: Period,
    },
    /// Prices on a specific date (YYYY-MM-DD), saved to the store.
    Date {
        #[command(flatten)]
        symbols: SymbolArgs,

        #[arg(long, short)]
        date: String,
    },
    /// Predict prices on a target date (YYYY-MM-DD) from a linear trend.
    Predict {
        #[command(flatten)]
        symbols: SymbolArgs,

        #[arg(long, short)]
        date: String,
    },
    /// Date report for every ticker in the hosted ticker list.
    Bulk {
        /// Date (YYYY-MM-DD).
        #[arg(long, short)]
        date: String,

        /// Exchange suffix applied to every ticker. Defaults to the config value.
        #[arg(long, short)]
        exchange: Option<String>,

        /// Ticker list CSV URL. Defaults to the config value.
        #[arg(long)]
        url: Option<String>,
    },
    /// Print the report store.
    History {
        /// Only show the last N rows.
        #[arg(long)]
        limit: Option<usize>,
    },
}

/// A period offered by the duration selector (1 day is the `daily` command).
fn parse_duration(s: &str) -> Result<Period, String> {
    let period: Period = s.parse()?;
    if Period::DURATIONS.contains(&period) {
        Ok(period)
    } else {
        let valid: Vec<&str> = Period::DURATIONS.iter().map(|p| p.code()).collect();
        Err(format!(
            "'{s}' is not a report duration. Valid: {}",
            valid.join(", ")
        ))
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = AppConfig::discover(cli.config.as_deref())?;
    if let Some(store) = cli.store {
        config.store_path = store;
    }

    match cli.command {
        Commands::Daily { symbols } => {
            run_form(&config, ActionKind::FetchDaily, symbols.into_form(None, ""))
        }
        Commands::Report { symbols, duration } => run_form(
            &config,
            ActionKind::DurationReport,
            symbols.into_form(Some(duration), ""),
        ),
        Commands::Date { symbols, date } => run_form(
            &config,
            ActionKind::DateReport,
            symbols.into_form(None, &date),
        ),
        Commands::Predict { symbols, date } => run_form(
            &config,
            ActionKind::Predict,
            symbols.into_form(None, &date),
        ),
        Commands::Bulk {
            date,
            exchange,
            url,
        } => run_bulk(&config, &date, exchange, url),
        Commands::History { limit } => run_history(&config, limit),
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stockscope=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

impl SymbolArgs {
    fn into_form(self, duration: Option<Period>, date: &str) -> FormInput {
        FormInput {
            tickers: self.tickers,
            exchanges: self.exchanges,
            date: date.to_string(),
            duration,
        }
    }
}

fn run_form(config: &AppConfig, kind: ActionKind, form: FormInput) -> Result<()> {
    let action = Action::from_form(kind, &form)?;

    let provider = YahooProvider::new(&config.provider)?;
    let store = ReportStore::new(&config.store_path);
    let notifier = StdoutNotifier;
    let dispatcher = Dispatcher::new(
        &provider,
        &store,
        &notifier,
        DispatchSettings::from_config(config),
    );

    let summary = dispatcher.run(&action)?;
    finish(&summary)
}

fn run_bulk(
    config: &AppConfig,
    date: &str,
    exchange: Option<String>,
    url: Option<String>,
) -> Result<()> {
    let action = Action::Bulk {
        exchange,
        date: parse_date(date)?,
    };
    let url = url.unwrap_or_else(|| config.bulk.ticker_list_url.clone());

    let provider = YahooProvider::new(&config.provider)?;
    let tickers = RemoteTickerList::new(url, &config.provider)?;
    let store = ReportStore::new(&config.store_path);
    let notifier = StdoutNotifier;
    let dispatcher = Dispatcher::new(
        &provider,
        &store,
        &notifier,
        DispatchSettings::from_config(config),
    )
    .with_ticker_source(&tickers);

    let summary = dispatcher.run(&action)?;
    finish(&summary)
}

fn finish(summary: &BatchSummary) -> Result<()> {
    if summary.total > 1 {
        println!();
        println!(
            "{} of {} tickers succeeded",
            summary.succeeded, summary.total
        );
    }
    if !summary.all_succeeded() {
        for (sym, err) in &summary.errors {
            eprintln!("Error for {sym}: {err}");
        }
        std::process::exit(1);
    }
    Ok(())
}

fn run_history(config: &AppConfig, limit: Option<usize>) -> Result<()> {
    if limit == Some(0) {
        bail!("--limit must be at least 1");
    }
    let store = ReportStore::new(&config.store_path);
    if !store.path().exists() {
        println!("Report store does not exist: {}", store.path().display());
        return Ok(());
    }

    let rows = store.read_rows()?;
    if rows.is_empty() {
        println!("Report store is empty: {}", store.path().display());
        return Ok(());
    }
    let skip = limit.map_or(0, |n| rows.len().saturating_sub(n));

    println!("Store: {}", store.path().display());
    println!("Rows: {}", rows.len());
    println!();
    println!(
        "{:<10} {:<8} {:<11} {:>12} {:>12} {:>12} {:>12} {:>12}",
        REPORT_HEADER[0],
        REPORT_HEADER[1],
        REPORT_HEADER[2],
        "Open",
        "High",
        "Low",
        "Close",
        REPORT_HEADER[7]
    );
    println!("{}", "-".repeat(96));
    for row in rows.iter().skip(skip) {
        let cell = |i: usize| row.get(i).map(String::as_str).unwrap_or("");
        println!(
            "{:<10} {:<8} {:<11} {:>12} {:>12} {:>12} {:>12} {:>12}",
            cell(0),
            cell(1),
            cell(2),
            short_number(cell(3)),
            short_number(cell(4)),
            short_number(cell(5)),
            short_number(cell(6)),
            cell(7)
        );
    }

    Ok(())
}

/// Prices are stored at full precision; show two decimals.
fn short_number(cell: &str) -> String {
    cell.parse::<f64>()
        .map(|v| format!("{v:.2}"))
        .unwrap_or_else(|_| cell.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn report_parses_duration_code() {
        let cli = Cli::try_parse_from([
            "stockscope",
            "report",
            "--tickers",
            "INFY",
            "--exchanges",
            "NS",
            "--duration",
            "6mo",
        ])
        .unwrap();
        let Commands::Report { duration, .. } = cli.command else {
            panic!("expected report");
        };
        assert_eq!(duration, Period::SixMonths);
    }

    #[test]
    fn bad_duration_is_rejected() {
        assert!(Cli::try_parse_from([
            "stockscope",
            "report",
            "-t",
            "INFY",
            "-e",
            "NS",
            "-d",
            "2w",
        ])
        .is_err());
    }

    #[test]
    fn one_day_is_not_a_report_duration() {
        assert!(Cli::try_parse_from([
            "stockscope",
            "report",
            "-t",
            "INFY",
            "-e",
            "NS",
            "-d",
            "1d",
        ])
        .is_err());
        assert_eq!(parse_duration("5 years"), Ok(Period::FiveYears));
    }

    #[test]
    fn short_number_formats_prices_only() {
        assert_eq!(short_number("1520.599975"), "1520.60");
        assert_eq!(short_number("-"), "-");
    }
}
