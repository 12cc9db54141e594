//! StockScope TUI: form-driven terminal interface for equity reports.
//!
//! Layout:
//! - Left: tickers, exchanges, date, duration and the action key list
//! - Right: Notifications, Chart or Help panel
//! - Bottom: status bar
//!
//! Network and store work runs on a background worker thread; the UI thread
//! only renders and handles keys.

mod app;
mod input;
mod persistence;
mod theme;
mod ui;
mod worker;

use std::fs::File;
use std::io::{self, stdout};
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stockscope_core::data::{RemoteTickerList, YahooProvider};
use stockscope_core::store::ReportStore;
use stockscope_core::{AppConfig, DispatchSettings};

use crate::app::AppState;
use crate::worker::WorkerContext;

#[derive(Parser)]
#[command(
    name = "stockscope-tui",
    about = "StockScope terminal UI: equity price reports, charts and trend prediction"
)]
struct Cli {
    /// Path to a TOML config file. Defaults to ./stockscope.toml if present.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    // Paths
    let state_dir = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("stockscope");
    let state_path = state_dir.join("state.json");
    init_tracing(&state_dir);

    let config = AppConfig::discover(cli.config.as_deref()).context("loading config")?;
    tracing::info!(store = %config.store_path.display(), "starting stockscope-tui");

    // Load persisted state
    let persisted = persistence::load(&state_path);

    // Worker context
    let ctx = WorkerContext {
        provider: Box::new(YahooProvider::new(&config.provider)?),
        tickers: Box::new(RemoteTickerList::new(
            config.bulk.ticker_list_url.clone(),
            &config.provider,
        )?),
        store: ReportStore::new(config.store_path.clone()),
        settings: DispatchSettings::from_config(&config),
    };

    // Worker channels
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();
    let cancel = Arc::new(AtomicBool::new(false));

    let worker_handle = worker::spawn_worker(ctx, cmd_rx, resp_tx, cancel.clone())
        .context("spawning worker thread")?;

    // Build app state
    let mut app = AppState::new(
        cmd_tx,
        resp_rx,
        cancel,
        config.store_path.clone(),
    );
    persistence::apply(&mut app, persisted);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    // Save state before exit
    let persisted = persistence::extract(&app);
    if let Err(e) = persistence::save(&state_path, &persisted) {
        tracing::warn!(error = %e, "failed to save state");
    }

    // Stop the worker, restore the terminal, then wait for the current request.
    app.shutdown_worker();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    let _ = worker_handle.join();

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        // 1. Render
        terminal.draw(|f| ui::draw(f, app))?;

        // 2. Drain worker responses (non-blocking)
        while let Ok(resp) = app.worker_rx.try_recv() {
            app.apply_response(resp);
        }

        // 3. Poll for input events (50ms timeout for ~20 FPS tick)
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        if !app.running {
            break;
        }
    }
    Ok(())
}

/// Log to `stockscope.log` next to the persisted state; the terminal belongs
/// to the UI. Logging is skipped if the file cannot be created.
fn init_tracing(dir: &Path) {
    let file = std::fs::create_dir_all(dir)
        .and_then(|_| File::create(dir.join("stockscope.log")))
        .ok();
    let layer = file.map(|f| {
        tracing_subscriber::fmt::layer()
            .with_writer(Mutex::new(f))
            .with_ansi(false)
    });
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stockscope=info".into()),
        )
        .with(layer)
        .init();
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
    fn config_flag_is_optional() {
        let cli = Cli::try_parse_from(["stockscope-tui"]).unwrap();
        assert_eq!(cli.config, None);

        let cli = Cli::try_parse_from(["stockscope-tui", "--config", "a.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("a.toml")));
    }

    #[test]
    fn bad_arguments_are_rejected() {
        assert!(Cli::try_parse_from(["stockscope-tui", "--confg", "x"]).is_err());
        assert!(Cli::try_parse_from(["stockscope-tui", "--config"]).is_err());
    }
}
