//! Background worker thread: every network request and store write runs here.
//!
//! Communication with the TUI main thread is via `mpsc` channels. The worker
//! owns the provider, the ticker source and the report store; the main thread
//! only sends validated actions and sets the shared cancel flag.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use stockscope_core::chart::ChartRenderer;
use stockscope_core::data::{MarketDataProvider, TickerSource};
use stockscope_core::domain::{OhlcvSeries, Symbol};
use stockscope_core::store::ReportStore;
use stockscope_core::{
    Action, ActionKind, DispatchSettings, Dispatcher, Notification, Notifier,
};

/// Commands sent from the TUI to the worker.
#[derive(Debug)]
pub enum WorkerCommand {
    Run(Action),
    Shutdown,
}

/// A chart handed over by the pipeline, ready to draw.
#[derive(Debug, Clone)]
pub struct ChartView {
    pub title: String,
    pub label_suffix: String,
    pub series: OhlcvSeries,
}

/// Responses sent from the worker back to the TUI.
#[derive(Debug, Clone)]
pub enum WorkerResponse {
    SymbolStarted {
        symbol: String,
        index: usize,
        total: usize,
    },
    Notice(Notification),
    Chart(ChartView),
    BatchDone {
        kind: ActionKind,
        total: usize,
        succeeded: usize,
        failed: usize,
        skipped: usize,
    },
    /// The batch could not start (e.g. the ticker list was unavailable).
    BatchFailed {
        kind: ActionKind,
        notice: Notification,
    },
}

/// Everything the worker needs to run actions.
pub struct WorkerContext {
    pub provider: Box<dyn MarketDataProvider>,
    pub tickers: Box<dyn TickerSource>,
    pub store: ReportStore,
    pub settings: DispatchSettings,
}

/// Spawn the background worker thread.
pub fn spawn_worker(
    ctx: WorkerContext,
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
    cancel: Arc<AtomicBool>,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("stockscope-worker".into())
        .spawn(move || {
            worker_loop(ctx, rx, tx, cancel);
        })
}

fn worker_loop(
    ctx: WorkerContext,
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
    cancel: Arc<AtomicBool>,
) {
    loop {
        match rx.recv() {
            Ok(WorkerCommand::Shutdown) | Err(_) => break,
            Ok(WorkerCommand::Run(action)) => {
                cancel.store(false, Ordering::Relaxed);
                run_action(&ctx, &action, &tx, &cancel);
            }
        }
    }
    tracing::debug!("worker stopped");
}

fn run_action(
    ctx: &WorkerContext,
    action: &Action,
    tx: &Sender<WorkerResponse>,
    cancel: &AtomicBool,
) {
    let notifier = ChannelNotifier { tx: tx.clone() };
    let chart = ChannelChart { tx: tx.clone() };
    let dispatcher = Dispatcher::new(
        ctx.provider.as_ref(),
        &ctx.store,
        &notifier,
        ctx.settings.clone(),
    )
    .with_chart(&chart)
    .with_ticker_source(ctx.tickers.as_ref())
    .with_cancel(cancel);

    let kind = action.kind();
    let response = match dispatcher.run(action) {
        Ok(summary) => WorkerResponse::BatchDone {
            kind,
            total: summary.total,
            succeeded: summary.succeeded,
            failed: summary.failed,
            skipped: summary.skipped,
        },
        Err(err) => {
            tracing::warn!(action = kind.label(), error = %err, "action could not start");
            WorkerResponse::BatchFailed {
                kind,
                notice: Notification::from_error(&err),
            }
        }
    };
    let _ = tx.send(response);
}

/// Notifier that forwards everything through the response channel.
struct ChannelNotifier {
    tx: Sender<WorkerResponse>,
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: Notification) {
        let _ = self.tx.send(WorkerResponse::Notice(notification));
    }

    fn on_symbol_start(&self, symbol: &Symbol, index: usize, total: usize) {
        let _ = self.tx.send(WorkerResponse::SymbolStarted {
            symbol: symbol.provider_symbol(),
            index,
            total,
        });
    }
}

/// Chart renderer that ships the series to the main thread for drawing.
struct ChannelChart {
    tx: Sender<WorkerResponse>,
}

impl ChartRenderer for ChannelChart {
    fn render(&self, series: &OhlcvSeries, title: &str, label_suffix: &str) {
        let _ = self.tx.send(WorkerResponse::Chart(ChartView {
            title: title.to_string(),
            label_suffix: label_suffix.to_string(),
            series: series.clone(),
        }));
    }
}
