//! Application state: single-owner, main-thread only.
//!
//! All TUI state lives here. The worker thread communicates via channels.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use stockscope_core::domain::Period;
use stockscope_core::{Action, ActionKind, FormInput, Notification};

use crate::worker::{ChartView, WorkerCommand, WorkerResponse};

/// Notification log capacity; older entries are dropped.
pub const LOG_CAPACITY: usize = 200;

/// Which right-hand panel is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Panel {
    Notifications,
    Chart,
    Help,
}

impl Panel {
    pub const ALL: [Panel; 3] = [Panel::Notifications, Panel::Chart, Panel::Help];

    pub fn index(self) -> usize {
        match self {
            Panel::Notifications => 0,
            Panel::Chart => 1,
            Panel::Help => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Panel::Notifications => "Notifications",
            Panel::Chart => "Chart",
            Panel::Help => "Help",
        }
    }

    pub fn next(self) -> Panel {
        Panel::ALL[(self.index() + 1) % Panel::ALL.len()]
    }
}

/// Form inputs, in focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Tickers,
    Exchanges,
    Date,
    Duration,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::Tickers,
        FormField::Exchanges,
        FormField::Date,
        FormField::Duration,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Tickers => "Company Tickers (comma-separated, e.g., INFY,TCS,WIPRO)",
            FormField::Exchanges => "Exchanges (comma-separated, e.g., NS,BSE)",
            FormField::Date => "Date (YYYY-MM-DD)",
            FormField::Duration => "Duration",
        }
    }
}

/// Where keyboard input goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Field(FormField),
    Panel,
}

impl Focus {
    /// Tab order: the four fields, then the panel.
    pub fn next(self) -> Focus {
        match self {
            Focus::Field(FormField::Tickers) => Focus::Field(FormField::Exchanges),
            Focus::Field(FormField::Exchanges) => Focus::Field(FormField::Date),
            Focus::Field(FormField::Date) => Focus::Field(FormField::Duration),
            Focus::Field(FormField::Duration) => Focus::Panel,
            Focus::Panel => Focus::Field(FormField::Tickers),
        }
    }

    pub fn prev(self) -> Focus {
        match self {
            Focus::Field(FormField::Tickers) => Focus::Panel,
            Focus::Field(FormField::Exchanges) => Focus::Field(FormField::Tickers),
            Focus::Field(FormField::Date) => Focus::Field(FormField::Exchanges),
            Focus::Field(FormField::Duration) => Focus::Field(FormField::Date),
            Focus::Panel => Focus::Field(FormField::Duration),
        }
    }
}

/// Raw form contents plus the duration selector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub tickers: String,
    pub exchanges: String,
    pub date: String,
    /// Index into [`Period::DURATIONS`]; `None` until the user picks one.
    pub duration_idx: Option<usize>,
}

impl FormState {
    pub fn duration(&self) -> Option<Period> {
        self.duration_idx
            .and_then(|i| Period::DURATIONS.get(i).copied())
    }

    pub fn set_duration(&mut self, period: Option<Period>) {
        self.duration_idx = period.and_then(|p| Period::DURATIONS.iter().position(|d| *d == p));
    }

    /// Step the selector; stepping past either end wraps.
    pub fn cycle_duration(&mut self, forward: bool) {
        let n = Period::DURATIONS.len();
        self.duration_idx = Some(match (self.duration_idx, forward) {
            (None, true) => 0,
            (None, false) => n - 1,
            (Some(i), true) => (i + 1) % n,
            (Some(i), false) => (i + n - 1) % n,
        });
    }

    pub fn text_mut(&mut self, field: FormField) -> Option<&mut String> {
        match field {
            FormField::Tickers => Some(&mut self.tickers),
            FormField::Exchanges => Some(&mut self.exchanges),
            FormField::Date => Some(&mut self.date),
            FormField::Duration => None,
        }
    }

    pub fn to_input(&self) -> FormInput {
        FormInput {
            tickers: self.tickers.clone(),
            exchanges: self.exchanges.clone(),
            date: self.date.clone(),
            duration: self.duration(),
        }
    }
}

/// A notification with the time it arrived.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: NaiveDateTime,
    pub notification: Notification,
}

/// Charts received during the current session.
#[derive(Debug, Clone, Default)]
pub struct ChartPanelState {
    pub views: Vec<ChartView>,
    pub selected: usize,
}

impl ChartPanelState {
    pub fn current(&self) -> Option<&ChartView> {
        self.views.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if !self.views.is_empty() {
            self.selected = (self.selected + 1) % self.views.len();
        }
    }

    pub fn select_prev(&mut self) {
        if !self.views.is_empty() {
            self.selected = (self.selected + self.views.len() - 1) % self.views.len();
        }
    }
}

/// The action the worker is running.
#[derive(Debug, Clone)]
pub struct Progress {
    pub kind: ActionKind,
    pub current: Option<String>,
    pub index: usize,
    pub total: usize,
    pub cancel_requested: bool,
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// Top-level application state.
pub struct AppState {
    // Navigation
    pub focus: Focus,
    pub active_panel: Panel,
    pub running: bool,

    // Panel states
    pub form: FormState,
    pub log: VecDeque<LogEntry>,
    pub log_scroll: u16,
    pub chart: ChartPanelState,
    pub progress: Option<Progress>,

    // Worker communication
    pub worker_tx: Sender<WorkerCommand>,
    pub worker_rx: Receiver<WorkerResponse>,
    pub cancel: Arc<AtomicBool>,

    // Cross-cutting
    pub status_message: Option<(String, StatusLevel)>,
    pub store_path: PathBuf,
}

impl AppState {
    pub fn new(
        worker_tx: Sender<WorkerCommand>,
        worker_rx: Receiver<WorkerResponse>,
        cancel: Arc<AtomicBool>,
        store_path: PathBuf,
    ) -> Self {
        Self {
            focus: Focus::Field(FormField::Tickers),
            active_panel: Panel::Notifications,
            running: true,
            form: FormState::default(),
            log: VecDeque::with_capacity(LOG_CAPACITY),
            log_scroll: 0,
            chart: ChartPanelState::default(),
            progress: None,
            worker_tx,
            worker_rx,
            cancel,
            status_message: None,
            store_path,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.progress.is_some()
    }

    /// Validate the form for `kind` and hand the action to the worker.
    pub fn submit(&mut self, kind: ActionKind) {
        if self.is_busy() {
            self.set_warning("An action is already running (Esc to cancel)");
            return;
        }
        let action = match Action::from_form(kind, &self.form.to_input()) {
            Ok(action) => action,
            Err(err) => {
                self.push_notification(Notification::from_error(&err));
                return;
            }
        };
        self.start(action);
    }

    fn start(&mut self, action: Action) {
        let kind = action.kind();
        if kind == ActionKind::Chart {
            self.chart = ChartPanelState::default();
        }
        if self.worker_tx.send(WorkerCommand::Run(action)).is_err() {
            self.set_error("Worker thread is not running");
            return;
        }
        tracing::debug!(action = kind.label(), "action submitted");
        self.progress = Some(Progress {
            kind,
            current: None,
            index: 0,
            total: 0,
            cancel_requested: false,
        });
        self.set_status(format!("{}...", kind.label()));
    }

    /// Ask the worker to stop before its next symbol.
    pub fn request_cancel(&mut self) {
        let Some(progress) = self.progress.as_mut() else {
            return;
        };
        progress.cancel_requested = true;
        self.cancel.store(true, Ordering::Relaxed);
        self.set_warning("Cancelling after the current ticker...");
    }

    /// Stop any running batch and tell the worker to exit. Safe to call when idle.
    pub fn shutdown_worker(&self) {
        self.cancel.store(true, Ordering::SeqCst);
        let _ = self.worker_tx.send(WorkerCommand::Shutdown);
    }

    /// Apply one response from the worker.
    pub fn apply_response(&mut self, resp: WorkerResponse) {
        match resp {
            WorkerResponse::SymbolStarted {
                symbol,
                index,
                total,
            } => {
                if let Some(progress) = self.progress.as_mut() {
                    progress.current = Some(symbol);
                    progress.index = index;
                    progress.total = total;
                }
            }
            WorkerResponse::Notice(notification) => self.push_notification(notification),
            WorkerResponse::Chart(view) => {
                self.chart.views.push(view);
                self.chart.selected = self.chart.views.len() - 1;
                self.active_panel = Panel::Chart;
            }
            WorkerResponse::BatchDone {
                kind,
                total,
                succeeded,
                failed,
                skipped,
            } => {
                self.progress = None;
                if skipped > 0 {
                    self.set_warning(format!(
                        "{} cancelled: {succeeded} ok, {failed} failed, {skipped} skipped",
                        kind.label()
                    ));
                } else if failed == 0 {
                    self.set_status(format!("{} complete: {succeeded} of {total} ok", kind.label()));
                } else {
                    self.set_warning(format!(
                        "{} done: {succeeded} ok, {failed} failed",
                        kind.label()
                    ));
                }
            }
            WorkerResponse::BatchFailed { kind, notice } => {
                self.progress = None;
                self.set_error(format!("{} failed: {}", kind.label(), notice.title));
                self.push_notification(notice);
            }
        }
    }

    /// Push a notification to the log (newest first), capping at [`LOG_CAPACITY`].
    pub fn push_notification(&mut self, notification: Notification) {
        self.log.push_front(LogEntry {
            timestamp: chrono::Local::now().naive_local(),
            notification,
        });
        if self.log.len() > LOG_CAPACITY {
            self.log.pop_back();
        }
        self.log_scroll = 0;
        if self.active_panel == Panel::Help {
            self.active_panel = Panel::Notifications;
        }
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Error));
    }
}
