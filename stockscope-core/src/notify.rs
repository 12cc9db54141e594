//! User-facing notifications.
//!
//! The pipeline never prints. It hands [`Notification`]s to a [`Notifier`]
//! and each front-end decides how to show them.

use std::fmt;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::domain::Symbol;
use crate::error::StockError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

impl NoticeLevel {
    pub fn label(self) -> &'static str {
        match self {
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        }
    }
}

/// One message for the user: a short title and a (possibly multi-line) body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NoticeLevel,
    pub title: String,
    pub body: String,
}

impl Notification {
    pub fn info(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            title: title.into(),
            body: body.into(),
        }
    }

    pub fn warning(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            title: title.into(),
            body: body.into(),
        }
    }

    pub fn error(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: title.into(),
            body: body.into(),
        }
    }

    /// Input problems are warnings, everything else is an error.
    pub fn from_error(err: &StockError) -> Self {
        if err.is_input_error() {
            Self::warning(err.title(), err.to_string())
        } else {
            Self::error(err.title(), err.to_string())
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}\n{}", self.level.label(), self.title, self.body)
    }
}

/// Receives notifications as a batch runs.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);

    /// Called before each symbol is fetched (`index` is zero-based).
    fn on_symbol_start(&self, _symbol: &Symbol, _index: usize, _total: usize) {}
}

/// Prints notifications to stdout and progress to stderr.
pub struct StdoutNotifier;

impl Notifier for StdoutNotifier {
    fn notify(&self, notification: Notification) {
        let marker = match notification.level {
            NoticeLevel::Info => "",
            NoticeLevel::Warning => "warning: ",
            NoticeLevel::Error => "error: ",
        };
        println!("{marker}{}", notification.title);
        for line in notification.body.lines() {
            println!("  {line}");
        }
    }

    fn on_symbol_start(&self, symbol: &Symbol, index: usize, total: usize) {
        eprintln!("[{}/{}] {}", index + 1, total, symbol.provider_symbol());
    }
}

/// Keeps every notification in memory.
#[derive(Default)]
pub struct CollectingNotifier {
    notifications: Mutex<Vec<Notification>>,
    started: Mutex<Vec<String>>,
}

impl CollectingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .map(|n| n.clone())
            .unwrap_or_default()
    }

    /// Provider symbols announced via `on_symbol_start`, in order.
    pub fn started(&self) -> Vec<String> {
        self.started.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn count(&self, level: NoticeLevel) -> usize {
        self.notifications()
            .iter()
            .filter(|n| n.level == level)
            .count()
    }
}

impl Notifier for CollectingNotifier {
    fn notify(&self, notification: Notification) {
        if let Ok(mut n) = self.notifications.lock() {
            n.push(notification);
        }
    }

    fn on_symbol_start(&self, symbol: &Symbol, _index: usize, _total: usize) {
        if let Ok(mut s) = self.started.lock() {
            s.push(symbol.provider_symbol());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_errors_become_warnings() {
        let n = Notification::from_error(&StockError::MissingDuration);
        assert_eq!(n.level, NoticeLevel::Warning);
        assert_eq!(n.title, "Warning");

        let n = Notification::from_error(&StockError::EmptySeries);
        assert_eq!(n.level, NoticeLevel::Error);
    }

    #[test]
    fn collecting_notifier_records_in_order() {
        let notifier = CollectingNotifier::new();
        notifier.on_symbol_start(&Symbol::new("infy", "ns"), 0, 2);
        notifier.notify(Notification::info("a", "1"));
        notifier.notify(Notification::error("b", "2"));

        let all = notifier.notifications();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].title, "a");
        assert_eq!(notifier.count(NoticeLevel::Error), 1);
        assert_eq!(notifier.started(), vec!["INFY.NS"]);
    }

    #[test]
    fn display_includes_level_and_body() {
        let text = Notification::warning("Warning", "select a duration").to_string();
        assert!(text.starts_with("[warning] Warning"));
        assert!(text.ends_with("select a duration"));
    }
}
