//! Form persistence: JSON save/load across restarts.

use std::path::Path;

use serde::{Deserialize, Serialize};

use stockscope_core::domain::Period;

use crate::app::{AppState, Panel};

/// Serializable subset of app state that persists across restarts.
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    pub tickers: String,
    pub exchanges: String,
    pub date: String,
    pub duration: Option<Period>,
    pub active_panel: Panel,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            tickers: String::new(),
            exchanges: String::new(),
            date: String::new(),
            duration: None,
            active_panel: Panel::Notifications,
        }
    }
}

/// Load persisted state from disk. Returns defaults if file is missing or corrupt.
pub fn load(path: &Path) -> PersistedState {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "ignoring corrupt state file");
            PersistedState::default()
        }),
        Err(_) => PersistedState::default(),
    }
}

/// Save persisted state to disk. Creates parent directories if needed.
pub fn save(path: &Path, state: &PersistedState) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Extract persisted state from AppState.
pub fn extract(app: &AppState) -> PersistedState {
    PersistedState {
        tickers: app.form.tickers.clone(),
        exchanges: app.form.exchanges.clone(),
        date: app.form.date.clone(),
        duration: app.form.duration(),
        active_panel: app.active_panel,
    }
}

/// Apply persisted state to AppState.
pub fn apply(app: &mut AppState, state: PersistedState) {
    app.form.tickers = state.tickers;
    app.form.exchanges = state.exchanges;
    app.form.date = state.date;
    app.form.set_duration(state.duration);
    app.active_panel = state.active_panel;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::test_app;

    #[test]
    fn roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");

        let (mut app, _rx, _tx) = test_app();
        app.form.tickers = "INFY,TCS".into();
        app.form.exchanges = "NS,NS".into();
        app.form.date = "2024-01-05".into();
        app.form.set_duration(Some(Period::OneYear));
        app.active_panel = Panel::Help;

        save(&path, &extract(&app)).unwrap();

        let (mut restored, _rx2, _tx2) = test_app();
        apply(&mut restored, load(&path));
        assert_eq!(restored.form, app.form);
        assert_eq!(restored.active_panel, Panel::Help);
    }

    #[test]
    fn missing_file_returns_defaults() {
        let loaded = load(Path::new("/nonexistent/path/state.json"));
        assert!(loaded.tickers.is_empty());
        assert_eq!(loaded.duration, None);
        assert_eq!(loaded.active_panel, Panel::Notifications);
    }

    #[test]
    fn corrupt_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "not valid json {{{").unwrap();

        let loaded = load(&path);
        assert!(loaded.tickers.is_empty());
    }

    #[test]
    fn missing_keys_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, r#"{"tickers":"WIPRO","duration":"6mo"}"#).unwrap();

        let loaded = load(&path);
        assert_eq!(loaded.tickers, "WIPRO");
        assert_eq!(loaded.duration, Some(Period::SixMonths));
        assert!(loaded.exchanges.is_empty());
    }
}
