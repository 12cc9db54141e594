//! Keyboard input dispatch: global keys → focused field or panel.
//!
//! Action keys use Ctrl so they work while typing in a field:
//! Ctrl+D daily, Ctrl+R duration report, Ctrl+G chart, Ctrl+T date report,
//! Ctrl+P predict, Ctrl+B bulk.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use stockscope_core::ActionKind;

use crate::app::{AppState, Focus, FormField, Panel};

/// Handle a key event.
pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // 1. Global keys (always available).
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') => app.running = false,
            KeyCode::Char(c) => {
                if let Some(kind) = action_for(c) {
                    app.submit(kind);
                }
            }
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc => {
            if app.is_busy() {
                app.request_cancel();
            } else {
                app.focus = Focus::Panel;
            }
            return;
        }
        KeyCode::Tab => {
            app.focus = if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.focus.prev()
            } else {
                app.focus.next()
            };
            return;
        }
        KeyCode::BackTab => {
            app.focus = app.focus.prev();
            return;
        }
        KeyCode::F(1) => {
            app.active_panel = Panel::Notifications;
            return;
        }
        KeyCode::F(2) => {
            app.active_panel = Panel::Chart;
            return;
        }
        KeyCode::F(3) => {
            app.active_panel = Panel::Help;
            return;
        }
        _ => {}
    }

    // 2. Focus-specific keys.
    match app.focus {
        Focus::Field(FormField::Duration) => handle_duration_key(app, key),
        Focus::Field(field) => handle_text_key(app, field, key),
        Focus::Panel => handle_panel_key(app, key),
    }
}

fn action_for(c: char) -> Option<ActionKind> {
    match c.to_ascii_lowercase() {
        'd' => Some(ActionKind::FetchDaily),
        'r' => Some(ActionKind::DurationReport),
        'g' => Some(ActionKind::Chart),
        't' => Some(ActionKind::DateReport),
        'p' => Some(ActionKind::Predict),
        'b' => Some(ActionKind::Bulk),
        _ => None,
    }
}

fn handle_text_key(app: &mut AppState, field: FormField, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.focus = app.focus.next(),
        KeyCode::Char(c) => {
            if let Some(text) = app.form.text_mut(field) {
                text.push(c);
            }
        }
        KeyCode::Backspace => {
            if let Some(text) = app.form.text_mut(field) {
                text.pop();
            }
        }
        _ => {}
    }
}

/// Picking a duration and pressing Enter runs the duration report.
fn handle_duration_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Up | KeyCode::Char('k') => {
            app.form.cycle_duration(false)
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Down | KeyCode::Char('j') => {
            app.form.cycle_duration(true)
        }
        KeyCode::Enter => app.submit(ActionKind::DurationReport),
        _ => {}
    }
}

fn handle_panel_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.running = false,
        KeyCode::Char('1') => app.active_panel = Panel::Notifications,
        KeyCode::Char('2') => app.active_panel = Panel::Chart,
        KeyCode::Char('3') => app.active_panel = Panel::Help,
        KeyCode::Char(' ') => app.active_panel = app.active_panel.next(),
        KeyCode::Char('j') | KeyCode::Down => {
            if app.active_panel == Panel::Notifications {
                app.log_scroll = app.log_scroll.saturating_add(1);
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            if app.active_panel == Panel::Notifications {
                app.log_scroll = app.log_scroll.saturating_sub(1);
            }
        }
        KeyCode::Char('l') | KeyCode::Right => app.chart.select_next(),
        KeyCode::Char('h') | KeyCode::Left => app.chart.select_prev(),
        KeyCode::Char('c') => {
            app.log.clear();
            app.log_scroll = 0;
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::test_app;
    use crate::worker::WorkerCommand;
    use crossterm::event::KeyEventState;
    use stockscope_core::Action;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_str(app: &mut AppState, s: &str) {
        for c in s.chars() {
            handle_key(app, press(KeyCode::Char(c)));
        }
    }

    #[test]
    fn typing_fills_focused_field() {
        let (mut app, _rx, _tx) = test_app();
        type_str(&mut app, "INFY,TCS");
        handle_key(&mut app, press(KeyCode::Tab));
        type_str(&mut app, "NS,NS");
        handle_key(&mut app, press(KeyCode::Backspace));
        assert_eq!(app.form.tickers, "INFY,TCS");
        assert_eq!(app.form.exchanges, "NS,N");
    }

    #[test]
    fn q_types_into_field_but_quits_from_panel() {
        let (mut app, _rx, _tx) = test_app();
        handle_key(&mut app, press(KeyCode::Char('q')));
        assert!(app.running);
        assert_eq!(app.form.tickers, "q");

        handle_key(&mut app, press(KeyCode::Esc));
        assert_eq!(app.focus, Focus::Panel);
        handle_key(&mut app, press(KeyCode::Char('q')));
        assert!(!app.running);
    }

    #[test]
    fn ctrl_c_quits_anywhere() {
        let (mut app, _rx, _tx) = test_app();
        handle_key(&mut app, ctrl('c'));
        assert!(!app.running);
    }

    #[test]
    fn ctrl_d_submits_daily_fetch() {
        let (mut app, rx, _tx) = test_app();
        type_str(&mut app, "INFY");
        handle_key(&mut app, press(KeyCode::Tab));
        type_str(&mut app, "NS");
        handle_key(&mut app, ctrl('d'));
        assert!(matches!(
            rx.try_recv(),
            Ok(WorkerCommand::Run(Action::FetchDaily { .. }))
        ));
    }

    #[test]
    fn enter_on_duration_runs_report() {
        let (mut app, rx, _tx) = test_app();
        app.form.tickers = "INFY".into();
        app.form.exchanges = "NS".into();
        app.focus = Focus::Field(FormField::Duration);

        handle_key(&mut app, press(KeyCode::Right));
        handle_key(&mut app, press(KeyCode::Right));
        handle_key(&mut app, press(KeyCode::Enter));
        match rx.try_recv() {
            Ok(WorkerCommand::Run(Action::DurationReport { period, .. })) => {
                assert_eq!(period, stockscope_core::domain::Period::SixMonths)
            }
            other => panic!("expected duration report, got {other:?}"),
        }
    }

    #[test]
    fn release_events_are_ignored() {
        let (mut app, _rx, _tx) = test_app();
        let mut key = press(KeyCode::Char('x'));
        key.kind = KeyEventKind::Release;
        key.state = KeyEventState::NONE;
        handle_key(&mut app, key);
        assert!(app.form.tickers.is_empty());
    }

    #[test]
    fn function_keys_switch_panels() {
        let (mut app, _rx, _tx) = test_app();
        handle_key(&mut app, press(KeyCode::F(3)));
        assert_eq!(app.active_panel, Panel::Help);
        handle_key(&mut app, press(KeyCode::F(2)));
        assert_eq!(app.active_panel, Panel::Chart);
    }
}
