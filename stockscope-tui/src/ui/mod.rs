//! Top-level UI layout: input form on the left, active panel on the right,
//! status bar at the bottom.

pub mod chart_panel;
pub mod form_panel;
pub mod help_panel;
pub mod notifications_panel;
pub mod status_bar;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;

use crate::app::{AppState, Focus, Panel};
use crate::theme;

/// Form column width, wide enough for the field labels.
const FORM_WIDTH: u16 = 62;

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &AppState) {
    // Split: main area + 1-line status bar.
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(FORM_WIDTH), Constraint::Min(20)])
        .split(chunks[0]);

    draw_form(f, columns[0], app);
    draw_panel(f, columns[1], app);
    status_bar::render(f, chunks[1], app);
}

fn draw_form(f: &mut Frame, area: Rect, app: &AppState) {
    let is_active = matches!(app.focus, Focus::Field(_));
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(is_active))
        .title(" Stock Analysis for Multiple Companies ")
        .title_style(theme::panel_title(is_active));

    let inner = block.inner(area);
    f.render_widget(block, area);
    form_panel::render(f, inner, app);
}

/// Draw the active right-hand panel with its border.
fn draw_panel(f: &mut Frame, area: Rect, app: &AppState) {
    let panel = app.active_panel;
    let is_active = app.focus == Focus::Panel;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(is_active))
        .title(format!(" {} [F{}] ", panel.label(), panel.index() + 1))
        .title_style(theme::panel_title(is_active));

    let inner = block.inner(area);
    f.render_widget(block, area);

    match panel {
        Panel::Notifications => notifications_panel::render(f, inner, app),
        Panel::Chart => chart_panel::render(f, inner, app),
        Panel::Help => help_panel::render(f, inner, app),
    }
}
