//! Help panel: keyboard shortcuts and input formats.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, _app: &AppState) {
    let mut lines: Vec<Line> = Vec::new();

    section(&mut lines, "Global");
    key(&mut lines, "Tab / Shift+Tab", "Move focus between fields and panel");
    key(&mut lines, "F1 / F2 / F3", "Notifications / Chart / Help");
    key(&mut lines, "Esc", "Cancel running batch, else focus panel");
    key(&mut lines, "Ctrl+C / Ctrl+Q", "Quit");
    lines.push(Line::from(""));

    section(&mut lines, "Actions");
    key(&mut lines, "Ctrl+D", "Fetch daily prices for every ticker");
    key(&mut lines, "Ctrl+R", "High/low report over the chosen duration");
    key(&mut lines, "Ctrl+G", "Candlestick chart per ticker");
    key(&mut lines, "Ctrl+T", "Prices on the given date");
    key(&mut lines, "Ctrl+P", "Predict closing price for the given date");
    key(&mut lines, "Ctrl+B", "Date report for the whole exchange list");
    lines.push(Line::from(""));

    section(&mut lines, "Form");
    key(&mut lines, "Enter", "Next field");
    key(&mut lines, "Left / Right", "Change duration");
    key(&mut lines, "Enter (Duration)", "Run duration report");
    lines.push(Line::from(""));

    section(&mut lines, "Panel");
    key(&mut lines, "1 / 2 / 3", "Switch panel");
    key(&mut lines, "Space", "Next panel");
    key(&mut lines, "j / k", "Scroll notifications");
    key(&mut lines, "h / l", "Previous / next chart");
    key(&mut lines, "c", "Clear notifications");
    key(&mut lines, "q", "Quit");
    lines.push(Line::from(""));

    section(&mut lines, "Input Formats");
    key(&mut lines, "Tickers", "INFY,TCS");
    key(&mut lines, "Exchanges", "NS,BO (one per ticker)");
    key(&mut lines, "Date", "YYYY-MM-DD");

    let para = Paragraph::new(lines);
    f.render_widget(para, area);
}

fn section<'a>(lines: &mut Vec<Line<'a>>, title: &str) {
    lines.push(Line::from(Span::styled(title.to_string(), theme::accent_bold())));
}

fn key<'a>(lines: &mut Vec<Line<'a>>, keys: &str, desc: &str) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {:>18}  ", keys), theme::accent()),
        Span::styled(desc.to_string(), theme::muted()),
    ]));
}
