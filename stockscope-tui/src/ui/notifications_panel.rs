//! Notification log: newest first, one header line plus indented body per entry.

use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    if app.log.is_empty() {
        let para = Paragraph::new(vec![
            Line::from(Span::styled("No notifications yet.", theme::muted())),
            Line::from(""),
            Line::from(Span::styled(
                "Fill in tickers and exchanges, then press an action key.",
                theme::muted(),
            )),
        ]);
        f.render_widget(para, area);
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    for entry in &app.log {
        let n = &entry.notification;
        lines.push(Line::from(vec![
            Span::styled(
                entry.timestamp.format("%H:%M:%S ").to_string(),
                theme::muted(),
            ),
            Span::styled(
                format!("[{}] ", n.level.label()),
                theme::notice(n.level),
            ),
            Span::styled(
                n.title.as_str(),
                theme::notice(n.level).add_modifier(Modifier::BOLD),
            ),
        ]));
        for body_line in n.body.lines() {
            lines.push(Line::from(Span::styled(
                format!("    {body_line}"),
                theme::text(),
            )));
        }
        lines.push(Line::from(""));
    }

    let para = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((app.log_scroll, 0));
    f.render_widget(para, area);
}
