//! Input form: tickers, exchanges, date, duration selector, action keys.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;

use stockscope_core::ActionKind;

use crate::app::{AppState, Focus, FormField};
use crate::theme;

const ACTION_KEYS: [(&str, ActionKind); 6] = [
    ("Ctrl+D", ActionKind::FetchDaily),
    ("Ctrl+R", ActionKind::DurationReport),
    ("Ctrl+G", ActionKind::Chart),
    ("Ctrl+T", ActionKind::DateReport),
    ("Ctrl+P", ActionKind::Predict),
    ("Ctrl+B", ActionKind::Bulk),
];

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut lines: Vec<Line> = Vec::new();

    for field in FormField::ALL {
        let focused = app.focus == Focus::Field(field);
        let label_style = if focused {
            theme::accent_bold()
        } else {
            theme::muted()
        };
        lines.push(Line::from(Span::styled(field.label(), label_style)));

        let value = match field {
            FormField::Tickers => app.form.tickers.as_str(),
            FormField::Exchanges => app.form.exchanges.as_str(),
            FormField::Date => app.form.date.as_str(),
            FormField::Duration => {
                let text = app
                    .form
                    .duration()
                    .map(|p| p.label())
                    .unwrap_or("Select Duration");
                lines.push(Line::from(vec![
                    Span::styled(if focused { " < " } else { "   " }, theme::accent()),
                    Span::styled(text, theme::text()),
                    Span::styled(if focused { " >" } else { "" }, theme::accent()),
                ]));
                lines.push(Line::from(""));
                continue;
            }
        };
        let cursor = if focused { "\u{258f}" } else { "" };
        lines.push(Line::from(vec![
            Span::styled(" > ", theme::muted()),
            Span::styled(value, theme::text()),
            Span::styled(cursor, theme::accent()),
        ]));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled("Actions", theme::accent_bold())));
    for (keys, kind) in ACTION_KEYS {
        let style = if app.is_busy() {
            theme::muted()
        } else {
            theme::text()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("  {keys:<8}"), theme::accent()),
            Span::styled(kind.label(), style),
        ]));
    }
    lines.push(Line::from(""));

    if let Some(progress) = &app.progress {
        let mut spans = vec![Span::styled(
            format!("Running: {}", progress.kind.label()),
            theme::warning(),
        )];
        if let Some(symbol) = &progress.current {
            spans.push(Span::styled(
                format!(" [{}/{}] {symbol}", progress.index + 1, progress.total),
                theme::text(),
            ));
        }
        lines.push(Line::from(spans));
        let hint = if progress.cancel_requested {
            "Cancelling..."
        } else {
            "Esc to cancel"
        };
        lines.push(Line::from(Span::styled(hint, theme::muted())));
    } else {
        lines.push(Line::from(Span::styled(
            format!("Store: {}", app.store_path.display()),
            theme::muted(),
        )));
    }

    let para = Paragraph::new(lines).wrap(Wrap { trim: false });
    f.render_widget(para, area);
}
