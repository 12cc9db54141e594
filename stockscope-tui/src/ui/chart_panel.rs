//! Chart panel: candlestick chart with a volume sub-panel.
//!
//! Renders with direct buffer writes:
//! - Each candle = 1 terminal column; the most recent candles win when the
//!   series is wider than the plot
//! - Body: block char, positive color if close >= open, negative otherwise
//! - Wicks: vertical line chars to high/low
//! - Volume: bars below the candles, scaled to the largest visible volume

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};
use ratatui::Frame;

use stockscope_core::chart::price_axis_label;
use stockscope_core::dates::format_date;
use stockscope_core::domain::{OhlcvRecord, OhlcvSeries};

use crate::app::AppState;
use crate::theme::{self, Theme};

/// Left margin reserved for price labels.
const LABEL_WIDTH: u16 = 10;

/// Below this inner height the volume panel is dropped.
const MIN_HEIGHT_FOR_VOLUME: u16 = 10;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(view) = app.chart.current() else {
        let para = Paragraph::new(vec![
            Line::from(Span::styled("No chart yet.", theme::muted())),
            Line::from(""),
            Line::from(Span::styled(
                "Pick a duration, then press Ctrl+G to chart every ticker.",
                theme::muted(),
            )),
        ]);
        f.render_widget(para, area);
        return;
    };

    let mut chart_area = area;
    if app.chart.views.len() > 1 && area.height > 1 {
        let hint = Line::from(vec![
            Span::styled(
                format!(" Chart {}/{} ", app.chart.selected + 1, app.chart.views.len()),
                theme::accent(),
            ),
            Span::styled("h/l to switch", theme::muted()),
        ]);
        f.render_widget(Paragraph::new(hint), Rect { height: 1, ..area });
        chart_area = Rect {
            y: area.y + 1,
            height: area.height - 1,
            ..area
        };
    }

    let theme = Theme::default();
    let chart = CandleChart::new(&view.series, &view.title, &view.label_suffix, &theme);
    f.render_widget(chart, chart_area);
}

/// Candlestick chart widget with a volume sub-panel.
pub struct CandleChart<'a> {
    series: &'a OhlcvSeries,
    title: &'a str,
    axis_label: String,
    theme: &'a Theme,
}

impl<'a> CandleChart<'a> {
    pub fn new(
        series: &'a OhlcvSeries,
        title: &'a str,
        label_suffix: &str,
        theme: &'a Theme,
    ) -> Self {
        Self {
            series,
            title,
            axis_label: price_axis_label(label_suffix),
            theme,
        }
    }
}

/// Map a value to a row offset in a plot of `height` rows (0 = top).
fn value_to_y(value: f64, lo: f64, hi: f64, height: u16) -> u16 {
    if (hi - lo).abs() < 1e-9 || height == 0 {
        return 0;
    }
    let frac = (value - lo) / (hi - lo);
    let y = height.saturating_sub(1) as f64 * (1.0 - frac);
    y.round().max(0.0).min(height.saturating_sub(1) as f64) as u16
}

impl<'a> Widget for CandleChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.series.is_empty() {
            let block = Block::default()
                .title(format!(" {} [No Data] ", self.title))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(self.theme.muted))
                .style(Style::default().bg(self.theme.background));
            block.render(area, buf);
            return;
        }

        let records = self.series.records();
        let up_count = records.iter().filter(|r| r.is_up()).count();
        let title = format!(
            " {} | {} candles | {} up {} down ",
            self.title,
            records.len(),
            up_count,
            records.len() - up_count,
        );

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.accent))
            .style(Style::default().bg(self.theme.background));
        let inner = block.inner(area);
        block.render(area, buf);

        let plot_width = inner.width.saturating_sub(LABEL_WIDTH);
        if plot_width == 0 || inner.height < 4 {
            return;
        }

        // Most recent candles that fit.
        let start = records.len().saturating_sub(plot_width as usize);
        let visible = &records[start..];

        let (price_area, volume_area) = if inner.height >= MIN_HEIGHT_FOR_VOLUME {
            let volume_height = (inner.height / 4).max(3);
            let price_height = inner.height - volume_height;
            (
                Rect {
                    height: price_height,
                    ..inner
                },
                Some(Rect {
                    y: inner.y + price_height,
                    height: volume_height,
                    ..inner
                }),
            )
        } else {
            (inner, None)
        };

        self.render_prices(visible, price_area, buf);
        if let Some(volume_area) = volume_area {
            self.render_volume(visible, volume_area, buf);
        }
    }
}

impl<'a> CandleChart<'a> {
    /// Axis label row, candle rows, then one row of dates.
    fn render_prices(&self, visible: &[OhlcvRecord], area: Rect, buf: &mut Buffer) {
        let muted = Style::default().fg(self.theme.muted);
        buf.set_string(area.x, area.y, &self.axis_label, muted);

        let plot_top = area.y + 1;
        let plot_left = area.x + LABEL_WIDTH;
        let plot_height = area.height.saturating_sub(2);
        if plot_height == 0 {
            return;
        }

        let y_min = visible.iter().map(|r| r.low).fold(f64::INFINITY, f64::min);
        let y_max = visible
            .iter()
            .map(|r| r.high)
            .fold(f64::NEG_INFINITY, f64::max);
        let range = y_max - y_min;
        let pad = if range > 0.0 { range * 0.05 } else { 1.0 };
        let y_lower = y_min - pad;
        let y_upper = y_max + pad;

        let y_labels = [y_upper, (y_upper + y_lower) / 2.0, y_lower];
        let y_positions = [0u16, plot_height / 2, plot_height.saturating_sub(1)];
        for (value, y_pos) in y_labels.iter().zip(y_positions.iter()) {
            buf.set_string(area.x, plot_top + y_pos, format!("{value:>9.2}"), muted);
        }

        for (i, rec) in visible.iter().enumerate() {
            let x = plot_left + i as u16;
            if x >= area.right() {
                break;
            }
            let is_up = rec.is_up();
            let style = Style::default().fg(self.theme.candle_color(is_up));

            let high_y = value_to_y(rec.high, y_lower, y_upper, plot_height);
            let low_y = value_to_y(rec.low, y_lower, y_upper, plot_height);
            let body_top_y = value_to_y(rec.open.max(rec.close), y_lower, y_upper, plot_height);
            let body_bot_y = value_to_y(rec.open.min(rec.close), y_lower, y_upper, plot_height);

            for y in high_y..body_top_y {
                buf.set_string(x, plot_top + y, "|", style);
            }
            let body_char = if is_up { "\u{2588}" } else { "\u{2593}" };
            for y in body_top_y..=body_bot_y {
                buf.set_string(x, plot_top + y, body_char, style);
            }
            for y in (body_bot_y + 1)..=low_y {
                buf.set_string(x, plot_top + y, "|", style);
            }
        }

        // Date axis: first and last visible dates.
        let axis_y = plot_top + plot_height;
        if let (Some(first), Some(last)) = (visible.first(), visible.last()) {
            let first_label = format_date(first.date);
            let last_label = format_date(last.date);
            let room = area.right().saturating_sub(plot_left) as usize;
            buf.set_stringn(plot_left, axis_y, &first_label, room, muted);
            let last_x = plot_left + (visible.len() as u16).saturating_sub(last_label.len() as u16);
            if visible.len() > 1 && last_x > plot_left + first_label.len() as u16 {
                buf.set_string(last_x, axis_y, &last_label, muted);
            }
        }
    }

    /// "Volume" label row, then bars growing up from the bottom row.
    fn render_volume(&self, visible: &[OhlcvRecord], area: Rect, buf: &mut Buffer) {
        let muted = Style::default().fg(self.theme.muted);
        let max_volume = visible.iter().map(|r| r.volume).max().unwrap_or(0);
        buf.set_string(area.x, area.y, format!("Volume (max {max_volume})"), muted);

        let bar_rows = area.height.saturating_sub(1);
        if bar_rows == 0 || max_volume == 0 {
            return;
        }
        let bottom = area.y + area.height - 1;
        let plot_left = area.x + LABEL_WIDTH;

        for (i, rec) in visible.iter().enumerate() {
            let x = plot_left + i as u16;
            if x >= area.right() {
                break;
            }
            let style = Style::default().fg(self.theme.candle_color(rec.is_up()));
            let frac = rec.volume as f64 / max_volume as f64;
            let height = (frac * bar_rows as f64).round() as u16;
            for dy in 0..height.min(bar_rows) {
                buf.set_string(x, bottom - dy, "\u{2588}", style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::tests::buffer_text;
    use chrono::NaiveDate;

    fn rec(day: u32, open: f64, close: f64, volume: u64) -> OhlcvRecord {
        OhlcvRecord {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            open,
            high: open.max(close) + 1.0,
            low: open.min(close) - 1.0,
            close,
            volume,
        }
    }

    fn test_series() -> OhlcvSeries {
        OhlcvSeries::from_records(vec![
            rec(2, 100.0, 101.0, 1_000), // up
            rec(3, 101.0, 100.5, 2_000), // down
            rec(4, 100.5, 103.0, 1_500), // up
            rec(5, 103.0, 102.0, 500),   // down
            rec(8, 102.0, 105.5, 3_000), // up
        ])
    }

    fn render_text(series: &OhlcvSeries, width: u16, height: u16) -> (Buffer, String) {
        let theme = Theme::default();
        let chart = CandleChart::new(series, "INFY Candlestick Chart (1mo)", "INR", &theme);
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        chart.render(area, &mut buf);
        let text = buffer_text(&buf);
        (buf, text)
    }

    #[test]
    fn renders_title_axis_label_and_counts() {
        let (_, text) = render_text(&test_series(), 80, 24);
        assert!(text.contains("INFY Candlestick Chart (1mo)"));
        assert!(text.contains("Price (INR)"));
        assert!(text.contains("3 up 2 down"));
        assert!(text.contains("Volume (max 3000)"));
        assert!(text.contains("2024-01-02"));
    }

    #[test]
    fn empty_series_shows_no_data() {
        let (_, text) = render_text(&OhlcvSeries::empty(), 80, 24);
        assert!(text.contains("No Data"));
    }

    #[test]
    fn up_and_down_candles_use_theme_colors() {
        let theme = Theme::default();
        let (buf, _) = render_text(&test_series(), 80, 24);
        // Column of the first candle (up) and second (down) inside the border.
        let up_x = 1 + LABEL_WIDTH;
        let down_x = up_x + 1;
        let has_color = |x: u16, color| {
            (0..24).any(|y| {
                buf.cell((x, y))
                    .is_some_and(|c| c.symbol() != " " && c.fg == color)
            })
        };
        assert!(has_color(up_x, theme.positive));
        assert!(has_color(down_x, theme.negative));
    }

    #[test]
    fn narrow_area_keeps_latest_candles() {
        // Inner width 12 leaves 2 plot columns: the last two records.
        let (buf, text) = render_text(&test_series(), 14, 24);
        assert!(!text.contains("2024-01-02"));
        let plot_x = 1 + LABEL_WIDTH;
        let drawn = |x: u16| (1..23).any(|y| buf.cell((x, y)).is_some_and(|c| c.symbol() == "\u{2588}"));
        assert!(drawn(plot_x));
        assert!(drawn(plot_x + 1));
    }

    #[test]
    fn short_area_drops_volume_panel() {
        let (_, text) = render_text(&test_series(), 80, 8);
        assert!(!text.contains("Volume"));
    }

    #[test]
    fn value_mapping_is_clamped() {
        assert_eq!(value_to_y(110.0, 100.0, 110.0, 11), 0);
        assert_eq!(value_to_y(100.0, 100.0, 110.0, 11), 10);
        assert_eq!(value_to_y(120.0, 100.0, 110.0, 11), 0);
        assert_eq!(value_to_y(5.0, 5.0, 5.0, 11), 0);
    }
}
