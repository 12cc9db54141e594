//! Parrot/neon theme tokens for the StockScope TUI
//!
//! # Color Palette
//! - **Background**: Near-black / deep charcoal (base layer)
//! - **Accent**: Electric cyan (focus, highlights)
//! - **Positive**: Neon green (up candles, success)
//! - **Negative**: Hot pink (down candles, errors)
//! - **Warning**: Neon orange (input warnings, cancellation)
//! - **Muted**: Steel blue (hints, axis labels)

use ratatui::style::{Color, Modifier, Style};

use stockscope_core::NoticeLevel;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: Color,
    pub accent: Color,
    pub positive: Color,
    pub negative: Color,
    pub warning: Color,
    pub muted: Color,
    pub text_primary: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::parrot_neon()
    }
}

impl Theme {
    pub fn parrot_neon() -> Self {
        Self {
            background: Color::Rgb(18, 18, 20),
            accent: Color::Rgb(0, 255, 255),
            positive: Color::Rgb(0, 255, 128),
            negative: Color::Rgb(255, 20, 147),
            warning: Color::Rgb(255, 140, 0),
            muted: Color::Rgb(100, 149, 237),
            text_primary: Color::White,
        }
    }

    /// Up candles (close >= open) are positive, down candles negative.
    pub fn candle_color(&self, is_up: bool) -> Color {
        if is_up {
            self.positive
        } else {
            self.negative
        }
    }

    pub fn notice_color(&self, level: NoticeLevel) -> Color {
        match level {
            NoticeLevel::Info => self.accent,
            NoticeLevel::Warning => self.warning,
            NoticeLevel::Error => self.negative,
        }
    }
}

// Style shorthands used by the panels.

pub fn accent() -> Style {
    Style::default().fg(Theme::default().accent)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn muted() -> Style {
    Style::default().fg(Theme::default().muted)
}

pub fn text() -> Style {
    Style::default().fg(Theme::default().text_primary)
}

pub fn warning() -> Style {
    Style::default().fg(Theme::default().warning)
}

pub fn negative() -> Style {
    Style::default().fg(Theme::default().negative)
}

pub fn notice(level: NoticeLevel) -> Style {
    Style::default().fg(Theme::default().notice_color(level))
}

pub fn panel_border(active: bool) -> Style {
    if active {
        accent()
    } else {
        muted()
    }
}

pub fn panel_title(active: bool) -> Style {
    if active {
        accent_bold()
    } else {
        muted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_creation() {
        let theme = Theme::default();
        assert_eq!(theme.background, Color::Rgb(18, 18, 20));
        assert_eq!(theme.accent, Color::Rgb(0, 255, 255));
    }

    #[test]
    fn test_candle_color() {
        let theme = Theme::default();
        assert_eq!(theme.candle_color(true), theme.positive);
        assert_eq!(theme.candle_color(false), theme.negative);
    }

    #[test]
    fn test_notice_color() {
        let theme = Theme::default();
        assert_eq!(theme.notice_color(NoticeLevel::Info), theme.accent);
        assert_eq!(theme.notice_color(NoticeLevel::Warning), theme.warning);
        assert_eq!(theme.notice_color(NoticeLevel::Error), theme.negative);
    }

    #[test]
    fn test_focus_styles_differ() {
        assert_ne!(panel_border(true), panel_border(false));
    }
}
