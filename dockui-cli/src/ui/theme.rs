//! Color palette and style helpers for the dashboard.
//!
//! Panels never pick colors themselves; they ask `styles` for the style of
//! a role (focused border, cursor row, error notice) so a palette swap
//! restyles the whole screen.

use ratatui::style::{Color, Modifier, Style};

use dockui_core::context::NoticeLevel;

/// Color palette tokens for the theme
#[derive(Clone, Debug)]
pub struct Palette {
    /// Panel border color
    pub panel_border: Color,
    /// Primary text color
    pub text: Color,
    /// Muted text (headers, hints)
    pub text_muted: Color,
    /// Accent color (focus)
    pub accent: Color,
    pub error: Color,
    pub info: Color,
    /// Cursor row background
    pub selection_bg: Color,
    pub selection_fg: Color,
    pub key_hint: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self::dark()
    }
}

impl Palette {
    pub fn dark() -> Self {
        Self {
            panel_border: Color::Rgb(60, 60, 60),
            text: Color::Rgb(212, 212, 212),
            text_muted: Color::Rgb(100, 100, 100),
            accent: Color::Rgb(79, 193, 255),
            error: Color::Rgb(244, 135, 113),
            info: Color::Rgb(156, 220, 254),
            selection_bg: Color::Rgb(38, 79, 120),
            selection_fg: Color::White,
            key_hint: Color::Rgb(206, 145, 120),
        }
    }

    /// For terminals without truecolor
    pub fn basic() -> Self {
        Self {
            panel_border: Color::DarkGray,
            text: Color::White,
            text_muted: Color::Gray,
            accent: Color::Cyan,
            error: Color::Red,
            info: Color::Cyan,
            selection_bg: Color::Blue,
            selection_fg: Color::White,
            key_hint: Color::Yellow,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Theme {
    pub palette: Palette,
}

impl Theme {
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }

    pub fn border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.palette.accent)
        } else {
            Style::default().fg(self.palette.panel_border)
        }
    }

    pub fn title_style(&self, focused: bool) -> Style {
        if focused {
            Style::default()
                .fg(self.palette.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.palette.text)
        }
    }

    pub fn selection_style(&self) -> Style {
        Style::default()
            .bg(self.palette.selection_bg)
            .fg(self.palette.selection_fg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn text_style(&self) -> Style {
        Style::default().fg(self.palette.text)
    }

    pub fn text_muted_style(&self) -> Style {
        Style::default().fg(self.palette.text_muted)
    }

    pub fn key_hint_style(&self) -> Style {
        Style::default().fg(self.palette.key_hint)
    }

    pub fn notice_style(&self, level: NoticeLevel) -> Style {
        match level {
            NoticeLevel::Info => Style::default().fg(self.palette.info),
            NoticeLevel::Error => Style::default()
                .fg(self.palette.error)
                .add_modifier(Modifier::BOLD),
        }
    }
}

static DEFAULT_THEME: std::sync::OnceLock<Theme> = std::sync::OnceLock::new();

/// Process-wide theme; the first call fixes the palette.
pub fn theme() -> &'static Theme {
    DEFAULT_THEME.get_or_init(|| {
        // 256-color terminals render the Rgb palette as mud
        let truecolor = std::env::var("COLORTERM")
            .map(|v| v == "truecolor" || v == "24bit")
            .unwrap_or(false);
        if truecolor {
            Theme::default()
        } else {
            Theme::new(Palette::basic())
        }
    })
}

pub mod styles {
    use super::*;

    pub fn border(focused: bool) -> Style {
        theme().border_style(focused)
    }

    pub fn title(focused: bool) -> Style {
        theme().title_style(focused)
    }

    pub fn selection() -> Style {
        theme().selection_style()
    }

    pub fn text() -> Style {
        theme().text_style()
    }

    pub fn text_muted() -> Style {
        theme().text_muted_style()
    }

    pub fn key_hint() -> Style {
        theme().key_hint_style()
    }

    pub fn notice(level: NoticeLevel) -> Style {
        theme().notice_style(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focused_border_uses_accent() {
        let theme = Theme::new(Palette::dark());
        assert_eq!(theme.border_style(true).fg, Some(theme.palette.accent));
        assert_eq!(theme.border_style(false).fg, Some(theme.palette.panel_border));
    }

    #[test]
    fn test_error_notice_is_bold() {
        let theme = Theme::new(Palette::basic());
        let style = theme.notice_style(NoticeLevel::Error);
        assert_eq!(style.fg, Some(Color::Red));
        assert!(style.add_modifier.contains(Modifier::BOLD));
    }
}
