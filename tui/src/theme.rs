//! Palette, glyphs, and shared styles.
//!
//! The standard palette is a dim auditorium with marquee gold; `high_contrast`
//! swaps it for named terminal colors.

use ratatui::style::{Color, Modifier, Style};

use reel_engine::{NoticeLevel, UiOptions};

mod colors {
    use super::Color;

    pub const HOUSE_LIGHTS_DOWN: Color = Color::Rgb(16, 14, 18);
    pub const SEAT: Color = Color::Rgb(28, 24, 30);
    pub const AISLE: Color = Color::Rgb(46, 38, 48);
    pub const CURTAIN_EDGE: Color = Color::Rgb(92, 70, 86);

    pub const SCREEN: Color = Color::Rgb(236, 230, 214);
    pub const CREDITS: Color = Color::Rgb(188, 178, 160);
    pub const FINE_PRINT: Color = Color::Rgb(120, 110, 104);

    pub const CURTAIN: Color = Color::Rgb(196, 58, 72);
    pub const MARQUEE: Color = Color::Rgb(242, 192, 86);
    pub const NEON: Color = Color::Rgb(110, 196, 210);
    pub const EXIT_SIGN: Color = Color::Rgb(120, 200, 120);
    pub const POPCORN: Color = Color::Rgb(255, 168, 92);
    pub const ALARM: Color = Color::Rgb(255, 84, 84);
}

#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg_dark: Color,
    pub bg_panel: Color,
    pub bg_highlight: Color,
    pub bg_border: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    /// Brand mark and the featured banner frame.
    pub primary: Color,
    pub accent: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    /// Keys named in the hint bar.
    pub key: Color,
    pub rating: Color,
}

impl Palette {
    #[must_use]
    pub fn standard() -> Self {
        Self {
            bg_dark: colors::HOUSE_LIGHTS_DOWN,
            bg_panel: colors::SEAT,
            bg_highlight: colors::AISLE,
            bg_border: colors::CURTAIN_EDGE,
            text_primary: colors::SCREEN,
            text_secondary: colors::CREDITS,
            text_muted: colors::FINE_PRINT,
            primary: colors::CURTAIN,
            accent: colors::NEON,
            success: colors::EXIT_SIGN,
            warning: colors::POPCORN,
            error: colors::ALARM,
            key: colors::MARQUEE,
            rating: colors::MARQUEE,
        }
    }

    #[must_use]
    pub fn high_contrast() -> Self {
        Self {
            bg_dark: Color::Black,
            bg_panel: Color::Black,
            bg_highlight: Color::DarkGray,
            bg_border: Color::White,
            text_primary: Color::White,
            text_secondary: Color::Gray,
            text_muted: Color::Gray,
            primary: Color::LightRed,
            accent: Color::Cyan,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            key: Color::Yellow,
            rating: Color::Yellow,
        }
    }

    /// Foreground for a status-bar notice.
    #[must_use]
    pub fn notice(&self, level: NoticeLevel) -> Color {
        match level {
            NoticeLevel::Info => self.text_secondary,
            NoticeLevel::Success => self.success,
            NoticeLevel::Warning => self.warning,
            NoticeLevel::Error => self.error,
        }
    }
}

#[must_use]
pub fn palette(options: UiOptions) -> Palette {
    if options.high_contrast {
        Palette::high_contrast()
    } else {
        Palette::standard()
    }
}

/// Markers drawn in cards, forms, and the status bar.
#[derive(Debug, Clone, Copy)]
pub struct Glyphs {
    pub wishlisted: &'static str,
    pub rating: &'static str,
    pub selected: &'static str,
    pub checkbox_on: &'static str,
    pub checkbox_off: &'static str,
    pub mask: &'static str,
    pub separator: &'static str,
    pub bullet: &'static str,
    pub arrow_left: &'static str,
    pub arrow_right: &'static str,
    pub spinner_frames: &'static [&'static str],
}

const REEL_FRAMES: &[&str] = &["◐", "◓", "◑", "◒"];
const REEL_FRAMES_ASCII: &[&str] = &["|", "/", "-", "\\"];

#[must_use]
pub fn glyphs(options: UiOptions) -> Glyphs {
    if options.ascii_only {
        Glyphs {
            wishlisted: "*",
            rating: "*",
            selected: ">",
            checkbox_on: "[x]",
            checkbox_off: "[ ]",
            mask: "*",
            separator: "|",
            bullet: "-",
            arrow_left: "<",
            arrow_right: ">",
            spinner_frames: REEL_FRAMES_ASCII,
        }
    } else {
        Glyphs {
            wishlisted: "★",
            rating: "☆",
            selected: "▸",
            checkbox_on: "☑",
            checkbox_off: "☐",
            mask: "•",
            separator: "│",
            bullet: "•",
            arrow_left: "◀",
            arrow_right: "▶",
            spinner_frames: REEL_FRAMES,
        }
    }
}

#[must_use]
pub fn spinner_frame(tick: u64, options: UiOptions) -> &'static str {
    let frames = glyphs(options).spinner_frames;
    frames[(tick as usize) % frames.len()]
}

pub mod styles {
    use super::{Modifier, Palette, Style};

    #[must_use]
    pub fn brand(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.primary)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn tab_active(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.bg_dark)
            .bg(palette.accent)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn tab_inactive(palette: &Palette) -> Style {
        Style::default().fg(palette.text_secondary)
    }

    #[must_use]
    pub fn card(palette: &Palette) -> Style {
        Style::default().fg(palette.text_primary).bg(palette.bg_panel)
    }

    #[must_use]
    pub fn card_selected(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.text_primary)
            .bg(palette.bg_highlight)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn focused_label(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_hint(palette: &Palette) -> Style {
        Style::default().fg(palette.text_muted)
    }

    #[must_use]
    pub fn key_highlight(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.key)
            .add_modifier(Modifier::BOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::{glyphs, palette, spinner_frame};
    use reel_engine::UiOptions;

    #[test]
    fn spinner_frame_cycles() {
        let options = UiOptions::default();
        assert_ne!(spinner_frame(0, options), spinner_frame(1, options));
        assert_eq!(spinner_frame(0, options), spinner_frame(4, options));
    }

    #[test]
    fn ascii_mode_uses_plain_markers() {
        let options = UiOptions {
            ascii_only: true,
            high_contrast: false,
        };
        let glyphs = glyphs(options);
        assert_eq!(glyphs.wishlisted, "*");
        assert!(glyphs.spinner_frames.iter().all(|f| f.is_ascii()));
    }

    #[test]
    fn high_contrast_swaps_to_terminal_colors() {
        let options = UiOptions {
            ascii_only: false,
            high_contrast: true,
        };
        assert_eq!(palette(options).bg_dark, ratatui::style::Color::Black);
    }
}
