//! Color theme system for planrev.
//!
//! A `Theme` holds named `ratatui::style::Color` fields covering every UI surface
//! planrev renders. Two built-in themes are provided:
//!
//! - `dark` uses ANSI 16 colors so it works on any terminal, including 256-color
//!   SSH sessions with no truecolor support.
//! - `catppuccin_mocha` uses the Catppuccin Mocha palette in RGB and needs truecolor.

use planrev_core::pane::LineKind;
use ratatui::style::Color;

/// All color values used across planrev's UI surfaces.
#[derive(Debug, Clone)]
pub struct Theme {
    // Panel borders
    /// Border color for the pane that receives scroll commands.
    pub border_active: Color,
    pub border_inactive: Color,

    // Pane content
    /// Highlighted text: new segments and the new span of a replacement.
    pub line_added: Color,
    /// The old span of a replacement.
    pub line_removed: Color,
    /// Surrounding context lines.
    pub line_context: Color,
    pub line_plain: Color,

    // Sidebar
    pub sidebar_file: Color,
    pub sidebar_file_selected: Color,
    /// "new file" / "full file" entries.
    pub sidebar_sentinel: Color,
    pub sidebar_highlight_bg: Color,

    // Status bar
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    pub status_info: Color,
    pub status_error: Color,
}

impl Theme {
    /// Returns the built-in dark theme using ANSI 16 colors.
    pub fn dark() -> Self {
        Self {
            border_active: Color::Cyan,
            border_inactive: Color::DarkGray,

            line_added: Color::Green,
            line_removed: Color::Red,
            line_context: Color::DarkGray,
            line_plain: Color::Reset,

            sidebar_file: Color::Reset,
            sidebar_file_selected: Color::Cyan,
            sidebar_sentinel: Color::Yellow,
            sidebar_highlight_bg: Color::DarkGray,

            status_bar_bg: Color::DarkGray,
            status_bar_fg: Color::White,
            status_info: Color::Cyan,
            status_error: Color::Red,
        }
    }

    /// Returns the Catppuccin Mocha theme using RGB truecolor values.
    ///
    /// Palette source: <https://github.com/catppuccin/catppuccin> Mocha variant.
    pub fn catppuccin_mocha() -> Self {
        let green = Color::Rgb(166, 227, 161); // #a6e3a1
        let red = Color::Rgb(243, 139, 168); // #f38ba8
        let yellow = Color::Rgb(249, 226, 175); // #f9e2af
        let lavender = Color::Rgb(180, 190, 254); // #b4befe
        let overlay1 = Color::Rgb(127, 132, 156); // #7f849c
        let surface1 = Color::Rgb(69, 71, 90); // #45475a
        let surface0 = Color::Rgb(49, 50, 68); // #313244
        let text = Color::Rgb(205, 214, 244); // #cdd6f4
        let peach = Color::Rgb(250, 179, 135); // #fab387

        Self {
            border_active: lavender,
            border_inactive: overlay1,

            line_added: green,
            line_removed: red,
            line_context: overlay1,
            line_plain: text,

            sidebar_file: text,
            sidebar_file_selected: lavender,
            sidebar_sentinel: yellow,
            sidebar_highlight_bg: surface0,

            status_bar_bg: surface1,
            status_bar_fg: text,
            status_info: lavender,
            status_error: peach,
        }
    }

    /// Resolves a theme name to the corresponding built-in theme.
    ///
    /// Unknown names fall back to `dark()` so a typo in config never prevents startup.
    pub fn from_name(name: &str) -> Self {
        match name {
            "catppuccin-mocha" | "catppuccin_mocha" => Self::catppuccin_mocha(),
            "dark" => Self::dark(),
            other => {
                tracing::warn!(theme = other, "unknown theme, falling back to 'dark'");
                Self::dark()
            }
        }
    }

    /// Foreground color for a pane line of the given kind.
    pub fn line_color(&self, kind: LineKind) -> Color {
        match kind {
            LineKind::Added => self.line_added,
            LineKind::Removed => self.line_removed,
            LineKind::Context => self.line_context,
            LineKind::Plain => self.line_plain,
        }
    }
}
