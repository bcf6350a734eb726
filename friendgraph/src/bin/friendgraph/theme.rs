//! Colors and glyphs for status lines, post tables and `--help` output.

use clap::builder::{Styles, styling::AnsiColor};
use colored::{Color, control::ShouldColorize};
use once_cell::sync::Lazy;

/// Glyph and color of one kind of status line.
#[derive(Clone, Copy)]
pub struct Tone {
    pub glyph: &'static str,
    pub color: Color,
}

pub const SUCCESS: Tone = Tone {
    glyph: "✓",
    color: Color::Green,
};
pub const FAILURE: Tone = Tone {
    glyph: "✗",
    color: Color::Red,
};
pub const CAUTION: Tone = Tone {
    glyph: "⚠",
    color: Color::Yellow,
};
pub const NOTICE: Tone = Tone {
    glyph: "ℹ",
    color: Color::Blue,
};
pub const DETAIL: Tone = Tone {
    glyph: "→",
    color: Color::BrightBlack,
};

pub const HEADING: Color = Color::BrightBlue;
pub const LABEL: Color = Color::BrightCyan;
pub const VALUE: Color = Color::White;
pub const MUTED: Color = Color::BrightBlack;
/// Section titles in help appendices.
pub const TITLE: Color = Color::Cyan;
/// Example command lines.
pub const COMMAND: Color = Color::Magenta;

pub const BULLET: &str = "•";
pub const ARROW: &str = "→";
pub const HEART: &str = "♥";
pub const REPLY: &str = "↳";

/// Whether the terminal takes color, honouring `NO_COLOR` and `CLICOLOR`.
pub static TERMINAL_COLOR: Lazy<bool> = Lazy::new(|| ShouldColorize::from_env().should_colorize());

/// clap's own help and error rendering, in the same colors as [`TITLE`] and [`COMMAND`].
pub fn help_styles() -> Styles {
    Styles::styled()
        .usage(AnsiColor::BrightBlue.on_default().bold())
        .header(AnsiColor::Cyan.on_default().bold())
        .literal(AnsiColor::Magenta.on_default())
        .placeholder(AnsiColor::BrightBlack.on_default())
        .valid(AnsiColor::Green.on_default())
        .invalid(AnsiColor::Yellow.on_default())
        .error(AnsiColor::Red.on_default().bold())
}
