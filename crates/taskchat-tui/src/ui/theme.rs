//! Theme and styling definitions for the taskchat TUI.

use ratatui::style::{Color, Modifier, Style};
use taskchat_engine::Sender;

/// Color palette for the TUI.
pub struct Palette;

impl Palette {
    pub const BG: Color = Color::Rgb(30, 30, 40);
    pub const FG: Color = Color::Rgb(220, 220, 230);
    pub const DIM: Color = Color::Rgb(140, 140, 160);

    /// AI messages, focus and selection.
    pub const ACCENT: Color = Color::Rgb(130, 170, 255);
    /// User messages.
    pub const USER: Color = Color::Rgb(190, 150, 255);

    pub const STATUS_BG: Color = Color::Rgb(45, 45, 60);
    pub const KEY_BG: Color = Color::Rgb(70, 90, 140);
    pub const BORDER: Color = Color::Rgb(80, 80, 100);

    /// Tool call summaries.
    pub const SUCCESS: Color = Color::Rgb(130, 220, 130);
    /// Suggestions and notifications.
    pub const WARNING: Color = Color::Rgb(240, 200, 100);
    /// Transport errors.
    pub const ERROR: Color = Color::Rgb(240, 100, 100);
}

/// Indicator symbols.
pub struct Symbols;

impl Symbols {
    pub const SELECTED: &'static str = "▸ ";
    pub const UNSELECTED: &'static str = "  ";
    pub const SPINNER: [&'static str; 4] = ["|", "/", "-", "\\"];
}

fn on_bg(fg: Color) -> Style {
    Style::default().fg(fg).bg(Palette::BG)
}

fn on_status_bar(fg: Color) -> Style {
    Style::default().fg(fg).bg(Palette::STATUS_BG)
}

/// Common styles used throughout the TUI.
pub struct Styles;

impl Styles {
    pub fn default() -> Style {
        on_bg(Palette::FG)
    }

    pub fn dim() -> Style {
        on_bg(Palette::DIM)
    }

    /// Selected item.
    pub fn highlight() -> Style {
        Self::active().add_modifier(Modifier::BOLD)
    }

    /// Cursor and prompt of the focused input.
    pub fn active() -> Style {
        on_bg(Palette::ACCENT)
    }

    pub fn success() -> Style {
        on_bg(Palette::SUCCESS)
    }

    pub fn warning() -> Style {
        on_bg(Palette::WARNING)
    }

    pub fn error() -> Style {
        on_bg(Palette::ERROR)
    }

    /// Message header for a sender.
    pub fn sender(sender: Sender) -> Style {
        let fg = match sender {
            Sender::User => Palette::USER,
            Sender::Ai => Palette::ACCENT,
        };
        on_bg(fg).add_modifier(Modifier::BOLD)
    }

    /// Panel titles.
    pub fn title() -> Style {
        Style::default()
            .fg(Palette::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    /// Mode badge at the left of the status bar.
    pub fn mode_badge() -> Style {
        Style::default().fg(Palette::BG).bg(Palette::ACCENT)
    }

    /// Key in a status bar hint.
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Palette::FG)
            .bg(Palette::KEY_BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Label in a status bar hint.
    pub fn key_label() -> Style {
        on_status_bar(Palette::FG)
    }

    pub fn status_bar() -> Style {
        on_status_bar(Palette::FG)
    }

    pub fn border() -> Style {
        Style::default().fg(Palette::BORDER)
    }

    /// Border of the focused panel.
    pub fn border_active() -> Style {
        Style::default().fg(Palette::ACCENT)
    }
}

/// Spinner frame for the given tick.
pub fn spinner(tick: usize) -> &'static str {
    Symbols::SPINNER[tick % Symbols::SPINNER.len()]
}
