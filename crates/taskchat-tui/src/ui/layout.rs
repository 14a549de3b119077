//! Layout helpers for the taskchat TUI.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Sidebar width when the terminal is wide enough to show it.
pub const SIDEBAR_WIDTH: u16 = 36;

/// Minimum terminal width at which the sidebar is shown.
const SIDEBAR_MIN_TOTAL_WIDTH: u16 = 80;

/// Areas of the chat screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatLayout {
    pub header: Rect,
    pub transcript: Rect,
    pub sidebar: Option<Rect>,
    pub input: Rect,
    pub status: Rect,
}

/// Create a centered rect with fixed dimensions.
pub fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

/// Split the screen into header, transcript, sidebar, input and status bar.
///
/// The sidebar is dropped on narrow terminals.
pub fn chat_layout(area: Rect) -> ChatLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(5),    // Transcript + sidebar
            Constraint::Length(3), // Input
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let (transcript, sidebar) = if area.width >= SIDEBAR_MIN_TOTAL_WIDTH {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(20), Constraint::Length(SIDEBAR_WIDTH)])
            .split(rows[1]);
        (columns[0], Some(columns[1]))
    } else {
        (rows[1], None)
    };

    ChatLayout {
        header: rows[0],
        transcript,
        sidebar,
        input: rows[2],
        status: rows[3],
    }
}
