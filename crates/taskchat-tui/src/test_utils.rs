//! Test utilities for taskchat-tui rendering tests.

use crate::app::App;
use crate::screens::Screen as ScreenTrait;
use ratatui::{buffer::Buffer, layout::Rect, text::Line};

/// Default terminal width for tests (wide enough to show the sidebar).
pub const TEST_WIDTH: u16 = 100;

/// Default terminal height for tests.
pub const TEST_HEIGHT: u16 = 30;

/// Create a test app with a fixed session id.
pub fn create_test_app() -> App {
    App::new_for_test()
}

/// Convert a buffer to a string, one line per row with trailing spaces trimmed.
pub fn buffer_to_string(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut result = String::new();

    for y in area.y..area.y + area.height {
        for x in area.x..area.x + area.width {
            if let Some(cell) = buffer.cell((x, y)) {
                result.push_str(cell.symbol());
            }
        }
        while result.ends_with(' ') {
            result.pop();
        }
        result.push('\n');
    }

    if result.ends_with('\n') {
        result.pop();
    }

    result
}

/// Plain text of a line, spans concatenated.
pub fn line_text(line: &Line<'_>) -> String {
    line.spans.iter().map(|span| span.content.as_ref()).collect()
}

/// Render a screen at the default test size.
pub fn render_screen_to_string<S: ScreenTrait>(screen: &S, app: &App) -> String {
    render_screen_to_string_sized(screen, app, TEST_WIDTH, TEST_HEIGHT)
}

/// Render a screen at a custom size.
pub fn render_screen_to_string_sized<S: ScreenTrait>(
    screen: &S,
    app: &App,
    width: u16,
    height: u16,
) -> String {
    let area = Rect::new(0, 0, width, height);
    let mut buffer = Buffer::empty(area);
    screen.render(app, area, &mut buffer);
    buffer_to_string(&buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::text::Span;

    #[test]
    fn test_buffer_to_string_trims_rows() {
        let area = Rect::new(0, 0, 10, 3);
        let mut buffer = Buffer::empty(area);
        buffer.set_string(0, 0, "Hello", ratatui::style::Style::default());
        buffer.set_string(0, 2, "World", ratatui::style::Style::default());

        assert_eq!(buffer_to_string(&buffer), "Hello\n\nWorld");
    }

    #[test]
    fn test_line_text_joins_spans() {
        let line = Line::from(vec![Span::raw("ab"), Span::raw(" "), Span::raw("cd")]);
        assert_eq!(line_text(&line), "ab cd");
    }

    #[test]
    fn test_create_test_app() {
        let app = create_test_app();
        assert_eq!(app.chat.session_id().as_str(), "user_1700000000000");
        assert_eq!(app.chat.conversation().len(), 1);
    }
}
