//! Conversion of conversation messages into transcript lines.
//!
//! Lines are pre-wrapped to the pane width so the screen can compute
//! scroll offsets from a plain line count.

use chrono::Local;
use ratatui::text::{Line, Span};
use taskchat_engine::{Message, Sender};

use crate::ui::text::wrap_text;
use crate::ui::theme::{spinner, Styles, Symbols};

const INDENT: &str = "  ";

/// Lines for one message bubble, followed by a blank separator line.
///
/// `selected_suggestion` highlights one of the message's suggested actions.
pub fn message_lines(
    message: &Message,
    width: usize,
    selected_suggestion: Option<usize>,
) -> Vec<Line<'static>> {
    let mut lines = vec![header_line(message)];

    let text_style = if message.is_transport_error() {
        Styles::error()
    } else {
        Styles::default()
    };
    for row in wrap_text(&message.text, width.saturating_sub(INDENT.len())) {
        lines.push(Line::from(Span::styled(format!("{INDENT}{row}"), text_style)));
    }

    if !message.tool_calls.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("{INDENT}🛠️ Actions:"),
            Styles::dim(),
        )));
        let nested = format!("{INDENT}{INDENT}");
        for summary in message.tool_summaries() {
            for row in wrap_text(&summary, width.saturating_sub(nested.len())) {
                lines.push(Line::from(Span::styled(
                    format!("{nested}{row}"),
                    Styles::success(),
                )));
            }
        }
    }

    if !message.suggested_actions.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("{INDENT}💡 Try:"),
            Styles::dim(),
        )));
        let text_width = width.saturating_sub(INDENT.len() * 2 + Symbols::UNSELECTED.len());
        for (i, action) in message.suggested_actions.iter().enumerate() {
            let (marker, style) = if selected_suggestion == Some(i) {
                (Symbols::SELECTED, Styles::highlight())
            } else {
                (Symbols::UNSELECTED, Styles::warning())
            };
            // Continuation rows line up under the text, not the marker
            for (row_index, row) in wrap_text(action, text_width).into_iter().enumerate() {
                let lead = if row_index == 0 { marker } else { Symbols::UNSELECTED };
                lines.push(Line::from(Span::styled(
                    format!("{INDENT}{INDENT}{lead}{row}"),
                    style,
                )));
            }
        }
    }

    lines.push(Line::from(""));
    lines
}

fn header_line(message: &Message) -> Line<'static> {
    let time = message.timestamp.with_timezone(&Local).format("%H:%M");
    Line::from(vec![
        Span::styled(
            format!("{} {}", message.sender.icon(), message.sender.display_name()),
            Styles::sender(message.sender),
        ),
        Span::styled(format!("  {time}"), Styles::dim()),
    ])
}

/// Transient indicator shown while a reply is outstanding.
pub fn thinking_line(tick: usize) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{} ", Sender::Ai.icon()), Styles::sender(Sender::Ai)),
        Span::styled(
            format!("{} Gemini AI is thinking...", spinner(tick)),
            Styles::dim(),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::line_text;
    use insta::assert_snapshot;
    use taskchat_engine::ToolCall;

    fn groceries_reply() -> Message {
        Message::ai_reply(
            "Added!",
            vec![ToolCall::new("add_task").with_field("title", "Buy groceries")],
            vec!["List all tasks".into(), "See pending tasks".into()],
        )
    }

    #[test]
    fn test_user_message_lines() {
        let lines = message_lines(&Message::user("Add task: Buy groceries"), 40, None);
        assert_eq!(lines.len(), 3);
        assert!(line_text(&lines[0]).starts_with("👤 You  "));
        assert_eq!(line_text(&lines[1]), "  Add task: Buy groceries");
        assert_eq!(line_text(&lines[2]), "");
    }

    #[test]
    fn test_reply_with_annotations() {
        let lines = message_lines(&groceries_reply(), 40, None);
        assert!(line_text(&lines[0]).starts_with("🤖 AI Assistant  "));

        let body: Vec<String> = lines[1..lines.len() - 1]
            .iter()
            .map(|l| line_text(l).trim().to_string())
            .collect();
        assert_snapshot!(body.join("\n"), @r"
        Added!
        🛠️ Actions:
        ✅ Added: Buy groceries
        💡 Try:
        List all tasks
        See pending tasks
        ");
    }

    #[test]
    fn test_selected_suggestion_marked() {
        let lines = message_lines(&groceries_reply(), 40, Some(1));
        let texts: Vec<String> = lines.iter().map(line_text).collect();
        assert!(texts.contains(&"    ▸ See pending tasks".to_string()));
        assert!(texts.contains(&"      List all tasks".to_string()));
    }

    #[test]
    fn test_long_text_wraps_to_width() {
        let message = Message::ai("one two three four five six");
        let lines = message_lines(&message, 12, None);
        let body: Vec<String> = lines[1..lines.len() - 1].iter().map(line_text).collect();
        assert_eq!(body, vec!["  one two", "  three four", "  five six"]);
    }

    #[test]
    fn test_long_annotations_wrap_with_nested_indent() {
        let message = Message::ai_reply(
            "ok",
            vec![ToolCall::new("add_task").with_field("title", "Call the plumber about the sink")],
            vec!["Show every task due before the end of next week".into()],
        );
        let texts: Vec<String> = message_lines(&message, 30, None).iter().map(line_text).collect();

        assert!(texts.iter().all(|t| crate::ui::text::visual_width(t) <= 30));
        assert!(texts.contains(&"      Show every task due".to_string()));
        assert!(texts.contains(&"      before the end of next".to_string()));
        assert!(texts.contains(&"      week".to_string()));
        assert!(texts.iter().any(|t| t.starts_with("    ") && t.ends_with("the sink")));
    }

    #[test]
    fn test_unknown_tool_keeps_header_only() {
        let message = Message::ai_reply("ok", vec![ToolCall::new("mystery")], Vec::new());
        let texts: Vec<String> = message_lines(&message, 40, None).iter().map(line_text).collect();
        assert_eq!(texts[2], "  🛠️ Actions:");
        assert_eq!(texts.len(), 4);
    }

    #[test]
    fn test_thinking_line() {
        assert!(line_text(&thinking_line(0)).contains("Gemini AI is thinking"));
    }
}
