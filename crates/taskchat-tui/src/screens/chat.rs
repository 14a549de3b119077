//! Chat screen: header, transcript, quick actions sidebar and input.

use crate::app::{App, Focus};
use crate::screens::Screen;
use crate::transcript::{message_lines, thinking_line};
use crate::ui::chat_layout;
use crate::ui::text::truncate_to_width;
use crate::ui::theme::{Styles, Symbols};
use crate::ui::widgets::{KeyHint, StatusBar};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use taskchat_engine::{Sender, EXAMPLE_PROMPTS, QUICK_ACTIONS};

/// The chat screen.
pub struct ChatScreen;

impl Screen for ChatScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        let layout = chat_layout(area);

        render_header(app, layout.header, buf);
        render_transcript(app, layout.transcript, buf);
        if let Some(sidebar) = layout.sidebar {
            render_sidebar(app, sidebar, buf);
        }
        render_input(app, layout.input, buf);

        let hints = vec![
            KeyHint::new("Enter", "Send"),
            KeyHint::new("Tab", "Focus"),
            KeyHint::new("Alt+1-4", "Quick"),
            KeyHint::new("PgUp/PgDn", "Scroll"),
            KeyHint::new("F1", "Help"),
        ];
        let mut status_bar = StatusBar::new("Chat").hints(hints);
        if let Some(notification) = &app.notification {
            status_bar = status_bar.right(notification).right_style(Styles::warning());
        } else {
            status_bar = status_bar.right(&app.base_url);
        }
        status_bar.render(layout.status, buf);
    }
}

fn panel(title: &str, focused: bool) -> Block<'_> {
    Block::default()
        .title(title)
        .title_style(Styles::title())
        .borders(Borders::ALL)
        .border_style(if focused {
            Styles::border_active()
        } else {
            Styles::border()
        })
        .style(Styles::default())
}

fn render_header(app: &App, area: Rect, buf: &mut Buffer) {
    let block = panel(" 🤖 AI Todo Chatbot ", false);
    let inner = block.inner(area);
    block.render(area, buf);

    let line = Line::from(vec![
        Span::styled("Gemini AI Powered", Styles::highlight()),
        Span::styled(" │ ", Styles::dim()),
        Span::styled(format!("User: {}", app.chat.session_id()), Styles::default()),
        Span::styled(" │ ", Styles::dim()),
        Span::styled(
            "Natural language task management with Gemini AI",
            Styles::dim(),
        ),
    ]);
    Paragraph::new(line).render(inner, buf);
}

#[allow(clippy::cast_possible_truncation)]
fn render_transcript(app: &App, area: Rect, buf: &mut Buffer) {
    let following = app.transcript_scroll == 0;
    let mut block = panel(" Conversation ", false);
    if !following {
        block = block.title(
            Line::from(Span::styled(" PgDn to follow ", Styles::warning())).right_aligned(),
        );
    }
    let inner = block.inner(area);
    block.render(area, buf);

    let width = usize::from(inner.width);
    let messages = app.chat.conversation().messages();
    let latest_ai = messages.iter().rposition(|m| m.sender == Sender::Ai);

    let mut lines = Vec::new();
    for (i, message) in messages.iter().enumerate() {
        let selected = (app.focus == Focus::Suggestions && Some(i) == latest_ai)
            .then_some(app.selected_suggestion);
        lines.extend(message_lines(message, width, selected));
    }
    if app.is_loading() {
        lines.push(thinking_line(app.tick));
    }

    // Offset counts from the top; the scroll state counts from the bottom
    let max_scroll = lines.len().saturating_sub(usize::from(inner.height));
    app.max_transcript_scroll.set(max_scroll);
    let offset = max_scroll - app.transcript_scroll.min(max_scroll);

    Paragraph::new(lines)
        .style(Styles::default())
        .scroll((offset.min(usize::from(u16::MAX)) as u16, 0))
        .render(inner, buf);
}

#[allow(clippy::cast_possible_truncation)]
fn render_sidebar(app: &App, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(QUICK_ACTIONS.len() as u16 + 2),
            Constraint::Min(0),
        ])
        .split(area);

    let focused = app.focus == Focus::QuickActions;
    let block = panel(" Quick Actions ", focused);
    let inner = block.inner(chunks[0]);
    block.render(chunks[0], buf);

    let quick_lines: Vec<Line> = QUICK_ACTIONS
        .iter()
        .enumerate()
        .map(|(i, quick)| {
            let selected = focused && i == app.selected_quick;
            let marker = if selected {
                Symbols::SELECTED
            } else {
                Symbols::UNSELECTED
            };
            let style = if app.is_loading() {
                Styles::dim()
            } else if selected {
                Styles::highlight()
            } else {
                Styles::default()
            };
            let label = format!("{marker}{}. {} {}", i + 1, quick.emoji, quick.text);
            Line::from(Span::styled(
                truncate_to_width(&label, usize::from(inner.width)),
                style,
            ))
        })
        .collect();
    Paragraph::new(quick_lines).render(inner, buf);

    let block = panel(" Examples ", false);
    let inner = block.inner(chunks[1]);
    block.render(chunks[1], buf);

    let example_lines: Vec<Line> = EXAMPLE_PROMPTS
        .iter()
        .map(|example| Line::from(Span::styled(format!("  • {example}"), Styles::dim())))
        .collect();
    Paragraph::new(example_lines).render(inner, buf);
}

fn render_input(app: &App, area: Rect, buf: &mut Buffer) {
    let loading = app.is_loading();
    let focused = app.focus == Focus::Input && !loading;

    let (send_label, send_style): (&str, Style) = if loading {
        (" Sending... ", Styles::warning())
    } else if app.input_state.is_blank() {
        (" Send ", Styles::dim())
    } else {
        (" Send ", Styles::highlight())
    };

    let block = panel(" Message ", focused)
        .title(Line::from(Span::styled(send_label, send_style)).right_aligned());
    let inner = block.inner(area);
    block.render(area, buf);

    let placeholder = if loading {
        "Waiting for reply..."
    } else {
        "Type your message..."
    };
    app.input_state
        .widget()
        .focused(focused)
        .placeholder(placeholder)
        .render(inner, buf);
}
