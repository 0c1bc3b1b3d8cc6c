//! UI Rendering
//!
//! Main UI layout and rendering logic for the TUI.

use crate::chat::MessageRole;
use crate::tui::app::{App, PipelineStage, View};
use crate::tui::theme::{Icons, Theme};
use crate::tui::widgets;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const INDENT: &str = "  ";

/// Render the main UI
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(4), // Progress
            Constraint::Min(10),   // Messages
            Constraint::Length(4), // Input
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, chunks[0], app);
    widgets::render_progress(frame, chunks[1], &app.pipeline_stage);
    render_messages(frame, chunks[2], app);
    render_input(frame, chunks[3], app);
    render_status_bar(frame, chunks[4], app);

    if app.view == View::Help {
        render_help(frame);
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let title_text = vec![Line::from(vec![
        Span::raw("🔎 "),
        Span::styled("Research", Theme::title()),
        Span::styled(" Chatbot", Theme::text_secondary()),
        Span::raw("  "),
        Span::styled(format!("[{}]", app.model_label), Theme::text_dim()),
    ])];

    let title = Paragraph::new(title_text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border()),
    );

    frame.render_widget(title, area);
}

/// Render the message history
fn render_messages(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Messages ")
        .borders(Borders::ALL)
        .border_style(if app.view == View::Chat {
            Theme::border_focused()
        } else {
            Theme::border()
        });

    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let max_line_width = (inner_area.width as usize).saturating_sub(INDENT.len());
    let mut lines: Vec<Line> = Vec::new();

    for msg in app.session.messages() {
        let (prefix, style) = match msg.role {
            MessageRole::User => ("You", Theme::user_message()),
            MessageRole::Assistant => ("Assistant", Theme::assistant_message()),
            MessageRole::System => ("System", Theme::system_message()),
        };

        lines.push(Line::from(vec![
            Span::styled(format!("{}: ", prefix), style),
            Span::styled(msg.timestamp.format("%H:%M").to_string(), Theme::text_dim()),
        ]));

        for line in msg.content.lines() {
            for chunk in wrap_line(line, max_line_width) {
                lines.push(Line::from(vec![
                    Span::raw(INDENT),
                    Span::styled(chunk, Theme::text()),
                ]));
            }
        }

        lines.push(Line::from(""));
    }

    if app.pipeline_stage.is_running() {
        lines.push(Line::from(vec![
            Span::styled("Assistant: ", Theme::assistant_message()),
            Span::styled(Icons::CURSOR, Theme::active()),
        ]));
    }

    let paragraph = Paragraph::new(lines).scroll((app.scroll_offset, 0));
    frame.render_widget(paragraph, inner_area);
}

/// Break a line into chunks of at most `max_width` characters,
/// preferring to split on whitespace.
pub fn wrap_line(line: &str, max_width: usize) -> Vec<String> {
    if max_width == 0 || line.chars().count() <= max_width {
        return vec![line.to_string()];
    }

    let mut wrapped = Vec::new();
    let mut remaining = line;

    while remaining.chars().count() > max_width {
        let limit = remaining
            .char_indices()
            .nth(max_width)
            .map(|(idx, _)| idx)
            .unwrap_or(remaining.len());

        let split_at = if remaining[limit..].starts_with(char::is_whitespace) {
            limit
        } else {
            remaining[..limit]
                .rfind(char::is_whitespace)
                .filter(|&idx| idx > 0)
                .unwrap_or(limit)
        };

        let (chunk, rest) = remaining.split_at(split_at);
        wrapped.push(chunk.trim_end().to_string());
        remaining = rest.trim_start();
    }

    if !remaining.is_empty() {
        wrapped.push(remaining.to_string());
    }

    wrapped
}

fn render_input(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(if app.pipeline_stage.is_running() {
            " Input (researching...) "
        } else {
            " Input "
        })
        .borders(Borders::ALL)
        .border_style(if app.view == View::Chat {
            Theme::border_focused()
        } else {
            Theme::border()
        });

    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(&app.input, inner);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let status = match &app.pipeline_stage {
        PipelineStage::Idle => Span::styled("Ready", Theme::text_secondary()),
        PipelineStage::Running(stage) => Span::styled(format!("Running {}...", stage), Theme::active()),
        PipelineStage::Complete => Span::styled("Complete", Theme::complete()),
        PipelineStage::Error { .. } => Span::styled("Research failed", Theme::error()),
    };

    let shortcuts = vec![
        Span::styled(" [Enter]", Theme::shortcut_key()),
        Span::styled(" Send ", Theme::shortcut_desc()),
        Span::styled("[Ctrl+N]", Theme::shortcut_key()),
        Span::styled(" New session ", Theme::shortcut_desc()),
        Span::styled("[Ctrl+Q]", Theme::shortcut_key()),
        Span::styled(" Quit ", Theme::shortcut_desc()),
        Span::styled("[F1]", Theme::shortcut_key()),
        Span::styled(" Help", Theme::shortcut_desc()),
    ];

    let line = Line::from(
        std::iter::once(status)
            .chain(std::iter::once(Span::raw(" │ ")))
            .chain(shortcuts)
            .collect::<Vec<_>>(),
    );

    frame.render_widget(Paragraph::new(line), area);
}

fn shortcut_line(key: &'static str, description: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<13}", key), Theme::shortcut_key()),
        Span::styled(description, Theme::text()),
    ])
}

/// Render the help modal
fn render_help(frame: &mut Frame) {
    let area = centered_rect(60, 60, frame.area());
    frame.render_widget(Clear, area);

    let help_lines = vec![
        Line::from(Span::styled("Keyboard Shortcuts", Theme::heading())),
        Line::from(""),
        shortcut_line("Enter", "Send question"),
        shortcut_line("Ctrl+N", "Start a new chat session"),
        shortcut_line("Ctrl+Q", "Quit application"),
        shortcut_line("Ctrl+C", "Force quit"),
        shortcut_line("↑/↓", "Scroll messages"),
        shortcut_line("PageUp/Down", "Scroll page"),
        shortcut_line("Esc", "Close help"),
        shortcut_line("F1 / Ctrl+H", "Show this help"),
        Line::from(""),
        Line::from(Span::styled(
            "Each question runs: analyze → search → extract → draft → refine → follow-ups",
            Theme::text_secondary(),
        )),
        Line::from(""),
        Line::from(Span::styled("Press any key to close", Theme::text_dim())),
    ];

    let paragraph = Paragraph::new(help_lines).block(
        Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_style(Theme::border_focused()),
    );

    frame.render_widget(paragraph, area);
}

/// Helper to create a centered rect
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_line_untouched() {
        assert_eq!(wrap_line("Paris", 10), vec!["Paris"]);
        assert_eq!(wrap_line("", 10), vec![""]);
    }

    #[test]
    fn test_wraps_on_whitespace() {
        assert_eq!(
            wrap_line("hello world foo", 11),
            vec!["hello world", "foo"]
        );
        assert_eq!(
            wrap_line("the capital of France is Paris", 12),
            vec!["the capital", "of France is", "Paris"]
        );
    }

    #[test]
    fn test_hard_split_without_whitespace() {
        assert_eq!(wrap_line("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_multibyte_characters() {
        assert_eq!(wrap_line("ééééé", 2), vec!["éé", "éé", "é"]);
    }

    #[test]
    fn test_centered_rect_inside_area() {
        let area = Rect::new(0, 0, 100, 50);
        let popup = centered_rect(60, 60, area);
        assert_eq!(popup.width, 60);
        assert_eq!(popup.height, 30);
        assert_eq!(popup.x, 20);
    }
}
