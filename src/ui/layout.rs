//! Layout components (header, status bar)

use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Split the screen into header, content and status bar
pub fn create_layout(area: Rect) -> (Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    (chunks[0], chunks[1], chunks[2])
}

/// Draw the header line
pub fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let spans = vec![
        Span::styled(
            " ☾ Luna Lab ",
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "Transform your vision into stellar digital reality.",
            Style::default().fg(Color::Gray),
        ),
        Span::styled(
            format!("  via {}", app.controller.channel()),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![];

    // Submission indicator
    let indicator = if app.is_busy() {
        Span::styled(" ● ", Style::default().fg(Color::Yellow))
    } else if app.controller.status().is_error() {
        Span::styled(" ● ", Style::default().fg(Color::Red))
    } else {
        Span::styled(" ● ", Style::default().fg(Color::Green))
    };
    spans.push(indicator);

    spans.push(Span::styled(
        get_form_hints(app),
        Style::default().fg(Color::DarkGray),
    ));

    // Copy message
    if let Some(msg) = &app.copy_message {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(msg, Style::default().fg(Color::Green)));
    }

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, area);

    // Quit hint on the right (double Ctrl+C to quit)
    let quit_hint = " ^C^C:quit ";
    let quit_area = Rect {
        x: area.x + area.width.saturating_sub(quit_hint.len() as u16),
        y: area.y,
        width: (quit_hint.len() as u16).min(area.width),
        height: 1,
    };
    let quit_widget =
        Paragraph::new(quit_hint).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(quit_widget, quit_area);
}

/// Keyboard hints for the focused field
fn get_form_hints(app: &App) -> String {
    let form = app.controller.form();
    let save = crate::platform::SAVE_SHORTCUT;
    if app.is_busy() {
        "Sending...".to_string()
    } else if form.is_send_row_active() {
        format!("Tab:next  Enter:send  {save}:send")
    } else if form.is_active_field_multiline() {
        format!("Tab:next  Enter:newline  {save}:send")
    } else if form
        .get_active_field()
        .is_some_and(|f| f.is_choice())
    {
        format!("Tab:next  ←/→:choose  {save}:send")
    } else {
        format!("Tab:next  {save}:send")
    }
}
