//! Contact form rendering

use super::field_renderer::draw_field;
use crate::app::App;
use crate::state::{Form, SubmitStatus, SEND_ROW};
use crate::ui::components::{render_action_button, BUTTON_HEIGHT};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Draw the contact form, its status panel and the send button
pub fn draw_contact_form(frame: &mut Frame, area: Rect, app: &App) {
    let form = app.controller.form();
    let is_enabled = !app.is_busy();

    let block = Block::default()
        .title(" Start your project ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),             // Name | Email
            Constraint::Length(3),             // Company
            Constraint::Length(3),             // Budget | Project type
            Constraint::Min(6),                // Message
            Constraint::Length(4),             // Status
            Constraint::Length(BUTTON_HEIGHT), // Send
        ])
        .margin(1)
        .split(inner);

    let halves = |area: Rect| {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area)
    };

    let top = halves(chunks[0]);
    let choices = halves(chunks[2]);
    let slots = [top[0], top[1], chunks[1], choices[0], choices[1], chunks[3]];

    for (index, slot) in slots.into_iter().enumerate() {
        if let Some(field) = form.get_field(index) {
            draw_field(
                frame,
                slot,
                field,
                form.active_field() == index,
                is_enabled,
            );
        }
    }

    draw_status(frame, chunks[4], app);

    let label = if is_enabled {
        "Send message ➜"
    } else {
        "Sending..."
    };
    render_action_button(
        frame,
        chunks[5],
        label,
        form.active_field() == SEND_ROW,
        is_enabled,
        Some(Color::Green),
    );
}

/// Draw the result of the last attempt
fn draw_status(frame: &mut Frame, area: Rect, app: &App) {
    let controller = &app.controller;

    let lines = if app.is_busy() {
        vec![Line::from(Span::styled(
            "⟳ Sending your message...",
            Style::default().fg(Color::Yellow),
        ))]
    } else {
        match controller.status() {
            SubmitStatus::None => vec![Line::from(Span::styled(
                format!(
                    "Fill in the form and press {} to send.",
                    crate::platform::SAVE_SHORTCUT
                ),
                Style::default().fg(Color::DarkGray),
            ))],
            SubmitStatus::Success(message) => {
                let mut line = vec![Span::styled(
                    format!("✔ {message}"),
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                )];
                if let Some(at) = controller.last_attempt_at() {
                    line.push(Span::styled(
                        format!("  ({})", at.format("%H:%M UTC")),
                        Style::default().fg(Color::DarkGray),
                    ));
                }
                vec![Line::from(line)]
            }
            SubmitStatus::Error(message) => vec![
                Line::from(Span::styled(
                    format!("✖ {message}"),
                    Style::default().fg(Color::Red),
                )),
                Line::from(Span::styled(
                    format!(
                        "Reach us directly at {} ({} to copy)",
                        controller.contact_email(),
                        crate::platform::COPY_SHORTCUT
                    ),
                    Style::default().fg(Color::DarkGray),
                )),
            ],
        }
    };

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(paragraph, area);
}
