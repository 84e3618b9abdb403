//! Application state and key handling

use crate::config::AppConfig;
use crate::controller::ContactController;
use crate::delivery::NotificationSender;
use crate::state::{ContactForm, Form, FormField};
use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::{Stream, StreamExt};
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Window for the second Ctrl+C press
const QUIT_WINDOW: Duration = Duration::from_millis(1000);

/// Main application struct
pub struct App {
    /// Form controller
    pub controller: ContactController,
    /// Whether the app should quit
    quit: bool,
    /// Copy feedback message
    pub copy_message: Option<String>,
    /// Set by the send keys; consumed by the event loop after the next draw
    submit_pending: bool,
    /// Timestamp of last Ctrl+C press for double-tap quit
    pub last_ctrl_c: Option<Instant>,
}

impl App {
    /// Create a new App instance
    pub fn new(config: &AppConfig, sender: Arc<dyn NotificationSender>) -> Self {
        Self {
            controller: ContactController::new(config, sender),
            quit: false,
            copy_message: None,
            submit_pending: false,
            last_ctrl_c: None,
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// A submission is queued or in flight
    pub fn is_busy(&self) -> bool {
        self.submit_pending || self.controller.is_submitting()
    }

    /// Handle a key event
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if is_ctrl_c(&key) {
            if press_ctrl_c(&mut self.last_ctrl_c, &mut self.copy_message) {
                self.quit = true;
            }
            return;
        }

        // Fields are locked while sending
        if self.is_busy() {
            return;
        }

        // Clear any status messages on key press
        self.copy_message = None;

        match key.code {
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.request_submit();
            }
            KeyCode::Char('y') if key.modifiers.contains(crate::platform::COPY_MODIFIER) => {
                self.copy_contact_email();
            }
            KeyCode::Tab => self.form_mut(|form| form.next_field()),
            KeyCode::BackTab => self.form_mut(|form| form.prev_field()),
            KeyCode::Enter => self.handle_enter(),
            KeyCode::Left => self.edit_active(FormField::prev_choice),
            KeyCode::Right => self.edit_active(FormField::next_choice),
            KeyCode::Backspace => self.edit_active(FormField::pop_char),
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::SUPER) =>
            {
                self.edit_active(|field| {
                    if !field.is_choice() {
                        field.push_char(c);
                    } else if c == ' ' {
                        field.next_choice();
                    }
                });
            }
            _ => {}
        }
    }

    /// Run the queued submission, if any, while draining `events`.
    ///
    /// Keys that arrive during the send are discarded, except Ctrl+C: a
    /// double tap quits and abandons the request.
    pub async fn run_pending_submit<S>(&mut self, events: &mut S) -> Result<()>
    where
        S: Stream<Item = io::Result<Event>> + Unpin,
    {
        if !std::mem::take(&mut self.submit_pending) {
            return Ok(());
        }

        let Self {
            controller,
            quit,
            copy_message,
            last_ctrl_c,
            ..
        } = self;
        let submit = controller.submit();
        tokio::pin!(submit);
        let mut events_open = true;

        loop {
            tokio::select! {
                status = &mut submit => {
                    debug!(
                        success = status.is_success(),
                        detail = status.message(),
                        "Submission finished"
                    );
                    return Ok(());
                }
                event = events.next(), if events_open => match event {
                    Some(Ok(Event::Key(key)))
                        if key.kind == KeyEventKind::Press && is_ctrl_c(&key) =>
                    {
                        if press_ctrl_c(last_ctrl_c, copy_message) {
                            warn!("Quit while sending, submission abandoned");
                            *quit = true;
                            return Ok(());
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                    None => events_open = false,
                },
            }
        }
    }

    fn request_submit(&mut self) {
        self.submit_pending = true;
    }

    fn handle_enter(&mut self) {
        let form = self.controller.form();
        if form.is_send_row_active() {
            self.request_submit();
        } else if form.is_active_field_multiline() {
            self.edit_active(|field| field.push_char('\n'));
        } else {
            self.form_mut(|form| form.next_field());
        }
    }

    /// Edit a copy of the focused field and store the result through the
    /// controller's `update_field`
    fn edit_active(&mut self, edit: impl FnOnce(&mut FormField)) {
        let Some(mut field) = self.controller.form().get_active_field().cloned() else {
            return;
        };
        edit(&mut field);
        self.controller.update_field(&field.name, field.as_text());
    }

    fn form_mut(&mut self, edit: impl FnOnce(&mut ContactForm)) {
        if let Some(form) = self.controller.form_mut() {
            edit(form);
        }
    }

    fn copy_contact_email(&mut self) {
        let email = self.controller.contact_email().to_string();
        match self.copy_to_clipboard(&email) {
            Ok(()) => self.copy_message = Some(format!("Copied {email}")),
            Err(e) => {
                warn!(error = %e, "Clipboard unavailable");
                self.copy_message = Some(format!("Contact us at {email}"));
            }
        }
    }

    fn copy_to_clipboard(&self, text: &str) -> Result<()> {
        use arboard::Clipboard;
        let mut clipboard = Clipboard::new()?;
        clipboard.set_text(text)?;
        Ok(())
    }
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Record a Ctrl+C press. Returns true when it completes a double tap.
fn press_ctrl_c(last_ctrl_c: &mut Option<Instant>, copy_message: &mut Option<String>) -> bool {
    let now = Instant::now();
    if matches!(*last_ctrl_c, Some(t) if now.duration_since(t) < QUIT_WINDOW) {
        return true;
    }
    *last_ctrl_c = Some(now);
    *copy_message = Some("Press Ctrl+C again to quit".to_string());
    false
}
