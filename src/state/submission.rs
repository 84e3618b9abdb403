//! Contact submission entity, validation and the last-attempt status

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

static RE_EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email regex"));

/// One contact attempt, as typed by the user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub project_type: String,
    pub budget: String,
    pub company: String,
    pub current_url: String,
}

/// Local validation failures. `Display` is the text shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter your name.")]
    MissingName,
    #[error("Please enter your email address.")]
    MissingEmail,
    #[error("Please enter a valid email address.")]
    InvalidEmail,
    #[error("Please tell us about your project.")]
    MissingMessage,
}

/// Returns true if `email` has the `local@domain.tld` shape
pub fn is_valid_email(email: &str) -> bool {
    RE_EMAIL.is_match(email)
}

impl ContactSubmission {
    /// Check required fields in form order: name, email, message.
    ///
    /// Name and message must contain something other than whitespace; the
    /// email is matched exactly as typed.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }
        if self.email.is_empty() {
            return Err(ValidationError::MissingEmail);
        }
        if !is_valid_email(&self.email) {
            return Err(ValidationError::InvalidEmail);
        }
        if self.message.trim().is_empty() {
            return Err(ValidationError::MissingMessage);
        }
        Ok(())
    }

    /// Free-text message followed by the optional classification block
    pub fn combined_message(&self) -> String {
        let combined = format!(
            "\n{}\n\n-----------------------------\n\
             🔹 Company: {}\n\
             🔹 Project type: {}\n\
             🔹 Budget: {}\n\
             -----------------------------\n",
            self.message,
            or_na(&self.company),
            or_na(&self.project_type),
            or_na(&self.budget),
        );
        combined.trim().to_string()
    }
}

fn or_na(value: &str) -> &str {
    if value.trim().is_empty() {
        "N/A"
    } else {
        value
    }
}

/// Result of the last submission attempt
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmitStatus {
    #[default]
    None,
    Success(String),
    Error(String),
}

impl SubmitStatus {
    pub fn message(&self) -> &str {
        match self {
            SubmitStatus::None => "",
            SubmitStatus::Success(msg) | SubmitStatus::Error(msg) => msg,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SubmitStatus::Success(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, SubmitStatus::Error(_))
    }
}
