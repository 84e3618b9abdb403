//! Contact form state and focus navigation

use super::field::{ChoiceOption, FormField};
use crate::state::ContactSubmission;

pub const PROJECT_TYPES: &[ChoiceOption] = &[
    ("web-app", "Web Application"),
    ("mobile-app", "Mobile Application"),
    ("website", "Website"),
    ("ecommerce", "E-commerce"),
    ("other", "Other"),
];

pub const BUDGETS: &[ChoiceOption] = &[
    ("5k-15k", "$5k - $15k"),
    ("15k-50k", "$15k - $50k"),
    ("50k-100k", "$50k - $100k"),
    ("100k+", "$100k+"),
];

/// Index of the "Send" button row
pub const SEND_ROW: usize = 6;

/// Trait for common form operations
pub trait Form {
    fn field_count(&self) -> usize;
    fn active_field(&self) -> usize;
    fn set_active_field(&mut self, index: usize);
    fn next_field(&mut self) {
        let count = self.field_count();
        let current = self.active_field();
        self.set_active_field((current + 1) % count);
    }
    fn prev_field(&mut self) {
        let count = self.field_count();
        let current = self.active_field();
        if current == 0 {
            self.set_active_field(count - 1);
        } else {
            self.set_active_field(current - 1);
        }
    }
    fn get_field(&self, index: usize) -> Option<&FormField>;
}

/// Values restored on every reset. They are not editable from the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormDefaults {
    pub subject: String,
    pub current_url: String,
}

#[derive(Debug, Clone)]
pub struct ContactForm {
    pub name: FormField,
    pub email: FormField,
    pub company: FormField,
    pub budget: FormField,
    pub project_type: FormField,
    pub message: FormField,
    pub subject: String,
    pub current_url: String,
    pub active_field_index: usize,
    defaults: FormDefaults,
}

impl ContactForm {
    pub fn new(defaults: FormDefaults) -> Self {
        Self {
            name: FormField::text("name", "Your Name", false),
            email: FormField::text("email", "Email", false),
            company: FormField::text("company", "Company (optional)", false),
            budget: FormField::choice("budget", "Budget", BUDGETS),
            project_type: FormField::choice("projectType", "Project Type", PROJECT_TYPES),
            message: FormField::text("message", "Project Details", true),
            subject: defaults.subject.clone(),
            current_url: defaults.current_url.clone(),
            active_field_index: 0,
            defaults,
        }
    }

    /// Overwrite a field by its form name. Returns false for unknown names.
    ///
    /// Both the camelCase names used on the wire and snake_case are accepted.
    pub fn update_field(&mut self, field: &str, value: impl Into<String>) -> bool {
        let value = value.into();
        match field {
            "subject" => self.subject = value,
            "currentUrl" | "current_url" => self.current_url = value,
            _ => match self.field_by_name_mut(field) {
                Some(f) => f.set_text(value),
                None => return false,
            },
        }
        true
    }

    fn field_by_name_mut(&mut self, field: &str) -> Option<&mut FormField> {
        match field {
            "name" => Some(&mut self.name),
            "email" => Some(&mut self.email),
            "company" => Some(&mut self.company),
            "budget" => Some(&mut self.budget),
            "projectType" | "project_type" => Some(&mut self.project_type),
            "message" => Some(&mut self.message),
            _ => None,
        }
    }

    /// Clear every user field and restore the fixed defaults
    pub fn reset(&mut self) {
        for field in [
            &mut self.name,
            &mut self.email,
            &mut self.company,
            &mut self.budget,
            &mut self.project_type,
            &mut self.message,
        ] {
            field.clear();
        }
        self.subject = self.defaults.subject.clone();
        self.current_url = self.defaults.current_url.clone();
        self.active_field_index = 0;
    }

    /// Snapshot of the current values
    pub fn submission(&self) -> ContactSubmission {
        ContactSubmission {
            name: self.name.as_text().to_string(),
            email: self.email.as_text().to_string(),
            subject: self.subject.clone(),
            message: self.message.as_text().to_string(),
            project_type: self.project_type.as_text().to_string(),
            budget: self.budget.as_text().to_string(),
            company: self.company.as_text().to_string(),
            current_url: self.current_url.clone(),
        }
    }

    pub fn is_send_row_active(&self) -> bool {
        self.active_field_index == SEND_ROW
    }

    pub fn get_active_field(&self) -> Option<&FormField> {
        self.get_field(self.active_field_index)
    }

    pub fn is_active_field_multiline(&self) -> bool {
        self.get_active_field().is_some_and(|f| f.is_multiline)
    }
}

impl Form for ContactForm {
    fn field_count(&self) -> usize {
        7 // six fields + send row
    }
    fn active_field(&self) -> usize {
        self.active_field_index
    }
    fn set_active_field(&mut self, index: usize) {
        self.active_field_index = index.min(SEND_ROW);
    }
    fn get_field(&self, index: usize) -> Option<&FormField> {
        match index {
            0 => Some(&self.name),
            1 => Some(&self.email),
            2 => Some(&self.company),
            3 => Some(&self.budget),
            4 => Some(&self.project_type),
            5 => Some(&self.message),
            // Index 6 is the send row, no FormField for it
            _ => None,
        }
    }
}
