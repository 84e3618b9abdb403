//! Form domain layer
//!
//! Type-safe field values and the contact form aggregate.

mod contact_form;
mod field;

pub use contact_form::{ContactForm, Form, FormDefaults, SEND_ROW};
pub use field::FormField;
