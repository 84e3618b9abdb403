//! Form rendering module
//!
//! - `field_renderer`: Field rendering utilities
//! - `contact_form`: The contact form with its status panel

mod contact_form;
mod field_renderer;

pub use contact_form::draw_contact_form;
