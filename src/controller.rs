//! Form submission controller
//!
//! Owns the contact form, validates it, hands it to a [`NotificationSender`]
//! and turns whatever happens into a [`SubmitStatus`]. Nothing escapes
//! [`ContactController::submit`] as an error.

use crate::config::AppConfig;
use crate::delivery::{AutoReply, DeliveryPayload, DeliveryReceipt, NotificationSender, SendError};
use crate::state::{ContactForm, SubmitStatus, ValidationError};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, error, info, info_span, warn, Instrument};

const DEFAULT_CONFIRMATION: &str = "Thank you! Your message has been sent.";

/// Sets the in-flight flag for its lifetime; clears it on drop, including
/// when the submit future is dropped before completing.
struct InFlight<'a>(&'a mut bool);

impl<'a> InFlight<'a> {
    fn enter(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

enum Outcome {
    Invalid(ValidationError),
    Failed(SendError),
    Delivered(DeliveryReceipt),
}

pub struct ContactController {
    form: ContactForm,
    sender: Arc<dyn NotificationSender>,
    contact_email: String,
    auto_reply: bool,
    is_submitting: bool,
    status: SubmitStatus,
    last_attempt_at: Option<DateTime<Utc>>,
}

impl ContactController {
    pub fn new(config: &AppConfig, sender: Arc<dyn NotificationSender>) -> Self {
        Self {
            form: ContactForm::new(config.form_defaults()),
            sender,
            contact_email: config.contact_email.clone(),
            auto_reply: config.auto_reply,
            is_submitting: false,
            status: SubmitStatus::None,
            last_attempt_at: None,
        }
    }

    pub fn form(&self) -> &ContactForm {
        &self.form
    }

    /// Mutable access to the form; `None` while a submission is in flight
    pub fn form_mut(&mut self) -> Option<&mut ContactForm> {
        if self.is_submitting {
            None
        } else {
            Some(&mut self.form)
        }
    }

    /// Overwrite one field. No validation happens here.
    pub fn update_field(&mut self, field: &str, value: impl Into<String>) {
        if !self.form.update_field(field, value) {
            debug!(field, "Ignoring update for unknown form field");
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    pub fn status(&self) -> &SubmitStatus {
        &self.status
    }

    /// When the last attempt resolved
    pub fn last_attempt_at(&self) -> Option<DateTime<Utc>> {
        self.last_attempt_at
    }

    pub fn contact_email(&self) -> &str {
        &self.contact_email
    }

    pub fn channel(&self) -> &'static str {
        self.sender.channel()
    }

    /// Validate and deliver the current form.
    ///
    /// Clears the previous status first. On success the form is reset. The
    /// in-flight flag is always cleared when this returns or is dropped.
    pub async fn submit(&mut self) -> &SubmitStatus {
        if self.is_submitting {
            return &self.status;
        }
        let in_flight = InFlight::enter(&mut self.is_submitting);
        self.status = SubmitStatus::None;

        let payload = DeliveryPayload::new(self.form.submission());
        let span = info_span!(
            "submit",
            submission_id = %payload.submission_id,
            channel = self.sender.channel()
        );

        let sender = self.sender.as_ref();
        let outcome = async {
            if let Err(e) = payload.submission.validate() {
                return Outcome::Invalid(e);
            }
            match sender.send(&payload).await {
                Ok(receipt) => Outcome::Delivered(receipt),
                Err(e) => Outcome::Failed(e),
            }
        }
        .instrument(span.clone())
        .await;

        self.status = match outcome {
            Outcome::Invalid(e) => {
                span.in_scope(|| info!(reason = %e, "Submission failed validation"));
                SubmitStatus::Error(e.to_string())
            }
            Outcome::Failed(e) => {
                span.in_scope(|| error!(error = %e, "Contact delivery failed"));
                SubmitStatus::Error(format!(
                    "Failed to send message. Please try again or contact us directly at {}",
                    self.contact_email
                ))
            }
            Outcome::Delivered(receipt) if receipt.success => {
                span.in_scope(|| info!("Contact form delivered"));
                if self.auto_reply {
                    let reply = AutoReply {
                        to_email: payload.submission.email.clone(),
                        to_name: payload.submission.name.clone(),
                        contact_email: self.contact_email.clone(),
                    };
                    if let Err(e) = sender.send_auto_reply(&reply).instrument(span.clone()).await {
                        span.in_scope(|| warn!(error = %e, "Auto-reply failed"));
                    }
                }
                self.form.reset();
                SubmitStatus::Success(
                    non_blank(receipt.message).unwrap_or_else(|| DEFAULT_CONFIRMATION.to_string()),
                )
            }
            Outcome::Delivered(receipt) => {
                span.in_scope(|| {
                    warn!(reason = ?receipt.message, "Delivery channel rejected submission")
                });
                SubmitStatus::Error(non_blank(receipt.message).unwrap_or_else(|| {
                    format!(
                        "Something went wrong. Please try again or contact us directly at {}",
                        self.contact_email
                    )
                }))
            }
        };

        self.last_attempt_at = Some(Utc::now());
        drop(in_flight);
        &self.status
    }
}

fn non_blank(message: Option<String>) -> Option<String> {
    message.filter(|m| !m.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::MockNotificationSender;
    use async_trait::async_trait;
    use std::time::Duration;

    fn mock() -> MockNotificationSender {
        let mut sender = MockNotificationSender::new();
        sender.expect_channel().return_const("mock");
        sender
    }

    fn controller(sender: MockNotificationSender) -> ContactController {
        controller_with(AppConfig::default(), sender)
    }

    fn controller_with(config: AppConfig, sender: MockNotificationSender) -> ContactController {
        ContactController::new(&config, Arc::new(sender))
    }

    fn fill_valid(controller: &mut ContactController) {
        controller.update_field("name", "Ada Lovelace");
        controller.update_field("email", "ada@example.com");
        controller.update_field("message", "We need a website");
        controller.update_field("company", "Analytical Engines");
        controller.update_field("budget", "15k-50k");
        controller.update_field("projectType", "website");
    }

    fn accepts(message: &'static str) -> MockNotificationSender {
        let mut sender = mock();
        sender
            .expect_send()
            .times(1)
            .returning(move |_| Ok(DeliveryReceipt::accepted(message)));
        sender
    }

    mod validation {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_empty_required_fields_never_dispatch() {
            for missing in ["name", "email", "message"] {
                let mut sender = mock();
                sender.expect_send().never();
                let mut controller = controller(sender);
                fill_valid(&mut controller);
                controller.update_field(missing, "");

                let status = controller.submit().await.clone();

                assert!(status.is_error(), "missing {missing} should fail");
                assert!(!controller.is_submitting());
            }
        }

        #[tokio::test]
        async fn test_malformed_email_never_dispatches() {
            for email in ["abc", "a@b", "a@b.c "] {
                let mut sender = mock();
                sender.expect_send().never();
                let mut controller = controller(sender);
                fill_valid(&mut controller);
                controller.update_field("email", email);

                let status = controller.submit().await.clone();

                assert_eq!(
                    status,
                    SubmitStatus::Error("Please enter a valid email address.".to_string())
                );
            }
        }

        #[tokio::test]
        async fn test_validation_failure_keeps_field_values() {
            let mut sender = mock();
            sender.expect_send().never();
            let mut controller = controller(sender);
            fill_valid(&mut controller);
            controller.update_field("message", "   ");

            controller.submit().await;

            assert_eq!(controller.form().name.as_text(), "Ada Lovelace");
            assert_eq!(
                controller.status(),
                &SubmitStatus::Error("Please tell us about your project.".to_string())
            );
        }
    }

    mod delivery {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_success_uses_remote_message_and_resets_form() {
            let mut controller = controller(accepts("OK"));
            fill_valid(&mut controller);

            let status = controller.submit().await.clone();

            assert_eq!(status, SubmitStatus::Success("OK".to_string()));
            let submission = controller.form().submission();
            assert_eq!(submission.name, "");
            assert_eq!(submission.email, "");
            assert_eq!(submission.message, "");
            assert_eq!(submission.company, "");
            assert_eq!(submission.budget, "");
            assert_eq!(submission.project_type, "");
            assert_eq!(submission.subject, "General inquiry");
            assert!(!controller.is_submitting());
            assert!(controller.last_attempt_at().is_some());
        }

        #[tokio::test]
        async fn test_payload_carries_form_values() {
            let mut sender = mock();
            sender
                .expect_send()
                .withf(|payload| {
                    let s = &payload.submission;
                    s.name == "Ada Lovelace"
                        && s.email == "ada@example.com"
                        && s.company == "Analytical Engines"
                        && s.budget == "15k-50k"
                        && s.project_type == "website"
                        && s.subject == "General inquiry"
                        && s.current_url == "https://lunalabs.com/#contact"
                })
                .times(1)
                .returning(|_| Ok(DeliveryReceipt::accepted("OK")));
            let mut controller = controller(sender);
            fill_valid(&mut controller);

            assert!(controller.submit().await.is_success());
        }

        #[tokio::test]
        async fn test_success_without_message_uses_default_confirmation() {
            let mut sender = mock();
            sender.expect_send().returning(|_| {
                Ok(DeliveryReceipt {
                    success: true,
                    message: None,
                })
            });
            let mut controller = controller(sender);
            fill_valid(&mut controller);

            let status = controller.submit().await.clone();
            assert_eq!(status, SubmitStatus::Success(DEFAULT_CONFIRMATION.to_string()));
        }

        #[tokio::test]
        async fn test_transport_failure_mentions_contact_email() {
            let mut sender = mock();
            sender
                .expect_send()
                .returning(|_| Err(SendError::Decode("connection reset".to_string())));
            let mut controller = controller(sender);
            fill_valid(&mut controller);

            let status = controller.submit().await.clone();

            assert!(status.is_error());
            assert!(status.message().contains("hello@lunalabs.com"));
            assert!(!controller.is_submitting());
            assert_eq!(controller.form().name.as_text(), "Ada Lovelace");
        }

        #[tokio::test]
        async fn test_remote_failure_passes_message_through() {
            let mut sender = mock();
            sender
                .expect_send()
                .returning(|_| Ok(DeliveryReceipt::rejected(Some("Bad template".to_string()))));
            let mut controller = controller(sender);
            fill_valid(&mut controller);

            let status = controller.submit().await.clone();
            assert_eq!(status, SubmitStatus::Error("Bad template".to_string()));
        }

        #[tokio::test]
        async fn test_remote_failure_without_message_is_generic() {
            let mut sender = mock();
            sender
                .expect_send()
                .returning(|_| Ok(DeliveryReceipt::rejected(Some(" ".to_string()))));
            let config = AppConfig {
                contact_email: "ops@example.com".to_string(),
                ..Default::default()
            };
            let mut controller = controller_with(config, sender);
            fill_valid(&mut controller);

            let status = controller.submit().await.clone();
            assert_eq!(
                status,
                SubmitStatus::Error(
                    "Something went wrong. Please try again or contact us directly at ops@example.com"
                        .to_string()
                )
            );
        }

        #[tokio::test]
        async fn test_failed_then_valid_submit_reflects_second_attempt() {
            let mut controller = controller(accepts("OK"));
            controller.update_field("name", "Ada Lovelace");

            assert!(controller.submit().await.is_error());

            fill_valid(&mut controller);
            let status = controller.submit().await.clone();

            assert_eq!(status, SubmitStatus::Success("OK".to_string()));
            assert!(!controller.is_submitting());
        }
    }

    mod auto_reply {
        use super::*;
        use pretty_assertions::assert_eq;

        fn auto_reply_config() -> AppConfig {
            AppConfig {
                auto_reply: true,
                ..Default::default()
            }
        }

        #[tokio::test]
        async fn test_auto_reply_sent_after_success() {
            let mut sender = accepts("OK");
            sender
                .expect_send_auto_reply()
                .withf(|reply| {
                    reply.to_email == "ada@example.com"
                        && reply.to_name == "Ada Lovelace"
                        && reply.contact_email == "hello@lunalabs.com"
                })
                .times(1)
                .returning(|_| Ok(()));
            let mut controller = controller_with(auto_reply_config(), sender);
            fill_valid(&mut controller);

            assert!(controller.submit().await.is_success());
        }

        #[tokio::test]
        async fn test_auto_reply_failure_keeps_success() {
            let mut sender = accepts("OK");
            sender
                .expect_send_auto_reply()
                .returning(|_| Err(SendError::Rejected("no template".to_string())));
            let mut controller = controller_with(auto_reply_config(), sender);
            fill_valid(&mut controller);

            assert_eq!(
                controller.submit().await,
                &SubmitStatus::Success("OK".to_string())
            );
        }

        #[tokio::test]
        async fn test_no_auto_reply_after_failure() {
            let mut sender = mock();
            sender
                .expect_send()
                .returning(|_| Ok(DeliveryReceipt::rejected(None)));
            sender.expect_send_auto_reply().never();
            let mut controller = controller_with(auto_reply_config(), sender);
            fill_valid(&mut controller);

            assert!(controller.submit().await.is_error());
        }
    }

    mod in_flight {
        use super::*;

        /// Sender whose delivery never completes
        struct StalledSender;

        #[async_trait]
        impl NotificationSender for StalledSender {
            fn channel(&self) -> &'static str {
                "stalled"
            }

            async fn send(&self, _payload: &DeliveryPayload) -> Result<DeliveryReceipt, SendError> {
                std::future::pending().await
            }

            async fn send_auto_reply(&self, _reply: &AutoReply) -> Result<(), SendError> {
                Ok(())
            }
        }

        #[tokio::test]
        async fn test_dropped_submit_clears_flag() {
            let mut controller = ContactController::new(&AppConfig::default(), Arc::new(StalledSender));
            fill_valid(&mut controller);

            let result = tokio::time::timeout(Duration::from_millis(20), controller.submit()).await;

            assert!(result.is_err());
            assert!(!controller.is_submitting());
            assert!(controller.form_mut().is_some());
        }

        #[test]
        fn test_guard_sets_and_clears_flag() {
            let mut flag = false;
            {
                let guard = InFlight::enter(&mut flag);
                assert!(*guard.0);
            }
            assert!(!flag);
        }
    }
}
