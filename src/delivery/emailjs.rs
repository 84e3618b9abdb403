//! EmailJS delivery channel
//!
//! Sends template parameters to the EmailJS REST API. A 200 response means
//! the email was queued; anything else carries a plain-text reason.

use super::{AutoReply, DeliveryPayload, DeliveryReceipt, NotificationSender, SendError};
use crate::config::EmailJsConfig;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

pub const TEAM_NAME: &str = "Luna Lab Team";
pub const AUTO_REPLY_TEMPLATE: &str = "template_auto_reply";
pub const CONFIRMATION: &str =
    "Thank you! Your message has been sent successfully. We'll respond within 24 hours.";

#[derive(Debug, Serialize)]
struct SendRequest<'a, P> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: P,
}

#[derive(Debug, Serialize)]
struct ContactParams<'a> {
    from_name: &'a str,
    from_email: &'a str,
    company: &'a str,
    budget: &'a str,
    project_type: &'a str,
    message: &'a str,
    to_name: &'static str,
    reply_to: &'a str,
}

#[derive(Debug, Serialize)]
struct AutoReplyParams<'a> {
    to_email: &'a str,
    to_name: &'a str,
    from_name: &'static str,
    message: String,
}

/// Client for the EmailJS send endpoint
pub struct EmailJsSender {
    client: Client,
    config: EmailJsConfig,
}

impl EmailJsSender {
    pub fn new(config: &EmailJsConfig, timeout: Duration) -> Result<Self, SendError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SendError::Client(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    async fn post_template<P: Serialize + Send + Sync>(
        &self,
        template_id: &str,
        template_params: P,
    ) -> Result<(StatusCode, String), SendError> {
        let request = SendRequest {
            service_id: &self.config.service_id,
            template_id,
            user_id: &self.config.public_key,
            template_params,
        };

        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&request)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;
        Ok((status, text))
    }
}

fn auto_reply_body(name: &str, contact_email: &str) -> String {
    format!(
        "Hi {name},

Thank you for reaching out to Luna Lab! We've received your project inquiry and are excited to learn more about your vision.

What happens next:
• Our team will review your project details within 4 hours
• We'll prepare a personalized response with next steps
• You'll hear back from us within 24 hours maximum

In the meantime, feel free to check out our recent work and client testimonials on our website.

Best regards,
The Luna Lab Team

---
This is an automated response. Please don't reply to this email.
For urgent matters, contact us directly at {contact_email}"
    )
}

fn non_blank(text: String) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[async_trait]
impl NotificationSender for EmailJsSender {
    fn channel(&self) -> &'static str {
        "emailjs"
    }

    async fn send(&self, payload: &DeliveryPayload) -> Result<DeliveryReceipt, SendError> {
        let submission = &payload.submission;
        let company = if submission.company.trim().is_empty() {
            "Not specified"
        } else {
            &submission.company
        };
        let params = ContactParams {
            from_name: &submission.name,
            from_email: &submission.email,
            company,
            budget: &submission.budget,
            project_type: &submission.project_type,
            message: &submission.message,
            to_name: TEAM_NAME,
            reply_to: &submission.email,
        };

        debug!(
            submission_id = %payload.submission_id,
            template_id = %self.config.template_id,
            "Sending contact template"
        );

        let (status, text) = self.post_template(&self.config.template_id, params).await?;

        debug!(submission_id = %payload.submission_id, %status, "EmailJS responded");

        if status == StatusCode::OK {
            Ok(DeliveryReceipt::accepted(CONFIRMATION))
        } else {
            Ok(DeliveryReceipt::rejected(non_blank(text)))
        }
    }

    async fn send_auto_reply(&self, reply: &AutoReply) -> Result<(), SendError> {
        let params = AutoReplyParams {
            to_email: &reply.to_email,
            to_name: &reply.to_name,
            from_name: TEAM_NAME,
            message: auto_reply_body(&reply.to_name, &reply.contact_email),
        };

        let (status, text) = self.post_template(AUTO_REPLY_TEMPLATE, params).await?;
        if status == StatusCode::OK {
            Ok(())
        } else {
            Err(SendError::Rejected(
                non_blank(text).unwrap_or_else(|| status.to_string()),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ContactSubmission;
    use axum::{extract::State, http::StatusCode as AxumStatus, routing::post, Json, Router};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tokio::{net::TcpListener, sync::Mutex};

    #[derive(Clone)]
    struct ServerState {
        requests: Arc<Mutex<Vec<Value>>>,
        status: AxumStatus,
        body: &'static str,
    }

    async fn capture_send(
        State(state): State<ServerState>,
        Json(body): Json<Value>,
    ) -> (AxumStatus, &'static str) {
        state.requests.lock().await.push(body);
        (state.status, state.body)
    }

    async fn spawn_emailjs(
        status: AxumStatus,
        body: &'static str,
    ) -> (EmailJsConfig, Arc<Mutex<Vec<Value>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = ServerState {
            requests: requests.clone(),
            status,
            body,
        };
        let app = Router::new()
            .route("/api/v1.0/email/send", post(capture_send))
            .with_state(state);
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let config = EmailJsConfig {
            service_id: "service_luna".to_string(),
            template_id: "template_contact".to_string(),
            public_key: "pk_test".to_string(),
            endpoint: format!("http://{addr}/api/v1.0/email/send"),
        };
        (config, requests)
    }

    fn payload(company: &str) -> DeliveryPayload {
        DeliveryPayload::new(ContactSubmission {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            subject: "General inquiry".to_string(),
            message: "We need an app".to_string(),
            project_type: "mobile-app".to_string(),
            budget: "50k-100k".to_string(),
            company: company.to_string(),
            current_url: "https://lunalabs.com/#contact".to_string(),
        })
    }

    fn sender(config: &EmailJsConfig) -> EmailJsSender {
        EmailJsSender::new(config, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_sends_template_params() {
        let (config, requests) = spawn_emailjs(AxumStatus::OK, "OK").await;

        let receipt = sender(&config).send(&payload("")).await.unwrap();

        assert_eq!(receipt, DeliveryReceipt::accepted(CONFIRMATION));
        let requests = requests.lock().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0],
            json!({
                "service_id": "service_luna",
                "template_id": "template_contact",
                "user_id": "pk_test",
                "template_params": {
                    "from_name": "Ada Lovelace",
                    "from_email": "ada@example.com",
                    "company": "Not specified",
                    "budget": "50k-100k",
                    "project_type": "mobile-app",
                    "message": "We need an app",
                    "to_name": "Luna Lab Team",
                    "reply_to": "ada@example.com",
                }
            })
        );
    }

    #[tokio::test]
    async fn test_company_is_passed_when_set() {
        let (config, requests) = spawn_emailjs(AxumStatus::OK, "OK").await;

        sender(&config).send(&payload("Analytical Engines")).await.unwrap();

        let requests = requests.lock().await;
        assert_eq!(
            requests[0]["template_params"]["company"],
            json!("Analytical Engines")
        );
    }

    #[tokio::test]
    async fn test_non_200_is_rejection_with_remote_text() {
        let (config, _) = spawn_emailjs(AxumStatus::BAD_REQUEST, "Bad template").await;

        let receipt = sender(&config).send(&payload("")).await.unwrap();
        assert_eq!(
            receipt,
            DeliveryReceipt::rejected(Some("Bad template".to_string()))
        );
    }

    #[tokio::test]
    async fn test_non_200_with_blank_body_has_no_message() {
        let (config, _) = spawn_emailjs(AxumStatus::FORBIDDEN, "  ").await;

        let receipt = sender(&config).send(&payload("")).await.unwrap();
        assert_eq!(receipt, DeliveryReceipt::rejected(None));
    }

    #[tokio::test]
    async fn test_auto_reply_uses_auto_reply_template() {
        let (config, requests) = spawn_emailjs(AxumStatus::OK, "OK").await;
        let reply = AutoReply {
            to_email: "ada@example.com".to_string(),
            to_name: "Ada".to_string(),
            contact_email: "hello@lunalabs.com".to_string(),
        };

        sender(&config).send_auto_reply(&reply).await.unwrap();

        let requests = requests.lock().await;
        assert_eq!(requests[0]["template_id"], json!(AUTO_REPLY_TEMPLATE));
        let params = &requests[0]["template_params"];
        assert_eq!(params["to_email"], json!("ada@example.com"));
        assert_eq!(params["from_name"], json!(TEAM_NAME));
        let body = params["message"].as_str().unwrap();
        assert!(body.starts_with("Hi Ada,"));
        assert!(body.ends_with("For urgent matters, contact us directly at hello@lunalabs.com"));
    }

    #[tokio::test]
    async fn test_auto_reply_rejection_is_an_error() {
        let (config, _) = spawn_emailjs(AxumStatus::BAD_REQUEST, "No template").await;
        let reply = AutoReply {
            to_email: "ada@example.com".to_string(),
            to_name: "Ada".to_string(),
            contact_email: "hello@lunalabs.com".to_string(),
        };

        let result = sender(&config).send_auto_reply(&reply).await;
        assert!(matches!(result, Err(SendError::Rejected(ref m)) if m == "No template"));
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank("  x ".to_string()), Some("x".to_string()));
        assert_eq!(non_blank("\n".to_string()), None);
    }
}
