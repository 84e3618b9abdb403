//! Direct HTTP delivery to the studio backend
//!
//! Posts the submission as JSON to `<base_url>/api/email/submit` and reads
//! back `{success, message}`.

use super::{AutoReply, DeliveryPayload, DeliveryReceipt, NotificationSender, SendError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Fixed submission path appended to the configured base URL
pub const SUBMIT_PATH: &str = "/api/email/submit";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitRequest<'a> {
    name: &'a str,
    email: &'a str,
    subject: &'a str,
    message: String,
    current_url: &'a str,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

/// Client for the backend's form submission endpoint
pub struct HttpFormSender {
    client: Client,
    endpoint: String,
}

impl HttpFormSender {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SendError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SendError::Client(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), SUBMIT_PATH),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl NotificationSender for HttpFormSender {
    fn channel(&self) -> &'static str {
        "http"
    }

    async fn send(&self, payload: &DeliveryPayload) -> Result<DeliveryReceipt, SendError> {
        let submission = &payload.submission;
        let request = SubmitRequest {
            name: &submission.name,
            email: &submission.email,
            subject: &submission.subject,
            message: submission.combined_message(),
            current_url: &submission.current_url,
        };

        debug!(
            submission_id = %payload.submission_id,
            endpoint = %self.endpoint,
            "Posting contact form"
        );

        let response = self.client.post(&self.endpoint).json(&request).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        debug!(submission_id = %payload.submission_id, %status, "Backend responded");

        match serde_json::from_slice::<SubmitResponse>(&body) {
            Ok(parsed) if status.is_success() && parsed.success => Ok(DeliveryReceipt {
                success: true,
                message: parsed.message,
            }),
            Ok(parsed) => Ok(DeliveryReceipt::rejected(parsed.message)),
            // A 2xx we cannot read means we do not know whether it was delivered
            Err(e) if status.is_success() => Err(SendError::Decode(e.to_string())),
            Err(_) => Ok(DeliveryReceipt::rejected(None)),
        }
    }

    async fn send_auto_reply(&self, reply: &AutoReply) -> Result<(), SendError> {
        // The backend acknowledges submissions itself
        debug!(to = %reply.to_email, "Auto-reply left to backend");
        Ok(())
    }
}
