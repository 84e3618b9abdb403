//! Capability interface implemented by every delivery channel

use crate::state::ContactSubmission;
use async_trait::async_trait;
use uuid::Uuid;

use super::SendError;

/// A validated submission on its way to a channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryPayload {
    /// Correlates log lines of one attempt across the controller and channel
    pub submission_id: Uuid,
    pub submission: ContactSubmission,
}

impl DeliveryPayload {
    pub fn new(submission: ContactSubmission) -> Self {
        Self {
            submission_id: Uuid::new_v4(),
            submission,
        }
    }
}

/// Answer from a channel that was reached successfully
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub success: bool,
    /// Remote-supplied confirmation or failure reason
    pub message: Option<String>,
}

impl DeliveryReceipt {
    pub fn accepted(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
        }
    }

    pub fn rejected(message: Option<String>) -> Self {
        Self {
            success: false,
            message,
        }
    }
}

/// Acknowledgement sent back to the person who submitted the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoReply {
    pub to_email: String,
    pub to_name: String,
    /// Address offered for urgent follow-ups
    pub contact_email: String,
}

/// Trait for delivery channel operations, enabling mocking in tests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// Short channel name for logs
    fn channel(&self) -> &'static str;

    /// Deliver a submission to the operator
    async fn send(&self, payload: &DeliveryPayload) -> Result<DeliveryReceipt, SendError>;

    /// Acknowledge a successful submission to the submitter
    async fn send_auto_reply(&self, reply: &AutoReply) -> Result<(), SendError>;
}
