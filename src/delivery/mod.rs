//! Delivery channels for contact submissions
//!
//! Both channels implement [`NotificationSender`]; the controller only ever
//! sees the trait.

mod emailjs;
mod error;
mod http;
mod traits;

pub use emailjs::EmailJsSender;
pub use error::SendError;
pub use http::HttpFormSender;
pub use traits::{AutoReply, DeliveryPayload, DeliveryReceipt, NotificationSender};

#[cfg(test)]
pub use traits::MockNotificationSender;

use crate::config::{AppConfig, DeliveryChannel};
use std::sync::Arc;
use tracing::info;

/// Build the sender selected by the configuration
pub fn build_sender(config: &AppConfig) -> Result<Arc<dyn NotificationSender>, SendError> {
    let sender: Arc<dyn NotificationSender> = match config.channel {
        DeliveryChannel::Http => {
            let sender = HttpFormSender::new(&config.base_url, config.request_timeout())?;
            info!(endpoint = %sender.endpoint(), "Using HTTP delivery channel");
            Arc::new(sender)
        }
        DeliveryChannel::EmailJs => {
            info!(
                service_id = %config.emailjs.service_id,
                template_id = %config.emailjs.template_id,
                "Using EmailJS delivery channel"
            );
            Arc::new(EmailJsSender::new(&config.emailjs, config.request_timeout())?)
        }
    };
    Ok(sender)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_sender_follows_channel() {
        let http = build_sender(&AppConfig::default()).unwrap();
        assert_eq!(http.channel(), "http");

        let emailjs = build_sender(&AppConfig {
            channel: DeliveryChannel::EmailJs,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(emailjs.channel(), "emailjs");
    }
}
