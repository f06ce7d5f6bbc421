pub mod error;
pub mod smtp;
pub mod webhook;

pub use error::DeliveryError;
pub use smtp::{SmtpConfig, SmtpDelivery, DEFAULT_SMTP_PORT, SUBJECT_PREFIX};
pub use webhook::{WebhookConfig, WebhookDelivery, WebhookPayload, MAX_CONTENT_CHARS};

/// Which channel a run delivers through.
#[derive(Debug, Clone)]
pub enum DeliveryConfig {
    Email(SmtpConfig),
    Webhook(WebhookConfig),
}

impl DeliveryConfig {
    pub fn build(&self) -> Result<Box<dyn interfaces::Delivery>, DeliveryError> {
        Ok(match self {
            DeliveryConfig::Email(smtp) => Box::new(SmtpDelivery::new(smtp.clone())),
            DeliveryConfig::Webhook(webhook) => Box::new(WebhookDelivery::new(webhook.clone())?),
        })
    }
}
