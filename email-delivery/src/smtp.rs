use crate::error::DeliveryError;
use async_trait::async_trait;
use chrono::{DateTime, Local};
use interfaces::{Delivery, OutputBatch};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use std::time::Duration;
use tracing::{debug, info};

pub const SUBJECT_PREFIX: &str = "[Exploit news]";
pub const DEFAULT_SMTP_PORT: u16 = 465;

#[derive(Clone)]
pub struct SmtpConfig {
    pub server: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub destination: String,
    pub subject_prefix: String,
    pub timeout_seconds: u64,
}

impl SmtpConfig {
    pub fn new(
        server: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        password: impl Into<String>,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            server: server.into(),
            port,
            username: username.into(),
            password: password.into(),
            destination: destination.into(),
            subject_prefix: SUBJECT_PREFIX.to_string(),
            timeout_seconds: 30,
        }
    }
}

// Keeps the password out of debug output.
impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("destination", &self.destination)
            .field("subject_prefix", &self.subject_prefix)
            .finish_non_exhaustive()
    }
}

/// Sends the HTML batch as one mail over implicit-TLS SMTP submission.
pub struct SmtpDelivery {
    config: SmtpConfig,
}

impl SmtpDelivery {
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    pub fn subject(&self, at: DateTime<Local>) -> String {
        format!("{} - {}", self.config.subject_prefix, at.format("%Y-%m-%d %H:%M:%S"))
    }

    pub fn build_message(&self, html: String, at: DateTime<Local>) -> Result<Message, DeliveryError> {
        let from: Mailbox = self.config.username.parse()?;
        let to: Mailbox = self.config.destination.parse()?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(self.subject(at))
            .header(ContentType::TEXT_HTML)
            .body(html)?;

        Ok(message)
    }

    fn transport(&self) -> Result<SmtpTransport, DeliveryError> {
        let credentials = Credentials::new(self.config.username.clone(), self.config.password.clone());
        let transport = SmtpTransport::relay(&self.config.server)?
            .port(self.config.port)
            .credentials(credentials)
            .timeout(Some(Duration::from_secs(self.config.timeout_seconds)))
            .build();
        Ok(transport)
    }

    pub async fn send_html(&self, html: String) -> Result<(), DeliveryError> {
        let message = self.build_message(html, Local::now())?;
        let transport = self.transport()?;

        debug!(server = %self.config.server, port = self.config.port, "Connecting to SMTP server");

        // lettre's SmtpTransport is blocking
        tokio::task::spawn_blocking(move || transport.send(&message)).await??;

        info!(destination = %self.config.destination, "Sent email");
        Ok(())
    }
}

#[async_trait]
impl Delivery for SmtpDelivery {
    fn channel_name(&self) -> &'static str {
        "email"
    }

    async fn deliver(&self, batch: &OutputBatch) -> anyhow::Result<()> {
        self.send_html(batch.render_html()).await?;
        Ok(())
    }
}
