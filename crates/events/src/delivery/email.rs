//! Email delivery via SMTP.
//!
//! [`Mailer`] wraps the `lettre` async SMTP transport. Configuration is
//! loaded from environment variables; if `SMTP_HOST` is not set,
//! [`EmailConfig::from_env`] returns `None` and no mailer should be
//! constructed.

use lettre::message::header::ContentType;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::templates::Email;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "noreply@smcd.ma";

/// Display name on every outgoing message.
pub const SENDER_NAME: &str = "SMCD Congrès";

/// Configuration for the SMTP mailer.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// SMTP server hostname.
    pub smtp_host: String,
    /// SMTP server port (defaults to 587).
    pub smtp_port: u16,
    /// Sender address, shown as `SMCD Congrès <from_address>`.
    pub from_address: String,
    /// Optional SMTP username.
    pub smtp_user: Option<String>,
    /// Optional SMTP password.
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set, signalling that email
    /// delivery is not configured and should be skipped.
    ///
    /// | Variable        | Required | Default            |
    /// |-----------------|----------|--------------------|
    /// | `SMTP_HOST`     | yes      |                    |
    /// | `SMTP_PORT`     | no       | `587`              |
    /// | `SMTP_FROM`     | no       | `noreply@smcd.ma`  |
    /// | `SMTP_USER`     | no       |                    |
    /// | `SMTP_PASSWORD` | no       |                    |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

// ---------------------------------------------------------------------------
// Mailer
// ---------------------------------------------------------------------------

/// Sends plain-text and HTML messages through one pooled SMTP transport.
pub struct Mailer {
    sender: Mailbox,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl Mailer {
    /// Build the transport. No connection is opened until the first send.
    pub fn new(config: &EmailConfig) -> Result<Self, EmailError> {
        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
                .port(config.smtp_port);

        if let (Some(user), Some(pass)) = (&config.smtp_user, &config.smtp_password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            sender: sender_mailbox(&config.from_address)?,
            transport: transport_builder.build(),
        })
    }

    /// Send a rendered notification to `to`.
    pub async fn send(&self, to: &str, email: &Email) -> Result<(), EmailError> {
        let message = compose(&self.sender, to, email)?;
        self.transport.send(message).await?;
        tracing::info!(to, subject = %email.subject, "Email sent");
        Ok(())
    }

    /// Send a free-form plain-text message.
    pub async fn send_text(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailError> {
        self.send(to, &Email::text(subject, body)).await
    }
}

fn sender_mailbox(from_address: &str) -> Result<Mailbox, EmailError> {
    Ok(Mailbox::new(Some(SENDER_NAME.to_string()), from_address.parse()?))
}

/// Assemble the MIME message: `text/plain` alone, or
/// `multipart/alternative` when an HTML body is present.
fn compose(sender: &Mailbox, to: &str, email: &Email) -> Result<Message, EmailError> {
    let builder = Message::builder()
        .from(sender.clone())
        .to(to.trim().parse()?)
        .subject(email.subject.as_str());

    let message = match &email.html {
        Some(html) => builder.multipart(MultiPart::alternative_plain_html(
            email.text.clone(),
            html.clone(),
        )),
        None => builder
            .header(ContentType::TEXT_PLAIN)
            .body(email.text.clone()),
    };
    message.map_err(|e| EmailError::Build(e.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
