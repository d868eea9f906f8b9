//! SMTP delivery over STARTTLS.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::fmt;

use super::{BookingNotification, Mailer, MailerError};
use crate::config::EmailSettings;

/// Mailer backed by an authenticated SMTP relay. Notifications go to the
/// studio's own sender address.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
}

impl SmtpMailer {
    pub fn from_settings(settings: &EmailSettings) -> Result<SmtpMailer, MailerError> {
        let address = settings
            .sender_email
            .parse::<lettre::Address>()
            .map_err(|e| MailerError::Compose(format!("sender address: {}", e)))?;
        let sender = Mailbox::new(Some(settings.sender_name.clone()), address);

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.smtp_host)
            .map_err(|e| MailerError::Transport(e.to_string()))?
            .port(settings.smtp_port)
            .credentials(Credentials::new(
                settings.smtp_username.clone(),
                settings.smtp_password.clone(),
            ))
            .build();

        Ok(SmtpMailer { transport, sender })
    }
}

impl fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpMailer")
            .field("sender", &self.sender)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_booking_notification(
        &self,
        notification: &BookingNotification,
    ) -> Result<(), MailerError> {
        let reply_to = notification
            .client_email
            .parse::<Mailbox>()
            .map_err(|e| MailerError::Compose(format!("client address: {}", e)))?;

        // The studio mails itself; replying goes to the client.
        let message = Message::builder()
            .from(self.sender.clone())
            .to(Mailbox::new(None, self.sender.email.clone()))
            .reply_to(reply_to)
            .subject(notification.subject())
            .header(ContentType::TEXT_HTML)
            .body(notification.html_body())
            .map_err(|e| MailerError::Compose(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailerError::Transport(e.to_string()))?;
        Ok(())
    }
}
