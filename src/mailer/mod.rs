//! Outbound email for booking notifications.
//!
//! The studio is notified at its own inbox about every new booking; the
//! message carries the client's address as Reply-To so answering in the
//! mail client goes straight back to the client.

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

use crate::domain::NewBooking;

pub mod mock;
pub mod smtp;

pub use mock::MockMailer;
pub use smtp::SmtpMailer;

/// Content of one booking notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingNotification {
    pub client_name: String,
    pub client_email: String,
    pub body_part: String,
    pub idea_description: String,
    pub preferred_date: String,
}

impl BookingNotification {
    pub fn for_booking(booking: &NewBooking) -> BookingNotification {
        BookingNotification {
            client_name: booking.client_name.trim().to_string(),
            client_email: booking.email.trim().to_string(),
            body_part: booking.body_part.trim().to_string(),
            idea_description: booking.idea_description.trim().to_string(),
            preferred_date: booking.preferred_date.trim().to_string(),
        }
    }

    pub fn subject(&self) -> String {
        format!("New booking request from {}", self.client_name)
    }

    pub fn html_body(&self) -> String {
        format!(
            "<h2>New booking request</h2>\
             <p><strong>Client:</strong> {}</p>\
             <p><strong>Email:</strong> {}</p>\
             <p><strong>Body part:</strong> {}</p>\
             <p><strong>Preferred date:</strong> {}</p>\
             <p><strong>Idea:</strong></p>\
             <p>{}</p>",
            escape_html(&self.client_name),
            escape_html(&self.client_email),
            escape_html(&self.body_part),
            escape_html(&self.preferred_date),
            escape_html(&self.idea_description),
        )
    }
}

/// The booking text is client-supplied and lands in an HTML mail body.
fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Delivery channel for booking notifications.
#[async_trait]
pub trait Mailer: Send + Sync + fmt::Debug {
    /// Deliver one notification to the studio inbox, with Reply-To set to
    /// the client's address.
    async fn send_booking_notification(
        &self,
        notification: &BookingNotification,
    ) -> Result<(), MailerError>;
}

/// Error type for mail delivery.
#[derive(Debug, Clone, Error)]
pub enum MailerError {
    #[error("failed to compose message: {0}")]
    Compose(String),
    #[error("smtp transport error: {0}")]
    Transport(String),
}
