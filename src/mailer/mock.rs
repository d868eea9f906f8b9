//! Mock mailer for testing without an SMTP server.

use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};

use super::{BookingNotification, Mailer, MailerError};

/// Mock mailer that records every notification it is asked to send.
#[derive(Debug, Default)]
pub struct MockMailer {
    sent: Mutex<Vec<BookingNotification>>,
    fail: bool,
}

impl MockMailer {
    /// Create a mock mailer that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock mailer whose every send fails at the transport.
    pub fn failing() -> Self {
        MockMailer {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Notifications recorded so far, in send order.
    pub fn sent(&self) -> Vec<BookingNotification> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<BookingNotification>> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send_booking_notification(
        &self,
        notification: &BookingNotification,
    ) -> Result<(), MailerError> {
        if self.fail {
            return Err(MailerError::Transport("mock transport failure".to_string()));
        }
        self.lock().push(notification.clone());
        Ok(())
    }
}
