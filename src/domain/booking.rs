//! Booking requests submitted through the public form.

use crate::domain::validation::{email_is_valid, parse_date, require_text, FieldError};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A stored booking request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub id: i64,
    pub client_name: String,
    pub email: String,
    /// Placement on the body, e.g. "forearm".
    pub body_part: String,
    pub idea_description: String,
    pub preferred_date: NaiveDate,
    pub is_confirmed: bool,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a booking request. All fields are required; the
/// preferred date must be an ISO `YYYY-MM-DD` date.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    pub client_name: String,
    pub email: String,
    pub body_part: String,
    pub idea_description: String,
    pub preferred_date: String,
}

impl NewBooking {
    /// Validate required fields and the email/date formats.
    ///
    /// Returns the parsed preferred date on success, or every failed field
    /// so the form can show them all at once.
    pub fn validate(&self) -> Result<NaiveDate, Vec<FieldError>> {
        let mut errors = Vec::new();

        require_text(&mut errors, "clientName", &self.client_name);
        require_text(&mut errors, "bodyPart", &self.body_part);
        require_text(&mut errors, "ideaDescription", &self.idea_description);

        if self.email.trim().is_empty() {
            errors.push(FieldError::new("email", "is required"));
        } else if !email_is_valid(&self.email) {
            errors.push(FieldError::new("email", "is not a valid email address"));
        }

        let date = if self.preferred_date.trim().is_empty() {
            errors.push(FieldError::new("preferredDate", "is required"));
            None
        } else {
            let parsed = parse_date(&self.preferred_date);
            if parsed.is_none() {
                errors.push(FieldError::new(
                    "preferredDate",
                    "must be a YYYY-MM-DD date",
                ));
            }
            parsed
        };

        match date {
            Some(date) if errors.is_empty() => Ok(date),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_booking() -> NewBooking {
        NewBooking {
            client_name: "Anna Rossi".to_string(),
            email: "anna@example.com".to_string(),
            body_part: "forearm".to_string(),
            idea_description: "Blackwork rose with fine shading".to_string(),
            preferred_date: "2026-09-14".to_string(),
        }
    }

    #[test]
    fn test_valid_booking_passes() {
        let date = valid_booking().validate().expect("should validate");
        assert_eq!(date, NaiveDate::from_ymd_opt(2026, 9, 14).unwrap());
    }

    #[test]
    fn test_missing_name_rejected() {
        let mut b = valid_booking();
        b.client_name = "  ".to_string();
        let errors = b.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "clientName");
    }

    #[test]
    fn test_bad_email_rejected() {
        let mut b = valid_booking();
        b.email = "not-an-email".to_string();
        let errors = b.validate().unwrap_err();
        assert_eq!(errors[0].field, "email");
    }

    #[test]
    fn test_bad_date_rejected() {
        let mut b = valid_booking();
        b.preferred_date = "next summer".to_string();
        let errors = b.validate().unwrap_err();
        assert_eq!(errors[0].field, "preferredDate");
    }

    #[test]
    fn test_all_failures_reported_together() {
        let b = NewBooking {
            client_name: String::new(),
            email: "bad".to_string(),
            body_part: String::new(),
            idea_description: String::new(),
            preferred_date: String::new(),
        };
        let errors = b.validate().unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "clientName",
                "bodyPart",
                "ideaDescription",
                "email",
                "preferredDate"
            ]
        );
    }
}
