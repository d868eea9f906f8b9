use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tracing::warn;

use crate::api::auth::AdminUser;
use crate::api::AppState;
use crate::domain::{BookingRequest, NewBooking};
use crate::error::AppError;
use crate::mailer::BookingNotification;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingResponse {
    pub id: i64,
    /// "sent", "skipped" (no SMTP configured), or "failed".
    pub notification: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingsResponse {
    pub count: i64,
    pub bookings: Vec<BookingDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDto {
    pub id: i64,
    pub client_name: String,
    pub email: String,
    pub body_part: String,
    pub idea_description: String,
    pub preferred_date: String,
    pub is_confirmed: bool,
    pub created_at: String,
}

impl BookingDto {
    fn from_domain(booking: BookingRequest) -> BookingDto {
        BookingDto {
            id: booking.id,
            client_name: booking.client_name,
            email: booking.email,
            body_part: booking.body_part,
            idea_description: booking.idea_description,
            preferred_date: booking.preferred_date.format("%Y-%m-%d").to_string(),
            is_confirmed: booking.is_confirmed,
            created_at: booking.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmBookingResponse {
    pub id: i64,
    pub is_confirmed: bool,
}

/// Public booking form submission.
///
/// The booking is stored first; the studio notification is attempted after
/// and its outcome is reported in the response. A failed send never rolls
/// back the stored booking, otherwise a client retry would duplicate it.
pub async fn create_booking(
    State(state): State<AppState>,
    Json(booking): Json<NewBooking>,
) -> Result<(StatusCode, Json<CreateBookingResponse>), AppError> {
    let preferred_date = booking.validate().map_err(AppError::Validation)?;

    let id = state.repo.insert_booking(&booking, preferred_date).await?;

    let notification = match &state.mailer {
        None => "skipped",
        Some(mailer) => {
            let message = BookingNotification::for_booking(&booking);
            match mailer.send_booking_notification(&message).await {
                Ok(()) => "sent",
                Err(err) => {
                    warn!(booking_id = id, error = %err, "booking notification failed");
                    "failed"
                }
            }
        }
    };

    Ok((
        StatusCode::CREATED,
        Json(CreateBookingResponse { id, notification }),
    ))
}

/// Administrator view of all booking requests, newest first.
pub async fn list_bookings(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> Result<Json<BookingsResponse>, AppError> {
    let bookings = state.repo.list_bookings().await?;

    let count = bookings.len() as i64;
    let bookings = bookings.into_iter().map(BookingDto::from_domain).collect();

    Ok(Json(BookingsResponse { count, bookings }))
}

pub async fn confirm_booking(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ConfirmBookingResponse>, AppError> {
    let confirmed = state.repo.confirm_booking(id).await?;
    if !confirmed {
        return Err(AppError::NotFound(format!("booking {}", id)));
    }

    Ok(Json(ConfirmBookingResponse {
        id,
        is_confirmed: true,
    }))
}
