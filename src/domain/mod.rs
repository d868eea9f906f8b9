//! Domain types for the studio backend.
//!
//! This module provides:
//! - Booking requests with form validation
//! - Portfolio items and the tattoo-style lookup
//! - User accounts, roles, and login sessions

pub mod booking;
pub mod portfolio;
pub mod style;
pub mod user;
pub mod validation;

pub use booking::{BookingRequest, NewBooking};
pub use portfolio::{NewPortfolioItem, PortfolioItem, DEFAULT_STYLE};
pub use style::TattooStyle;
pub use user::{Session, UserAccount, ROLE_ADMIN, ROLE_USER};
pub use validation::FieldError;
