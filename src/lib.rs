pub mod api;
pub mod bootstrap;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod i18n;
pub mod identity;
pub mod mailer;

pub use config::Config;
pub use db::{ConnectionSettings, Repository};
pub use domain::{BookingRequest, NewBooking, NewPortfolioItem, PortfolioItem, TattooStyle};
pub use error::AppError;
pub use mailer::{Mailer, MockMailer, SmtpMailer};
