pub mod auth;
pub mod bookings;
pub mod health;
pub mod i18n;
pub mod portfolio;
pub mod styles;

use crate::config::Config;
use crate::db::Repository;
use crate::mailer::Mailer;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Config,
    /// Absent when SMTP is not configured; bookings then report the
    /// notification as skipped.
    pub mailer: Option<Arc<dyn Mailer>>,
}

impl AppState {
    pub fn new(repo: Arc<Repository>, config: Config, mailer: Option<Arc<dyn Mailer>>) -> Self {
        Self {
            repo,
            config,
            mailer,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route(
            "/v1/bookings",
            post(bookings::create_booking).get(bookings::list_bookings),
        )
        .route("/v1/bookings/:id/confirm", post(bookings::confirm_booking))
        .route(
            "/v1/portfolio",
            get(portfolio::list_items).post(portfolio::create_item),
        )
        .route("/v1/portfolio/:id", get(portfolio::get_item))
        .route("/v1/styles", get(styles::get_styles))
        .route("/v1/auth/login", post(auth::login))
        .route("/v1/i18n/cookie-banner", get(i18n::get_cookie_banner))
        .layer(cors)
        .with_state(state)
}
